//! HTTP gateway for taskpilot.
//!
//! Serves the routes the web frontend talks to:
//! - `POST /ai-response` runs one agent request
//! - `POST /get-todo` lists every task
//! - `GET /` and `GET /health` for liveness
//!
//! Built on Axum. Each agent request runs on its own task and is cancelled
//! if the client goes away before it finishes.

use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use taskpilot_agent::AgentLoop;
use taskpilot_config::AppConfig;
use taskpilot_core::task::{Task, TaskStore};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared application state for the gateway.
pub struct GatewayState {
    pub agent: Arc<AgentLoop>,
    pub store: Arc<dyn TaskStore>,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/ai-response", post(ai_response_handler))
        .route("/get-todo", post(get_todo_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
///
/// Opens the configured store, builds the provider and tools once, and
/// shares them across requests.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let store = taskpilot_store::open(&config.store).await?;
    let provider = taskpilot_providers::build_from_config(&config)?.default_provider()?;
    let tools = Arc::new(taskpilot_tools::default_registry(store.clone()));
    let agent = Arc::new(AgentLoop::from_config(provider, tools, &config));

    let app = build_router(Arc::new(GatewayState { agent, store }));

    info!(
        addr = %addr,
        store = %config.store.backend,
        model = %config.default_model,
        "Gateway starting"
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn index_handler() -> Html<&'static str> {
    Html("<h1>Backend Server is running</h1>")
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, error: &'static str, kind: Option<&'static str>) -> ApiError {
    (status, Json(ErrorBody { error, kind }))
}

const QUERY_REQUIRED: &str = "Query is required.";
const PROCESSING_FAILED: &str = "An error occurred while processing the request.";
const FETCH_FAILED: &str = "An error occurred while fetching todos.";

#[derive(Deserialize)]
struct AiRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct AiResponse {
    response: String,
}

/// Parse the body leniently so that any unusable payload maps to the same 400.
fn query_from_body(body: &[u8]) -> Option<String> {
    let request: AiRequest = serde_json::from_slice(body).ok()?;
    request.message.filter(|m| !m.trim().is_empty())
}

async fn ai_response_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<AiResponse>, ApiError> {
    let Some(query) = query_from_body(&body) else {
        return Err(api_error(StatusCode::BAD_REQUEST, QUERY_REQUIRED, None));
    };

    info!(query_len = query.len(), "Agent request received");

    // Dropping the handler future (client disconnect) cancels the run.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let agent = state.agent.clone();
    let handle = tokio::spawn(async move { agent.run(&query, cancel).await });

    let run = handle.await.map_err(|e| {
        error!(error = %e, "Agent task panicked");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED, Some("internal"))
    })?;

    match run.result {
        Ok(response) => Ok(Json(AiResponse { response })),
        Err(e) => {
            error!(
                session_id = %run.session.id(),
                kind = e.kind(),
                error = %e,
                "Agent processing failed"
            );
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                PROCESSING_FAILED,
                Some(e.kind()),
            ))
        }
    }
}

#[derive(Serialize)]
struct TasksResponse {
    tasks: Vec<Task>,
}

async fn get_todo_handler(
    State(state): State<SharedState>,
) -> Result<Json<TasksResponse>, ApiError> {
    match state.store.list().await {
        Ok(tasks) => Ok(Json(TasksResponse { tasks })),
        Err(e) => {
            error!(error = %e, "Error fetching todos");
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED, None))
        }
    }
}
