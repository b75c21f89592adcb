//! The agent loop state machine.

use serde_json::{Value, json};
use std::sync::Arc;
use taskpilot_config::AppConfig;
use taskpilot_core::error::{AgentError, ToolError};
use taskpilot_core::message::Message;
use taskpilot_core::provider::{Provider, ProviderRequest};
use taskpilot_core::session::{Role, Session};
use taskpilot_core::tool::ToolRegistry;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::prompt;

/// Model round-trips allowed per request unless configured otherwise.
pub const DEFAULT_MAX_CYCLES: u32 = 10;

/// Where a run currently stands.
#[derive(Debug, Clone)]
pub enum AgentState {
    /// Waiting for the next model reply.
    AwaitingModel,
    /// The model asked for a tool call.
    DispatchingAction {
        function: String,
        input: Option<Value>,
    },
    /// The model produced its final output.
    Terminated(String),
    /// The run stopped on a fatal error.
    Failed(AgentError),
}

/// Outcome of one request.
#[derive(Debug)]
pub struct AgentRun {
    /// The full transcript as it stood when the loop stopped
    pub session: Session,
    /// Model round-trips made
    pub cycles: u32,
    /// Tool dispatches attempted
    pub dispatches: u32,
    /// Final output text, or the reason the run failed
    pub result: Result<String, AgentError>,
}

/// Drives the plan → action → observation → output protocol.
///
/// One `AgentLoop` is shared by every request; each call to [`run`](Self::run)
/// owns its own [`Session`].
pub struct AgentLoop {
    /// The model client
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Default max tokens per reply
    max_tokens: Option<u32>,

    /// Tools the model may call
    tools: Arc<ToolRegistry>,

    /// Behavior contract sent as the first transcript entry
    system_prompt: String,

    /// Maximum model round-trips per request
    max_cycles: u32,
}

impl AgentLoop {
    /// Create a loop whose system prompt lists every tool in `tools`.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        let system_prompt = prompt::system_prompt(&tools);
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools,
            system_prompt,
            max_cycles: DEFAULT_MAX_CYCLES,
        }
    }

    /// Build a loop from the model and agent settings in `config`.
    pub fn from_config(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        config: &AppConfig,
    ) -> Self {
        let mut agent = Self::new(
            provider,
            &config.default_model,
            config.default_temperature,
            tools,
        )
        .with_max_cycles(config.agent.max_cycles);

        if let Some(max) = config.default_max_tokens {
            agent = agent.with_max_tokens(max);
        }
        if let Some(prompt) = &config.agent.system_prompt_override {
            agent = agent.with_system_prompt(prompt.clone());
        }
        agent
    }

    /// Set the maximum number of model round-trips per request.
    pub fn with_max_cycles(mut self, max: u32) -> Self {
        self.max_cycles = max;
        self
    }

    /// Set the default max tokens per model reply.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Replace the generated system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn max_cycles(&self) -> u32 {
        self.max_cycles
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Answer a single user query with a fresh session.
    pub async fn run(&self, query: &str, cancel: CancellationToken) -> AgentRun {
        let session = Session::new(self.system_prompt.clone(), &Message::user(query));
        self.drive(session, cancel).await
    }

    /// Drive an already seeded session until it terminates or fails.
    pub async fn drive(&self, mut session: Session, cancel: CancellationToken) -> AgentRun {
        info!(
            session_id = %session.id(),
            entries = session.len(),
            "Processing request"
        );

        let mut cycles = 0u32;
        let mut dispatches = 0u32;
        let mut state = AgentState::AwaitingModel;

        let result = loop {
            state = match state {
                AgentState::Terminated(output) => break Ok(output),
                AgentState::Failed(err) => break Err(err),
                AgentState::AwaitingModel => {
                    if cancel.is_cancelled() {
                        AgentState::Failed(AgentError::Cancelled)
                    } else if cycles >= self.max_cycles {
                        AgentState::Failed(AgentError::CycleLimitExceeded(self.max_cycles))
                    } else {
                        cycles += 1;
                        debug!(session_id = %session.id(), cycle = cycles, "Agent loop cycle");
                        self.await_model(&mut session, &cancel).await
                    }
                }
                AgentState::DispatchingAction { function, input } => {
                    dispatches += 1;
                    self.dispatch(&mut session, &function, input.as_ref()).await
                }
            };
        };

        match &result {
            Ok(_) => info!(session_id = %session.id(), cycles, dispatches, "Request completed"),
            Err(err) => warn!(
                session_id = %session.id(),
                cycles,
                kind = err.kind(),
                error = %err,
                "Request failed"
            ),
        }

        AgentRun {
            session,
            cycles,
            dispatches,
            result,
        }
    }

    /// One model round-trip: send the transcript, record the reply, decode it.
    async fn await_model(&self, session: &mut Session, cancel: &CancellationToken) -> AgentState {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: session.transcript().to_vec(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            json_mode: true,
        };

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return AgentState::Failed(AgentError::Cancelled),
            response = self.provider.complete(request) => response,
        };

        let response = match response {
            Ok(response) => response,
            Err(e) => return AgentState::Failed(AgentError::Provider(e)),
        };

        if let Some(usage) = &response.usage {
            debug!(
                model = %response.model,
                tokens = usage.total_tokens,
                "Model replied"
            );
        }

        session.append(Role::Assistant, response.content.as_str());

        match Message::decode(&response.content) {
            Err(e) => AgentState::Failed(AgentError::Protocol(e)),
            Ok(Message::Plan { plan }) => {
                debug!(session_id = %session.id(), %plan, "Plan");
                AgentState::AwaitingModel
            }
            Ok(Message::Output { output }) => AgentState::Terminated(output),
            Ok(Message::Action { function, input }) => {
                AgentState::DispatchingAction { function, input }
            }
            Ok(other) => {
                AgentState::Failed(AgentError::UnexpectedMessageType(other.type_name().into()))
            }
        }
    }

    /// Run the requested tool and feed its result back as an observation.
    async fn dispatch(
        &self,
        session: &mut Session,
        function: &str,
        input: Option<&Value>,
    ) -> AgentState {
        debug!(session_id = %session.id(), tool = function, "Dispatching action");

        let observation = match self.tools.dispatch(function, input).await {
            Ok(value) => value,
            Err(ToolError::NotFound(name)) => {
                return AgentState::Failed(AgentError::InvalidToolCall(name));
            }
            Err(ToolError::InvalidArguments { tool_name, reason })
            | Err(ToolError::ExecutionFailed { tool_name, reason }) => {
                warn!(tool = %tool_name, %reason, "Tool failed; reporting to model");
                json!({ "error": { "tool": tool_name, "message": reason } })
            }
        };

        session.append_message(Role::Developer, &Message::observation(observation));
        AgentState::AwaitingModel
    }
}
