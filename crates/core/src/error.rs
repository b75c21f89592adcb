//! Error types for the taskpilot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`Error`] aggregates them.

use thiserror::Error;

/// The top-level error type for all taskpilot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Protocol errors ---
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Agent errors ---
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// A model response that violates the JSON message protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Unknown message type: {0}")]
    UnknownMessageType(String),

    #[error("Message of type '{message_type}' is missing required field '{field}'")]
    MissingField {
        message_type: &'static str,
        field: &'static str,
    },
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments for {tool_name}: {reason}")]
    InvalidArguments { tool_name: String, reason: String },

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },
}

impl ToolError {
    /// Wrap a store failure raised while running `tool_name`.
    pub fn execution(tool_name: &str, err: StoreError) -> Self {
        Self::ExecutionFailed {
            tool_name: tool_name.to_string(),
            reason: err.to_string(),
        }
    }

    /// Argument shape mismatch for `tool_name`.
    pub fn invalid(tool_name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool_name: tool_name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Fatal outcomes of a single agent run.
///
/// Recoverable tool failures never appear here; they are folded back into
/// the transcript as observations.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("Model emitted a message of type '{0}', which only the runtime may originate")]
    UnexpectedMessageType(String),

    #[error("Invalid tool call: {0}")]
    InvalidToolCall(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Cycle limit of {0} exceeded without a final output")]
    CycleLimitExceeded(u32),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl AgentError {
    /// Stable machine-readable name for this failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Protocol(ProtocolError::MalformedResponse(_)) => "malformed_response",
            Self::Protocol(ProtocolError::UnknownMessageType(_)) => "unknown_message_type",
            Self::Protocol(ProtocolError::MissingField { .. }) => "missing_field",
            Self::UnexpectedMessageType(_) => "unexpected_message_type",
            Self::InvalidToolCall(_) => "invalid_tool_call",
            Self::Cancelled => "cancelled",
            Self::CycleLimitExceeded(_) => "cycle_limit_exceeded",
            Self::Provider(_) => "provider",
        }
    }
}
