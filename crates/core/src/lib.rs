//! # taskpilot core
//!
//! Domain types, traits, and error definitions for the taskpilot todo agent.
//! This crate has **no framework dependencies**: it defines the protocol,
//! the session model and the collaborator traits every other crate
//! implements against.
//!
//! - [`message`] — the five-variant JSON protocol and its codec
//! - [`session`] — the append-only transcript of one request
//! - [`tool`] — the name-keyed tool registry
//! - [`task`] — the task entity and the storage trait
//! - [`provider`] — the model client trait

pub mod error;
pub mod message;
pub mod provider;
pub mod session;
pub mod task;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{AgentError, Error, ProtocolError, ProviderError, Result, StoreError, ToolError};
pub use message::Message;
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use session::{Entry, Role, Session, SessionId};
pub use task::{Task, TaskStore};
pub use tool::{Tool, ToolRegistry};
