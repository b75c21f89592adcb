//! Conversation session — the transcript of one user request.
//!
//! A session is seeded with the system prompt and the user's message, then
//! grows by one entry per agent step. It is never reordered or truncated, and
//! the whole transcript is resent to the model on every round-trip because the
//! completion endpoint is stateless.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::Message;

/// Unique identifier for a session, used for log correlation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The behavior contract, sent once at the start
    System,
    /// The end user
    User,
    /// Raw model output
    Assistant,
    /// Tool results fed back by the runtime
    Developer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Developer => "developer",
        }
    }
}

/// One role-tagged transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub role: Role,
    pub content: String,
}

impl Entry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// The ordered history of one request.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    entries: Vec<Entry>,
}

impl Session {
    /// Seed a session with the system prompt and the initial user message.
    pub fn new(system_prompt: impl Into<String>, initial_user: &Message) -> Self {
        let mut session = Self {
            id: SessionId::new(),
            entries: Vec::with_capacity(8),
        };
        session.append(Role::System, system_prompt);
        session.append_message(Role::User, initial_user);
        session
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Append one entry. This is the only way history changes.
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.entries.push(Entry {
            role,
            content: content.into(),
        });
    }

    /// Encode `message` and append it.
    pub fn append_message(&mut self, role: Role, message: &Message) {
        self.append(role, message.encode());
    }

    /// The transcript exactly as it is sent to the model.
    pub fn transcript(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry, if any.
    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }
}
