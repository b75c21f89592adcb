//! Task entity and the TaskStore trait.
//!
//! The store is the agent's only side-effecting collaborator. Each operation
//! is expected to be atomic on its own; no transaction spans a tool call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A single todo item.
///
/// The text is exposed on the wire as `todo`, the column name the model's
/// instructions and the web frontend both use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,

    #[serde(rename = "todo")]
    pub text: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Persistent task storage.
///
/// Implementations: in-memory (testing), SQLite, PostgreSQL.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "postgres", "in_memory").
    fn name(&self) -> &str;

    /// All tasks. Ordering is not part of the contract.
    async fn list(&self) -> Result<Vec<Task>, StoreError>;

    /// Create a task and return its newly assigned id.
    async fn create(&self, text: &str) -> Result<i64, StoreError>;

    /// Case-insensitive substring match against task text.
    async fn search(&self, query: &str) -> Result<Vec<Task>, StoreError>;

    /// Delete a task. Returns `false` when no task had that id.
    async fn remove(&self, id: i64) -> Result<bool, StoreError>;

    /// Replace a task's text. Returns `false` when no task had that id.
    async fn update(&self, id: i64, text: &str) -> Result<bool, StoreError>;

    /// Fetch one task by id.
    async fn get(&self, id: i64) -> Result<Option<Task>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_serializes_text_as_todo() {
        let task = Task {
            id: 2,
            text: "Shopping for groceries".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], 2);
        assert_eq!(json["todo"], "Shopping for groceries");
        assert!(json.get("text").is_none());
        assert!(json.get("created_at").is_some());
    }
}
