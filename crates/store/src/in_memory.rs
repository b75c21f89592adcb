//! In-memory store — useful for testing and throwaway sessions.

use async_trait::async_trait;
use chrono::Utc;
use taskpilot_core::error::StoreError;
use taskpilot_core::task::{Task, TaskStore};
use tokio::sync::RwLock;

/// A store that keeps tasks in a Vec behind a lock.
/// Ids are assigned sequentially from 1 and never reused.
pub struct InMemoryTaskStore {
    inner: RwLock<Inner>,
}

struct Inner {
    tasks: Vec<Task>,
    next_id: i64,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                tasks: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of stored tasks.
    pub async fn count(&self) -> usize {
        self.inner.read().await.tasks.len()
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.inner.read().await.tasks.clone())
    }

    async fn create(&self, text: &str) -> Result<i64, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        let now = Utc::now();
        inner.tasks.push(Task {
            id,
            text: text.to_string(),
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn search(&self, query: &str) -> Result<Vec<Task>, StoreError> {
        let needle = query.to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner
            .tasks
            .iter()
            .filter(|t| t.text.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let len_before = inner.tasks.len();
        inner.tasks.retain(|t| t.id != id);
        Ok(inner.tasks.len() < len_before)
    }

    async fn update(&self, id: i64, text: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.text = text.to_string();
                task.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get(&self, id: i64) -> Result<Option<Task>, StoreError> {
        Ok(self.inner.read().await.tasks.iter().find(|t| t.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_get() {
        let store = InMemoryTaskStore::new();
        let id = store.create("Finish coding project").await.unwrap();
        assert_eq!(id, 1);

        let task = store.get(id).await.unwrap().unwrap();
        assert_eq!(task.text, "Finish coding project");
        assert_eq!(task.created_at, task.updated_at);
    }

    #[tokio::test]
    async fn ids_are_not_reused() {
        let store = InMemoryTaskStore::new();
        let first = store.create("one").await.unwrap();
        store.remove(first).await.unwrap();
        let second = store.create("two").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let store = InMemoryTaskStore::new();
        store.create("Shopping for Groceries").await.unwrap();
        store.create("Finish coding project").await.unwrap();

        let results = store.search("grocer").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "Shopping for Groceries");

        assert!(store.search("laundry").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_absent_id_is_noop() {
        let store = InMemoryTaskStore::new();
        store.create("keep me").await.unwrap();
        assert!(!store.remove(42).await.unwrap());
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn update_replaces_text() {
        let store = InMemoryTaskStore::new();
        let id = store.create("Shopping for groceries").await.unwrap();
        assert!(store.update(id, "Buy vegetables and fruits").await.unwrap());
        assert!(!store.update(99, "nobody").await.unwrap());

        let task = store.get(id).await.unwrap().unwrap();
        assert_eq!(task.text, "Buy vegetables and fruits");
        assert!(task.updated_at >= task.created_at);
    }
}
