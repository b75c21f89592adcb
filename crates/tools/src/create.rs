//! `createTodos` — add a task and return its id.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use taskpilot_core::error::ToolError;
use taskpilot_core::task::TaskStore;
use taskpilot_core::tool::Tool;
use tracing::debug;

use crate::input;

pub struct CreateTodosTool {
    store: Arc<dyn TaskStore>,
}

impl CreateTodosTool {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for CreateTodosTool {
    fn name(&self) -> &str {
        "createTodos"
    }

    fn signature(&self) -> &str {
        "createTodos(todo: string)"
    }

    fn description(&self) -> &str {
        "Creates a new Todo in the DB with a string input and returns the ID of the created todo."
    }

    async fn execute(&self, input: Option<&Value>) -> Result<Value, ToolError> {
        let text = input::text(self.name(), input, &["todo", "text"])?;
        let id = self
            .store
            .create(&text)
            .await
            .map_err(|e| ToolError::execution(self.name(), e))?;
        debug!(id, "Todo created");
        Ok(json!({ "id": id }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskpilot_store::InMemoryTaskStore;

    #[tokio::test]
    async fn creates_from_bare_string() {
        let store = Arc::new(InMemoryTaskStore::new());
        let tool = CreateTodosTool::new(store.clone());

        let result = tool.execute(Some(&json!("Buy milk"))).await.unwrap();
        assert_eq!(result, json!({"id": 1}));
        assert_eq!(store.get(1).await.unwrap().unwrap().text, "Buy milk");
    }

    #[tokio::test]
    async fn creates_from_object() {
        let store = Arc::new(InMemoryTaskStore::new());
        let tool = CreateTodosTool::new(store.clone());

        tool.execute(Some(&json!({"todo": "Call mom"}))).await.unwrap();
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn stores_text_as_given() {
        let store = Arc::new(InMemoryTaskStore::new());
        let tool = CreateTodosTool::new(store.clone());

        tool.execute(Some(&json!("  Buy milk  "))).await.unwrap();
        assert_eq!(store.get(1).await.unwrap().unwrap().text, "  Buy milk  ");
    }

    #[tokio::test]
    async fn rejects_missing_text() {
        let tool = CreateTodosTool::new(Arc::new(InMemoryTaskStore::new()));
        let err = tool.execute(None).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }
}
