//! `updateTodo` — replace a task's text.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use taskpilot_core::error::ToolError;
use taskpilot_core::task::TaskStore;
use taskpilot_core::tool::Tool;

use crate::input;

pub struct UpdateTodoTool {
    store: Arc<dyn TaskStore>,
}

impl UpdateTodoTool {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for UpdateTodoTool {
    fn name(&self) -> &str {
        "updateTodo"
    }

    fn signature(&self) -> &str {
        "updateTodo({id: number, todo: string})"
    }

    fn description(&self) -> &str {
        "Replaces the text of the Todo with the given ID."
    }

    async fn execute(&self, input: Option<&Value>) -> Result<Value, ToolError> {
        if !matches!(input, Some(Value::Object(_))) {
            return Err(ToolError::invalid(
                self.name(),
                "expected an object with 'id' and 'todo'",
            ));
        }
        let id = input::id(self.name(), input)?;
        let text = input::text(self.name(), input, &["todo", "text"])?;
        let updated = self
            .store
            .update(id, &text)
            .await
            .map_err(|e| ToolError::execution(self.name(), e))?;
        Ok(json!({ "id": id, "updated": updated }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskpilot_store::InMemoryTaskStore;

    #[tokio::test]
    async fn updates_text() {
        let store = Arc::new(InMemoryTaskStore::new());
        let id = store.create("Shopping for groceries").await.unwrap();

        let tool = UpdateTodoTool::new(store.clone());
        let result = tool
            .execute(Some(&json!({"id": id, "todo": "Buy vegetables and fruits"})))
            .await
            .unwrap();
        assert_eq!(result, json!({"id": id, "updated": true}));
        assert_eq!(
            store.get(id).await.unwrap().unwrap().text,
            "Buy vegetables and fruits"
        );
    }

    #[tokio::test]
    async fn missing_task_reports_not_updated() {
        let tool = UpdateTodoTool::new(Arc::new(InMemoryTaskStore::new()));
        let result = tool
            .execute(Some(&json!({"id": 3, "text": "whatever"})))
            .await
            .unwrap();
        assert_eq!(result["updated"], false);
    }

    #[tokio::test]
    async fn bare_string_is_invalid() {
        let tool = UpdateTodoTool::new(Arc::new(InMemoryTaskStore::new()));
        let err = tool.execute(Some(&json!("Buy fruit"))).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }
}
