//! `getAllTodos` — return every task.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use taskpilot_core::error::ToolError;
use taskpilot_core::task::TaskStore;
use taskpilot_core::tool::Tool;

pub struct GetAllTodosTool {
    store: Arc<dyn TaskStore>,
}

impl GetAllTodosTool {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GetAllTodosTool {
    fn name(&self) -> &str {
        "getAllTodos"
    }

    fn signature(&self) -> &str {
        "getAllTodos()"
    }

    fn description(&self) -> &str {
        "Returns all the Todos from the database."
    }

    async fn execute(&self, _input: Option<&Value>) -> Result<Value, ToolError> {
        let tasks = self
            .store
            .list()
            .await
            .map_err(|e| ToolError::execution(self.name(), e))?;
        serde_json::to_value(tasks).map_err(|e| ToolError::ExecutionFailed {
            tool_name: self.name().into(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskpilot_store::InMemoryTaskStore;

    #[tokio::test]
    async fn lists_tasks_with_wire_field_names() {
        let store = Arc::new(InMemoryTaskStore::new());
        store.create("Finish coding project").await.unwrap();
        store.create("Shopping for groceries").await.unwrap();

        let tool = GetAllTodosTool::new(store);
        let result = tool.execute(None).await.unwrap();
        let tasks = result.as_array().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1]["todo"], "Shopping for groceries");
    }

    #[tokio::test]
    async fn ignores_any_input() {
        let tool = GetAllTodosTool::new(Arc::new(InMemoryTaskStore::new()));
        let result = tool.execute(Some(&serde_json::json!({"page": 2}))).await.unwrap();
        assert_eq!(result, serde_json::json!([]));
    }
}
