//! `searchTodo` — case-insensitive substring search.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use taskpilot_core::error::ToolError;
use taskpilot_core::task::TaskStore;
use taskpilot_core::tool::Tool;

use crate::input;

pub struct SearchTodoTool {
    store: Arc<dyn TaskStore>,
}

impl SearchTodoTool {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for SearchTodoTool {
    fn name(&self) -> &str {
        "searchTodo"
    }

    fn signature(&self) -> &str {
        "searchTodo(query: string)"
    }

    fn description(&self) -> &str {
        "Searches for all the todos whose text contains the query, ignoring case."
    }

    async fn execute(&self, input: Option<&Value>) -> Result<Value, ToolError> {
        let query = input::text(self.name(), input, &["query", "search"])?;
        let tasks = self
            .store
            .search(&query)
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
    use serde_json::json;
    use taskpilot_store::InMemoryTaskStore;

    #[tokio::test]
    async fn finds_matching_tasks() {
        let store = Arc::new(InMemoryTaskStore::new());
        store.create("Shopping for groceries").await.unwrap();
        store.create("Finish coding project").await.unwrap();

        let tool = SearchTodoTool::new(store);
        let result = tool.execute(Some(&json!("GROCERY"))).await.unwrap();
        // "grocery" is not a substring of "groceries"
        assert_eq!(result, json!([]));

        let result = tool.execute(Some(&json!({"query": "grocer"}))).await.unwrap();
        assert_eq!(result.as_array().unwrap().len(), 1);
        assert_eq!(result[0]["id"], 1);
    }
}
