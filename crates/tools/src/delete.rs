//! `deleteTodo` — remove a task by id. Absent ids are a no-op.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use taskpilot_core::error::ToolError;
use taskpilot_core::task::TaskStore;
use taskpilot_core::tool::Tool;
use tracing::debug;

use crate::input;

pub struct DeleteTodoTool {
    store: Arc<dyn TaskStore>,
}

impl DeleteTodoTool {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for DeleteTodoTool {
    fn name(&self) -> &str {
        "deleteTodo"
    }

    fn signature(&self) -> &str {
        "deleteTodo(id: number)"
    }

    fn description(&self) -> &str {
        "Deletes a Todo by ID. Reports deleted=false if no todo had that ID."
    }

    async fn execute(&self, input: Option<&Value>) -> Result<Value, ToolError> {
        let id = input::id(self.name(), input)?;
        let deleted = self
            .store
            .remove(id)
            .await
            .map_err(|e| ToolError::execution(self.name(), e))?;
        debug!(id, deleted, "Todo delete");
        Ok(json!({ "id": id, "deleted": deleted }))
    }
}
