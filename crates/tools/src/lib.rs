//! Task tools for taskpilot.
//!
//! Each tool wraps one [`TaskStore`] operation under the name the model was
//! taught in its instructions:
//!
//! | tool          | store call        |
//! |---------------|-------------------|
//! | `getAllTodos` | `list()`          |
//! | `createTodos` | `create(text)`    |
//! | `searchTodo`  | `search(query)`   |
//! | `deleteTodo`  | `remove(id)`      |
//! | `updateTodo`  | `update(id, text)`|

pub mod create;
pub mod delete;
pub mod get_all;
mod input;
pub mod search;
pub mod update;

use std::sync::Arc;
use taskpilot_core::task::TaskStore;
use taskpilot_core::tool::ToolRegistry;

pub use create::CreateTodosTool;
pub use delete::DeleteTodoTool;
pub use get_all::GetAllTodosTool;
pub use search::SearchTodoTool;
pub use update::UpdateTodoTool;

/// Create a registry with all five task tools bound to `store`.
pub fn default_registry(store: Arc<dyn TaskStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(GetAllTodosTool::new(store.clone())));
    registry.register(Box::new(CreateTodosTool::new(store.clone())));
    registry.register(Box::new(SearchTodoTool::new(store.clone())));
    registry.register(Box::new(DeleteTodoTool::new(store.clone())));
    registry.register(Box::new(UpdateTodoTool::new(store)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskpilot_store::InMemoryTaskStore;

    #[test]
    fn default_registry_has_all_tools() {
        let registry = default_registry(Arc::new(InMemoryTaskStore::new()));
        assert_eq!(
            registry.names(),
            vec!["createTodos", "deleteTodo", "getAllTodos", "searchTodo", "updateTodo"]
        );
        assert!(registry.describe().contains("deleteTodo(id: number)"));
    }
}
