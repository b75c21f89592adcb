//! Tool trait — the operations the model may ask the runtime to perform.
//!
//! The model names tools by string. The registry turns that name into a
//! concrete [`Tool`], and an unknown name is an explicit
//! [`ToolError::NotFound`] rather than a lookup fault.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::ToolError;

/// The core Tool trait.
///
/// Each task operation (list, create, search, delete, update) implements
/// this trait and is registered in the [`ToolRegistry`].
#[async_trait]
pub trait Tool: Send + Sync {
    /// The name the model uses in `{"type":"action","function":...}`.
    fn name(&self) -> &str;

    /// Signature-style description included in the system prompt,
    /// e.g. `createTodos(todo: string)`.
    fn signature(&self) -> &str;

    /// What the tool does, for the system prompt.
    fn description(&self) -> &str;

    /// Run the tool. `input` is `None` when the model omitted it.
    async fn execute(&self, input: Option<&Value>) -> Result<Value, ToolError>;
}

/// A registry of available tools, keyed by name.
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Look up `name` and run it. No retries.
    pub async fn dispatch(&self, name: &str, input: Option<&Value>) -> Result<Value, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.execute(input).await
    }

    /// List all registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Render the tool list as bullet lines for the system prompt.
    pub fn describe(&self) -> String {
        self.tools
            .values()
            .map(|t| format!("  - {}: {}\n", t.signature(), t.description()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn signature(&self) -> &str {
            "echo(text: string)"
        }
        fn description(&self) -> &str {
            "Echoes back the input."
        }
        async fn execute(&self, input: Option<&Value>) -> Result<Value, ToolError> {
            input
                .cloned()
                .ok_or_else(|| ToolError::invalid("echo", "missing input"))
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert_eq!(registry.names(), vec!["echo"]);
    }

    #[test]
    fn registry_describe_lists_signatures() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        assert_eq!(registry.describe(), "  - echo(text: string): Echoes back the input.\n");
    }

    #[tokio::test]
    async fn registry_dispatch_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let input = serde_json::json!("hello world");
        let result = registry.dispatch("echo", Some(&input)).await.unwrap();
        assert_eq!(result, "hello world");
    }

    #[tokio::test]
    async fn registry_dispatch_missing_tool() {
        let registry = ToolRegistry::new();
        let err = registry.dispatch("doMagic", None).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(name) if name == "doMagic"));
    }

    #[tokio::test]
    async fn registry_propagates_tool_errors() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let err = registry.dispatch("echo", None).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }
}
