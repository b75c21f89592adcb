//! Coercion of loosely-typed model input into tool arguments.
//!
//! Models are inconsistent about argument shape: an id may arrive as `5`,
//! `"5"` or `{"id": 5}`, text as a bare string or wrapped in an object.

use serde_json::Value;
use taskpilot_core::error::ToolError;

/// Extract text from a bare string or the first matching object key.
///
/// The text is returned exactly as given.
pub(crate) fn text(tool: &str, input: Option<&Value>, keys: &[&str]) -> Result<String, ToolError> {
    let found = match input {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(Value::Object(obj)) => keys.iter().find_map(|k| obj.get(*k).and_then(Value::as_str)),
        _ => None,
    };
    found.map(str::to_string).ok_or_else(|| {
        ToolError::invalid(
            tool,
            format!("expected a string or an object with '{}'", keys.join("' or '")),
        )
    })
}

/// Extract an integer id from a number, a numeric string, or `{"id": ...}`.
pub(crate) fn id(tool: &str, input: Option<&Value>) -> Result<i64, ToolError> {
    let value = match input {
        Some(Value::Object(obj)) => obj.get("id"),
        other => other,
    };
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ToolError::invalid(tool, "expected an integer id"))
}
