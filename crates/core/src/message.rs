//! The JSON message protocol spoken with the model.
//!
//! Every unit exchanged with the planner is a single JSON object with a
//! mandatory `type` discriminator:
//!
//! ```json
//! {"type":"user","user":"Add milk to my list"}
//! {"type":"plan","plan":"I will use createTodos"}
//! {"type":"action","function":"createTodos","input":"Buy milk"}
//! {"type":"observation","observation":{"id":3}}
//! {"type":"output","output":"Added 'Buy milk' (ID 3)."}
//! ```
//!
//! Model output is untrusted. [`Message::decode`] walks the raw JSON value
//! by hand instead of trusting a derived deserializer, so every rejection maps
//! onto a precise [`ProtocolError`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProtocolError;

/// One unit of the agent protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    /// The human request. Only the runtime originates these.
    User { user: String },

    /// The model's stated intention. Informational only.
    Plan { plan: String },

    /// A requested tool invocation.
    Action {
        function: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input: Option<Value>,
    },

    /// The result of a tool invocation, fed back to the model.
    Observation { observation: Value },

    /// The final user-facing answer.
    Output { output: String },
}

impl Message {
    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::User { user: text.into() }
    }

    /// Create a plan message.
    pub fn plan(text: impl Into<String>) -> Self {
        Self::Plan { plan: text.into() }
    }

    /// Create an action message. A JSON `null` input is normalized to absent.
    pub fn action(function: impl Into<String>, input: Option<Value>) -> Self {
        Self::Action {
            function: function.into(),
            input: input.filter(|v| !v.is_null()),
        }
    }

    /// Create an observation message.
    pub fn observation(observation: impl Into<Value>) -> Self {
        Self::Observation {
            observation: observation.into(),
        }
    }

    /// Create an output message.
    pub fn output(text: impl Into<String>) -> Self {
        Self::Output {
            output: text.into(),
        }
    }

    /// The wire value of the `type` discriminator.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::User { .. } => "user",
            Self::Plan { .. } => "plan",
            Self::Action { .. } => "action",
            Self::Observation { .. } => "observation",
            Self::Output { .. } => "output",
        }
    }

    /// Whether this type belongs to the model side of the wire schema.
    ///
    /// `user` is only ever produced by the runtime. Of the rest, the agent
    /// loop acts on `plan`, `action` and `output`.
    pub fn is_model_originated(&self) -> bool {
        !matches!(self, Self::User { .. })
    }

    /// Serialize to the wire form.
    pub fn encode(&self) -> String {
        // String-keyed maps and plain values cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse and validate raw model text.
    pub fn decode(raw: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| ProtocolError::MalformedResponse(e.to_string()))?;

        let Value::Object(obj) = value else {
            return Err(ProtocolError::UnknownMessageType(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        };

        let kind = match obj.get("type") {
            Some(Value::String(s)) => s.as_str(),
            Some(other) => {
                return Err(ProtocolError::UnknownMessageType(format!(
                    "'type' must be a string, got {}",
                    json_kind(other)
                )));
            }
            None => {
                return Err(ProtocolError::UnknownMessageType(
                    "missing 'type' field".into(),
                ));
            }
        };

        match kind {
            "user" => Ok(Self::User {
                user: required_str(&obj, "user", "user")?,
            }),
            "plan" => Ok(Self::Plan {
                plan: required_str(&obj, "plan", "plan")?,
            }),
            "action" => Ok(Self::Action {
                function: required_str(&obj, "action", "function")?,
                input: obj.get("input").filter(|v| !v.is_null()).cloned(),
            }),
            "observation" => Ok(Self::Observation {
                observation: obj
                    .get("observation")
                    .filter(|v| !v.is_null())
                    .cloned()
                    .ok_or(ProtocolError::MissingField {
                        message_type: "observation",
                        field: "observation",
                    })?,
            }),
            "output" => Ok(Self::Output {
                output: required_str(&obj, "output", "output")?,
            }),
            other => Err(ProtocolError::UnknownMessageType(other.to_string())),
        }
    }
}

/// Fetch a string field, treating absent, `null` and non-string values alike.
fn required_str(
    obj: &Map<String, Value>,
    message_type: &'static str,
    field: &'static str,
) -> Result<String, ProtocolError> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ProtocolError::MissingField {
            message_type,
            field,
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_user_is_runtime_originated() {
        assert!(!Message::user("hi").is_model_originated());
        assert!(Message::plan("p").is_model_originated());
        assert!(Message::action("getAllTodos", None).is_model_originated());
        assert!(Message::observation("2").is_model_originated());
        assert!(Message::output("done").is_model_originated());
    }

    #[test]
    fn round_trip_every_variant() {
        let messages = vec![
            Message::user("Add a task for shopping groceries."),
            Message::plan("I will use createTodos."),
            Message::action("createTodos", Some(json!("Buy milk"))),
            Message::action("getAllTodos", None),
            Message::action("updateTodo", Some(json!({"id": 2, "todo": "Buy fruit"}))),
            Message::observation(json!({"id": 2})),
            Message::observation("Task deleted successfully."),
            Message::output("Your todo has been added."),
        ];
        for msg in messages {
            let decoded = Message::decode(&msg.encode()).unwrap();
            assert_eq!(decoded, msg);
        }
    }

    #[test]
    fn encode_uses_wire_field_names() {
        let json = Message::action("deleteTodo", Some(json!(5))).encode();
        assert_eq!(json, r#"{"type":"action","function":"deleteTodo","input":5}"#);

        let json = Message::action("getAllTodos", None).encode();
        assert_eq!(json, r#"{"type":"action","function":"getAllTodos"}"#);
    }

    #[test]
    fn decode_accepts_model_output_from_prompt_examples() {
        let msg = Message::decode(
            r#"{"type":"action","function":"updateTodo","input":{"id":2,"todo":"Buy vegetables and fruits"}}"#,
        )
        .unwrap();
        match msg {
            Message::Action { function, input } => {
                assert_eq!(function, "updateTodo");
                assert_eq!(input.unwrap()["id"], 2);
            }
            other => panic!("expected action, got {other:?}"),
        }
    }

    #[test]
    fn decode_ignores_extra_fields() {
        let msg = Message::decode(r#"{"type":"plan","plan":"think","confidence":0.9}"#).unwrap();
        assert_eq!(msg, Message::plan("think"));
    }

    #[test]
    fn decode_rejects_invalid_json() {
        let err = Message::decode(r#"{"type":"output","output":"trunc"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedResponse(_)));

        let err = Message::decode("Sure! Here is your list.").unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedResponse(_)));
    }

    #[test]
    fn decode_rejects_missing_or_unknown_type() {
        for raw in [
            r#"{"output":"hi"}"#,
            r#"{"type":"shout","shout":"hi"}"#,
            r#"{"type":7}"#,
            r#"["type","output"]"#,
            r#""output""#,
        ] {
            let err = Message::decode(raw).unwrap_err();
            assert!(
                matches!(err, ProtocolError::UnknownMessageType(_)),
                "{raw} gave {err:?}"
            );
        }
    }

    #[test]
    fn decode_rejects_missing_required_fields() {
        let cases = [
            (r#"{"type":"user"}"#, "user"),
            (r#"{"type":"plan"}"#, "plan"),
            (r#"{"type":"action","input":3}"#, "function"),
            (r#"{"type":"observation"}"#, "observation"),
            (r#"{"type":"observation","observation":null}"#, "observation"),
            (r#"{"type":"output"}"#, "output"),
            (r#"{"type":"output","output":42}"#, "output"),
        ];
        for (raw, expected) in cases {
            match Message::decode(raw) {
                Err(ProtocolError::MissingField { field, .. }) => assert_eq!(field, expected),
                other => panic!("{raw} gave {other:?}"),
            }
        }
    }

    #[test]
    fn decode_treats_null_input_as_absent() {
        let msg = Message::decode(r#"{"type":"action","function":"getAllTodos","input":null}"#)
            .unwrap();
        assert_eq!(msg, Message::action("getAllTodos", None));
    }

    #[test]
    fn type_names_match_wire_discriminator() {
        assert_eq!(Message::output("x").type_name(), "output");
        assert_eq!(Message::observation(json!([])).type_name(), "observation");
    }
}
