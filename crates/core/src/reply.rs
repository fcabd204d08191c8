//! The structured reply protocol spoken between the agent and the model.
//!
//! Every model turn must be a single JSON object:
//!
//! ```json
//! { "step": "plan" | "action" | "output", "content": "...", "function": "...", "input": ... }
//! ```
//!
//! Raw text is decoded into a [`StructuredReply`] and then narrowed to a
//! closed [`ReplyStep`] so the agent loop never switches on open strings.
//! Tool results travel back the other way as an [`Observation`].

use serde::{Deserialize, Serialize};

use crate::error::ReplyError;

/// The wire shape of a model reply, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredReply {
    #[serde(default)]
    pub step: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,

    /// A string for most tools, an object for `create_file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,
}

/// A validated reply step.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyStep {
    /// Progress notice; the loop asks the model again.
    Plan { content: String },
    /// A tool invocation request.
    Action {
        function: String,
        input: serde_json::Value,
    },
    /// The final answer to the current query.
    Output { content: String },
}

impl ReplyStep {
    /// Short lowercase name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Plan { .. } => "plan",
            Self::Action { .. } => "action",
            Self::Output { .. } => "output",
        }
    }
}

impl StructuredReply {
    /// Decode raw model text.
    ///
    /// Only text that is not a JSON object is a [`ReplyError::Decode`];
    /// a JSON object with ill-typed fields is a [`ReplyError::Protocol`].
    pub fn decode(text: &str) -> Result<Self, ReplyError> {
        let body = strip_code_fence(text);
        let value: serde_json::Value =
            serde_json::from_str(body).map_err(|e| ReplyError::Decode(e.to_string()))?;

        if !value.is_object() {
            return Err(ReplyError::Decode(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }

        serde_json::from_value(value).map_err(|e| ReplyError::Protocol(e.to_string()))
    }

    /// Narrow the wire shape to a [`ReplyStep`], enforcing per-step fields.
    pub fn into_step(self) -> Result<ReplyStep, ReplyError> {
        let step = self
            .step
            .ok_or_else(|| ReplyError::Protocol("missing 'step' field".into()))?;

        match step.as_str() {
            "plan" => Ok(ReplyStep::Plan {
                content: required_content(self.content, "plan")?,
            }),
            "output" => Ok(ReplyStep::Output {
                content: required_content(self.content, "output")?,
            }),
            "action" => {
                let function = self
                    .function
                    .map(|f| f.trim().to_string())
                    .filter(|f| !f.is_empty())
                    .ok_or_else(|| {
                        ReplyError::Protocol("step 'action' requires a non-empty 'function'".into())
                    })?;
                Ok(ReplyStep::Action {
                    function,
                    input: self.input.unwrap_or(serde_json::Value::Null),
                })
            }
            other => Err(ReplyError::Protocol(format!(
                "unknown step '{other}', expected one of plan, action, output"
            ))),
        }
    }
}

/// Decode and validate in one go.
pub fn parse_reply(text: &str) -> Result<ReplyStep, ReplyError> {
    StructuredReply::decode(text)?.into_step()
}

fn required_content(content: Option<String>, step: &str) -> Result<String, ReplyError> {
    content.ok_or_else(|| ReplyError::Protocol(format!("step '{step}' requires 'content'")))
}

/// Models in JSON mode occasionally still wrap the object in a markdown fence.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// A tool result as re-inserted into the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub step: String,
    pub output: String,
}

impl Observation {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            step: "observe".into(),
            output: output.into(),
        }
    }

    /// Serialized form appended as a user turn.
    pub fn to_turn_text(&self) -> String {
        serde_json::json!({ "step": self.step, "output": self.output }).to_string()
    }
}
