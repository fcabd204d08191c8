//! Agent progress events.
//!
//! The loop reports what it is doing through an [`EventSink`] instead of
//! printing, so the terminal front end, tests, and any future surface
//! can render the same stream differently.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events emitted by the agent while handling queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// Ready for the next user query.
    AwaitingQuery,

    /// A plan step from the model.
    Plan { content: String },

    /// The model asked for a tool.
    ToolCall {
        name: String,
        input: serde_json::Value,
    },

    /// The requested tool is not registered.
    ToolNotFound { name: String },

    /// Text returned to the model after a tool call.
    Observation { name: String, output: String },

    /// The final answer for the current query.
    Answer { content: String },

    /// The model reply was not JSON; it was discarded and the request repeated.
    DecodeRetry { reason: String, attempt: u32 },

    /// The reply was JSON but broke the step contract; a correction was sent.
    ProtocolError { reason: String },

    /// The current query was aborted.
    Error { message: String },
}

impl AgentEvent {
    /// Short event name, matching the serialized `type` tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::AwaitingQuery => "awaiting_query",
            Self::Plan { .. } => "plan",
            Self::ToolCall { .. } => "tool_call",
            Self::ToolNotFound { .. } => "tool_not_found",
            Self::Observation { .. } => "observation",
            Self::Answer { .. } => "answer",
            Self::DecodeRetry { .. } => "decode_retry",
            Self::ProtocolError { .. } => "protocol_error",
            Self::Error { .. } => "error",
        }
    }
}

/// Receives agent events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: AgentEvent);
}

impl EventSink for mpsc::UnboundedSender<AgentEvent> {
    fn emit(&self, event: AgentEvent) {
        // A closed receiver just means nobody is watching.
        let _ = self.send(event);
    }
}

/// Discards every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: AgentEvent) {}
}
