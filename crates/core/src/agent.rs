//! Agent state types.

use serde::{Deserialize, Serialize};

/// Where the agent loop is in the plan → action → observe protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    /// Waiting for the next user query
    #[default]
    AwaitingQuery,
    /// Waiting on the model, or handling a plan step
    Planning,
    /// Executing a tool
    Acting,
    /// Appending a tool observation
    Observing,
    /// The model produced its final answer
    Concluded,
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AwaitingQuery => "awaiting_query",
            Self::Planning => "planning",
            Self::Acting => "acting",
            Self::Observing => "observing",
            Self::Concluded => "concluded",
        };
        f.write_str(s)
    }
}

/// Runtime counters for one agent session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentState {
    /// Current protocol state
    pub state: LoopState,

    /// Queries answered since startup
    pub queries_processed: u64,

    /// Tool calls made since startup
    pub tool_calls: u64,

    /// Total tokens consumed since startup
    pub total_tokens: u64,
}
