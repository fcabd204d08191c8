//! # Stepwise Core
//!
//! Domain types, traits, and error definitions for the Stepwise agent.
//! This crate has **no framework dependencies** beyond serde and tokio's
//! process handles; it defines the domain model the other crates implement
//! against.
//!
//! - [`message`]: the ordered conversation the model sees
//! - [`reply`]: the JSON step protocol spoken by the model
//! - [`tool`]: the tool trait and registry
//! - [`session`]: working directory and background processes
//! - [`provider`]: the model boundary

pub mod agent;
pub mod error;
pub mod message;
pub mod provider;
pub mod reply;
pub mod session;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use agent::{AgentState, LoopState};
pub use error::{ProviderError, ReplyError, ToolError};
pub use message::{Conversation, ConversationId, Role, Turn};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use reply::{Observation, ReplyStep, StructuredReply, parse_reply};
pub use session::{BackgroundProcess, ProcessStatus, SessionContext};
pub use tool::{Tool, ToolDefinition, ToolRegistry, ToolResult};
