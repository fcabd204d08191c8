//! The core agent loop — the heart of Stepwise.
//!
//! The agent follows a **plan → action → observe** cycle:
//!
//! 1. **Receive** a user query and append it to the conversation
//! 2. **Send** the whole conversation to the model in JSON mode
//! 3. **If plan**: report it and ask the model again
//! 4. **If action**: run the tool, append the observation, loop back to step 2
//! 5. **If output**: report the answer and wait for the next query
//!
//! Replies that are not JSON are discarded and retried; JSON that breaks
//! the step contract is answered with a corrective observation. Both are
//! bounded so a confused model cannot spin forever.

pub mod error;
pub mod invoker;
pub mod loop_runner;
pub mod prompt;
pub mod stream_event;

#[cfg(test)]
mod test_helpers;

pub use error::AgentError;
pub use invoker::ToolInvoker;
pub use loop_runner::AgentLoop;
pub use prompt::system_instruction;
pub use stream_event::{AgentEvent, EventSink, NullSink};
