//! The agent reasoning loop implementation.

use std::sync::Arc;

use stepwise_core::agent::{AgentState, LoopState};
use stepwise_core::error::ReplyError;
use stepwise_core::message::{Conversation, Turn};
use stepwise_core::provider::{Provider, ProviderRequest};
use stepwise_core::reply::{Observation, ReplyStep, parse_reply};
use stepwise_core::session::SessionContext;
use stepwise_core::tool::ToolRegistry;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::AgentError;
use crate::invoker::ToolInvoker;
use crate::prompt;
use crate::stream_event::{AgentEvent, EventSink};

/// The core agent loop that drives the plan → action → observe protocol.
pub struct AgentLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,

    /// Tool dispatch
    invoker: ToolInvoker,

    /// Abort a query after this many consecutive non-JSON replies
    max_decode_retries: u32,

    /// Abort a query after this many consecutive step-contract violations
    max_protocol_errors: u32,

    /// Protocol state and counters
    state: AgentState,
}

impl AgentLoop {
    /// Create a new agent loop.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            invoker: ToolInvoker::new(tools),
            max_decode_retries: 3,
            max_protocol_errors: 3,
            state: AgentState::default(),
        }
    }

    /// Set the default max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: Option<u32>) -> Self {
        self.max_tokens = max;
        self
    }

    pub fn with_max_decode_retries(mut self, max: u32) -> Self {
        self.max_decode_retries = max;
        self
    }

    pub fn with_max_protocol_errors(mut self, max: u32) -> Self {
        self.max_protocol_errors = max;
        self
    }

    /// Current protocol state and counters.
    pub fn state(&self) -> &AgentState {
        &self.state
    }

    /// Start a conversation whose first turn is the system instruction.
    pub fn new_conversation(&self, prompt_override: Option<&str>) -> Conversation {
        let instruction = prompt::system_instruction(&self.invoker.definitions(), prompt_override);
        Conversation::with_instruction(instruction)
    }

    /// Serve queries from `queries` until the channel closes.
    ///
    /// Aborted queries are reported through `events` and the loop goes
    /// back to waiting; nothing here ends the session except the channel.
    pub async fn run(
        &mut self,
        conversation: &mut Conversation,
        session: &mut SessionContext,
        queries: &mut mpsc::Receiver<String>,
        events: &dyn EventSink,
    ) {
        loop {
            self.state.state = LoopState::AwaitingQuery;
            events.emit(AgentEvent::AwaitingQuery);

            let Some(query) = queries.recv().await else {
                break;
            };

            if let Err(e) = self.process_query(conversation, session, &query, events).await {
                debug!(error = %e, "Query aborted, awaiting the next one");
            }
        }

        info!(
            queries = self.state.queries_processed,
            tool_calls = self.state.tool_calls,
            "Input closed, agent loop finished"
        );
    }

    /// Handle one user query through to the model's final answer.
    ///
    /// Appends the query as a user turn, then alternates between the
    /// model and tools until an `output` step arrives.
    pub async fn process_query(
        &mut self,
        conversation: &mut Conversation,
        session: &mut SessionContext,
        query: &str,
        events: &dyn EventSink,
    ) -> Result<String, AgentError> {
        info!(
            conversation_id = %conversation.id,
            provider = self.provider.name(),
            turns = conversation.len(),
            "Processing query"
        );

        conversation.push(Turn::user(query));
        let result = self.drive(conversation, session, events).await;

        match &result {
            Ok(_) => {
                self.state.state = LoopState::Concluded;
                self.state.queries_processed += 1;
            }
            Err(e) => {
                warn!(conversation_id = %conversation.id, error = %e, "Query aborted");
                events.emit(AgentEvent::Error {
                    message: e.to_string(),
                });
            }
        }

        self.state.state = LoopState::AwaitingQuery;
        result
    }

    async fn drive(
        &mut self,
        conversation: &mut Conversation,
        session: &mut SessionContext,
        events: &dyn EventSink,
    ) -> Result<String, AgentError> {
        let mut decode_failures = 0u32;
        let mut protocol_errors = 0u32;
        let mut iteration = 0u32;

        loop {
            iteration += 1;
            self.state.state = LoopState::Planning;
            debug!(
                conversation_id = %conversation.id,
                iteration,
                "Agent loop iteration"
            );

            let request = ProviderRequest {
                model: self.model.clone(),
                turns: conversation.snapshot(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                json_mode: true,
            };

            let response = self.provider.complete(request).await?;
            if let Some(usage) = &response.usage {
                self.state.total_tokens += u64::from(usage.total_tokens);
            }

            conversation.push(Turn::model(&response.text));

            let step = match parse_reply(&response.text) {
                Ok(step) => step,
                Err(ReplyError::Decode(reason)) => {
                    conversation.rollback_model_turn();
                    decode_failures += 1;
                    warn!(attempt = decode_failures, %reason, "Model returned non-JSON response");

                    if decode_failures >= self.max_decode_retries {
                        return Err(AgentError::TooManyDecodeFailures {
                            attempts: decode_failures,
                            last: reason,
                        });
                    }
                    events.emit(AgentEvent::DecodeRetry {
                        reason,
                        attempt: decode_failures,
                    });
                    continue;
                }
                Err(ReplyError::Protocol(reason)) => {
                    decode_failures = 0;
                    protocol_errors += 1;
                    warn!(attempt = protocol_errors, %reason, "Reply broke the step contract");

                    if protocol_errors >= self.max_protocol_errors {
                        return Err(AgentError::TooManyProtocolErrors {
                            attempts: protocol_errors,
                            last: reason,
                        });
                    }
                    events.emit(AgentEvent::ProtocolError {
                        reason: reason.clone(),
                    });
                    let correction = Observation::new(format!(
                        "Protocol error: {reason}. Reply with exactly one JSON object whose \
                         step is plan, action or output."
                    ));
                    conversation.push(Turn::user(correction.to_turn_text()));
                    continue;
                }
            };

            decode_failures = 0;
            protocol_errors = 0;
            debug!(step = step.kind(), "Model reply decoded");

            match step {
                ReplyStep::Plan { content } => {
                    events.emit(AgentEvent::Plan { content });
                }
                ReplyStep::Action { function, input } => {
                    self.state.state = LoopState::Acting;
                    events.emit(AgentEvent::ToolCall {
                        name: function.clone(),
                        input: input.clone(),
                    });
                    if !self.invoker.contains(&function) {
                        events.emit(AgentEvent::ToolNotFound {
                            name: function.clone(),
                        });
                    }

                    let observation = self.invoker.invoke(&function, input, session).await;
                    self.state.tool_calls += 1;

                    self.state.state = LoopState::Observing;
                    events.emit(AgentEvent::Observation {
                        name: function,
                        output: observation.output.clone(),
                    });
                    conversation.push(Turn::user(observation.to_turn_text()));
                }
                ReplyStep::Output { content } => {
                    events.emit(AgentEvent::Answer {
                        content: content.clone(),
                    });
                    return Ok(content);
                }
            }
        }
    }
}
