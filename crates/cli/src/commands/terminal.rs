//! Terminal rendering of agent events and the stdin query reader.

use std::io::Write;

use stepwise_agent::{AgentEvent, EventSink};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::warn;

/// Prints agent events the way the REPL shows them.
pub struct TerminalSink;

impl EventSink for TerminalSink {
    fn emit(&self, event: AgentEvent) {
        match event {
            AgentEvent::AwaitingQuery => prompt(),
            AgentEvent::Plan { content } => println!("🧠: {content}"),
            AgentEvent::ToolCall { name, input } => {
                println!("🛠️: Calling Tool: {name} with input '{}'", display_input(&input));
            }
            AgentEvent::ToolNotFound { name } => println!("❌ Tool '{name}' not found."),
            // The model sees observations; the user sees the next step.
            AgentEvent::Observation { .. } => {}
            AgentEvent::Answer { content } => println!("🤖: {content}"),
            AgentEvent::DecodeRetry { .. } => {
                println!("❌ Error: Model returned non-JSON response. Retrying...");
            }
            AgentEvent::ProtocolError { reason } => {
                println!("❌ Protocol error: {reason}. Asking the model to correct itself...");
            }
            AgentEvent::Error { message } => eprintln!("🔥 {message}"),
        }
    }
}

/// Strings are shown bare, everything else as compact JSON.
pub fn display_input(input: &serde_json::Value) -> String {
    match input {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Forward non-empty lines from `reader` as queries.
///
/// The channel closes on EOF, on a read error, or when the user types
/// `exit` or `quit`.
pub fn spawn_query_reader<R>(reader: R) -> mpsc::Receiver<String>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(32);

    tokio::spawn(async move {
        let mut lines = reader.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        prompt();
                        continue;
                    }

                    if is_exit_command(&line) {
                        break;
                    }

                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break, // EOF (Ctrl+D)
                Err(e) => {
                    warn!("Failed to read from stdin: {e}");
                    break;
                }
            }
        }
    });

    rx
}

fn is_exit_command(line: &str) -> bool {
    matches!(line.to_ascii_lowercase().as_str(), "exit" | "quit")
}
