//! Tool trait — the abstraction over agent capabilities.
//!
//! Tools are what give the agent the ability to act in the world:
//! execute shell commands, read/write files, check the weather, etc.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ToolError;
use crate::session::SessionContext;

/// The result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the tool executed successfully
    pub success: bool,

    /// The output content
    pub output: String,
}

impl ToolResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    /// A handled failure. The text is still shown to the model.
    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }
}

/// A tool description rendered into the system instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// Human-readable description of the expected `input`
    pub input: String,
}

/// The core Tool trait.
///
/// Implementations catch their own faults: I/O failures come back as a
/// failed [`ToolResult`], and only malformed input is reported as a
/// [`ToolError`].
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "run_command", "read_file").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// The shape of `input` this tool expects.
    fn input_description(&self) -> &str;

    /// Execute the tool with the input exactly as the model supplied it.
    async fn execute(
        &self,
        input: serde_json::Value,
        session: &mut SessionContext,
    ) -> Result<ToolResult, ToolError>;

    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input: self.input_description().to_string(),
        }
    }
}

/// Extract a single string argument.
///
/// Accepts a bare JSON string, or an object carrying `key`.
pub fn string_input(
    tool_name: &str,
    input: &serde_json::Value,
    key: &str,
) -> Result<String, ToolError> {
    match input {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Object(map) => map
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| ToolError::InvalidInput {
                tool_name: tool_name.into(),
                reason: format!("expected a string or an object with '{key}'"),
            }),
        _ => Err(ToolError::InvalidInput {
            tool_name: tool_name.into(),
            reason: format!("expected a string '{key}'"),
        }),
    }
}

/// A registry of available tools, keyed by exact name.
///
/// Built once at startup and read-only while the agent loop runs.
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

    /// Get all tool definitions, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// List all registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
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
