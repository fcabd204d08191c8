//! File creation tool — write a file under the session working directory.

use async_trait::async_trait;
use stepwise_core::error::ToolError;
use stepwise_core::session::SessionContext;
use stepwise_core::tool::{Tool, ToolResult};

pub struct CreateFileTool;

impl CreateFileTool {
    /// `create_file` only accepts `{"file_path": string, "content": string}`.
    fn parse_input(input: &serde_json::Value) -> Result<(String, String), ToolError> {
        let invalid = |reason: &str| ToolError::InvalidInput {
            tool_name: "create_file".into(),
            reason: reason.into(),
        };

        let map = input
            .as_object()
            .ok_or_else(|| invalid("expected an object with 'file_path' and 'content'"))?;
        let file_path = map
            .get("file_path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| invalid("missing string 'file_path'"))?;
        let content = map
            .get("content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| invalid("missing string 'content'"))?;

        Ok((file_path.to_string(), content.to_string()))
    }
}

#[async_trait]
impl Tool for CreateFileTool {
    fn name(&self) -> &str {
        "create_file"
    }

    fn description(&self) -> &str {
        "Write content to a file relative to the working directory. Creates parent \
         directories as needed and overwrites existing files."
    }

    fn input_description(&self) -> &str {
        "an object {\"file_path\": string, \"content\": string}"
    }

    async fn execute(
        &self,
        input: serde_json::Value,
        session: &mut SessionContext,
    ) -> Result<ToolResult, ToolError> {
        let (file_path, content) = Self::parse_input(&input)?;
        let full_path = session.resolve(&file_path);

        // Ensure parent directory exists
        if let Some(parent) = full_path.parent()
            && let Err(e) = tokio::fs::create_dir_all(parent).await
        {
            return Ok(ToolResult::failed(format!(
                "Error creating file '{file_path}': {e}"
            )));
        }

        match tokio::fs::write(&full_path, &content).await {
            Ok(()) => Ok(ToolResult::ok(format!(
                "File '{}' created.",
                full_path.display()
            ))),
            Err(e) => Ok(ToolResult::failed(format!(
                "Error creating file '{file_path}': {e}"
            ))),
        }
    }
}
