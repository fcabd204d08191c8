//! File read tool — read a text file relative to the session working directory.

use async_trait::async_trait;
use stepwise_core::error::ToolError;
use stepwise_core::session::SessionContext;
use stepwise_core::tool::{Tool, ToolResult, string_input};

pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a text file."
    }

    fn input_description(&self) -> &str {
        "the file path, as a string"
    }

    async fn execute(
        &self,
        input: serde_json::Value,
        session: &mut SessionContext,
    ) -> Result<ToolResult, ToolError> {
        let file_path = string_input(self.name(), &input, "file_path")?;
        let full_path = session.resolve(&file_path);

        match tokio::fs::read_to_string(&full_path).await {
            Ok(content) => Ok(ToolResult::ok(format!(
                "Content of '{file_path}':\n{content}"
            ))),
            Err(e) => Ok(ToolResult::failed(format!(
                "Error reading file '{file_path}': {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join("test.txt")).unwrap();
        writeln!(f, "Hello, world!").unwrap();
        let mut session = SessionContext::new(dir.path());

        let result = ReadFileTool
            .execute(serde_json::json!("test.txt"), &mut session)
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.output.starts_with("Content of 'test.txt':\n"));
        assert!(result.output.contains("Hello, world!"));
    }

    #[tokio::test]
    async fn read_nonexistent_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionContext::new(dir.path());

        let result = ReadFileTool
            .execute(serde_json::json!("missing.txt"), &mut session)
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.output.contains("Error reading file 'missing.txt'"));
    }

    #[tokio::test]
    async fn missing_path_argument() {
        let mut session = SessionContext::new(".");
        let result = ReadFileTool.execute(serde_json::json!({}), &mut session).await;
        assert!(result.is_err());
    }
}
