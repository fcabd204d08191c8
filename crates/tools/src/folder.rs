//! Folder tools — create directories and list their contents.

use async_trait::async_trait;
use stepwise_core::error::ToolError;
use stepwise_core::session::SessionContext;
use stepwise_core::tool::{Tool, ToolResult, string_input};

pub struct CreateFolderTool;

#[async_trait]
impl Tool for CreateFolderTool {
    fn name(&self) -> &str {
        "create_folder"
    }

    fn description(&self) -> &str {
        "Create a folder (and any missing parents) relative to the working directory."
    }

    fn input_description(&self) -> &str {
        "the folder path, as a string"
    }

    async fn execute(
        &self,
        input: serde_json::Value,
        session: &mut SessionContext,
    ) -> Result<ToolResult, ToolError> {
        let folder_path = string_input(self.name(), &input, "folder_path")?;
        let full_path = session.resolve(&folder_path);

        match tokio::fs::create_dir_all(&full_path).await {
            Ok(()) => Ok(ToolResult::ok(format!(
                "Folder '{}' created.",
                full_path.display()
            ))),
            Err(e) => Ok(ToolResult::failed(format!(
                "Error creating folder '{folder_path}': {e}"
            ))),
        }
    }
}

pub struct ListFolderTool;

#[async_trait]
impl Tool for ListFolderTool {
    fn name(&self) -> &str {
        "list_folder_contents"
    }

    fn description(&self) -> &str {
        "List the entries of a folder. Directories are shown with a trailing '/'."
    }

    fn input_description(&self) -> &str {
        "the folder path, as a string (defaults to \".\")"
    }

    async fn execute(
        &self,
        input: serde_json::Value,
        session: &mut SessionContext,
    ) -> Result<ToolResult, ToolError> {
        let folder_path = match &input {
            serde_json::Value::Null => ".".to_string(),
            serde_json::Value::String(s) if s.trim().is_empty() => ".".to_string(),
            other => string_input(self.name(), other, "folder_path")?,
        };
        let full_path = session.resolve(&folder_path);

        let mut reader = match tokio::fs::read_dir(&full_path).await {
            Ok(reader) => reader,
            Err(e) => {
                return Ok(ToolResult::failed(format!(
                    "Error listing folder '{folder_path}': {e}"
                )));
            }
        };

        let mut entries = Vec::new();
        loop {
            match reader.next_entry().await {
                Ok(Some(entry)) => {
                    let mut name = entry.file_name().to_string_lossy().into_owned();
                    if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
                        name.push('/');
                    }
                    entries.push(name);
                }
                Ok(None) => break,
                Err(e) => {
                    return Ok(ToolResult::failed(format!(
                        "Error listing folder '{folder_path}': {e}"
                    )));
                }
            }
        }

        if entries.is_empty() {
            return Ok(ToolResult::ok(format!(
                "Folder '{}' is empty.",
                full_path.display()
            )));
        }

        entries.sort();
        Ok(ToolResult::ok(format!(
            "Contents of '{}':\n{}",
            full_path.display(),
            entries.join("\n")
        )))
    }
}
