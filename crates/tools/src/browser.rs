//! Browser tool — open a URL with the platform's default opener.

use async_trait::async_trait;
use stepwise_core::error::ToolError;
use stepwise_core::session::SessionContext;
use stepwise_core::tool::{Tool, ToolResult, string_input};
use tracing::info;

/// Signature of the function that actually opens the URL.
pub type Opener = fn(&str) -> std::io::Result<()>;

pub struct LaunchBrowserTool {
    opener: Opener,
}

impl LaunchBrowserTool {
    pub fn new() -> Self {
        Self {
            opener: |url| open::that_detached(url),
        }
    }

    /// Swap the opener (tests, headless environments).
    pub fn with_opener(opener: Opener) -> Self {
        Self { opener }
    }
}

impl Default for LaunchBrowserTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for LaunchBrowserTool {
    fn name(&self) -> &str {
        "launch_browser"
    }

    fn description(&self) -> &str {
        "Open a URL in the default web browser, e.g. a dev server at http://localhost:5173."
    }

    fn input_description(&self) -> &str {
        "the URL, as a string"
    }

    async fn execute(
        &self,
        input: serde_json::Value,
        _session: &mut SessionContext,
    ) -> Result<ToolResult, ToolError> {
        let url = string_input(self.name(), &input, "url")?;
        let url = url.trim();
        if url.is_empty() {
            return Err(ToolError::InvalidInput {
                tool_name: self.name().into(),
                reason: "empty URL".into(),
            });
        }

        match (self.opener)(url) {
            Ok(()) => {
                info!(url = %url, "Opened browser");
                Ok(ToolResult::ok(format!("Opened browser at: {url}")))
            }
            Err(e) => Ok(ToolResult::failed(format!("Error opening browser: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_opened_url() {
        let tool = LaunchBrowserTool::with_opener(|_| Ok(()));
        let mut session = SessionContext::new(".");
        let result = tool
            .execute(serde_json::json!("http://localhost:5173"), &mut session)
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, "Opened browser at: http://localhost:5173");
    }

    #[tokio::test]
    async fn opener_failure_is_text() {
        let tool = LaunchBrowserTool::with_opener(|_| {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no browser"))
        });
        let mut session = SessionContext::new(".");
        let result = tool
            .execute(serde_json::json!("http://localhost:3000"), &mut session)
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.output, "Error opening browser: no browser");
    }

    #[tokio::test]
    async fn empty_url_is_invalid() {
        let tool = LaunchBrowserTool::with_opener(|_| Ok(()));
        let mut session = SessionContext::new(".");
        let result = tool.execute(serde_json::json!("  "), &mut session).await;
        assert!(matches!(result, Err(ToolError::InvalidInput { .. })));
    }
}
