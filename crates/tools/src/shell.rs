//! Shell tool — execute system commands in the session working directory.
//!
//! Three paths through one tool:
//! - `cd <dir>` changes the session working directory without spawning anything
//! - commands matching a dev-server pattern are launched detached and tracked
//! - everything else runs in the foreground under a wall-clock timeout

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use stepwise_core::error::ToolError;
use stepwise_core::session::SessionContext;
use stepwise_core::tool::{Tool, ToolResult, string_input};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Project generators; these finish on their own even when the project they
/// create is named after a dev server.
const SCAFFOLD_COMMANDS: &[&str] = &[
    "npm create",
    "npm init",
    "npx create-",
    "yarn create",
    "pnpm create",
];

/// Execute shell commands on behalf of the model.
pub struct ShellTool {
    timeout_secs: u64,
    /// Substrings that mark a command as long-running.
    background_patterns: Vec<String>,
}

impl ShellTool {
    pub fn new(timeout_secs: u64, background_patterns: Vec<String>) -> Self {
        Self {
            timeout_secs,
            background_patterns,
        }
    }

    fn is_background(&self, command: &str) -> bool {
        if SCAFFOLD_COMMANDS.iter().any(|s| command.contains(s)) {
            return false;
        }
        self.background_patterns
            .iter()
            .any(|p| !p.is_empty() && command.contains(p.as_str()))
    }

    async fn change_directory(
        &self,
        target: &str,
        rest: Option<&str>,
        session: &mut SessionContext,
    ) -> ToolResult {
        let candidate = session.resolve(target);
        let is_dir = tokio::fs::metadata(&candidate)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);

        if target.is_empty() || !is_dir {
            return ToolResult::failed(format!("Directory does not exist: {target}"));
        }

        let resolved = tokio::fs::canonicalize(&candidate).await.unwrap_or(candidate);
        session.set_cwd(&resolved);

        let mut output = format!("Changed working directory to: {}", resolved.display());
        if let Some(rest) = rest {
            output.push_str(&format!(
                "\nNote: `{rest}` was not executed; send it as a separate command."
            ));
        }
        ToolResult::ok(output)
    }

    fn shell_command(command: &str) -> Command {
        if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        }
    }

    fn spawn_background(&self, command: &str, session: &mut SessionContext) -> ToolResult {
        let spawned = Self::shell_command(command)
            .current_dir(session.cwd())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(child) => {
                let pid = child.id();
                let id = session.track(command, child);
                info!(command = %command, id, pid = ?pid, "Started background process");
                ToolResult::ok(format!("Started background process for: `{command}`"))
            }
            Err(e) => ToolResult::failed(format!("Error executing command '{command}': {e}")),
        }
    }

    async fn run_foreground(&self, command: &str, session: &SessionContext) -> ToolResult {
        let child = Self::shell_command(command)
            .current_dir(session.cwd())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(Duration::from_secs(self.timeout_secs), child).await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return ToolResult::failed(format!("Error executing command '{command}': {e}"));
            }
            Err(_) => {
                warn!(command = %command, timeout_secs = self.timeout_secs, "Command timed out");
                return ToolResult::failed(format!(
                    "Command '{command}' timed out after {} seconds.",
                    self.timeout_secs
                ));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if output.status.success() {
            ToolResult::ok(format!(
                "Command '{command}' executed successfully.\nOutput:\n{}",
                stdout.trim()
            ))
        } else {
            let code = output.status.code().unwrap_or(-1);
            warn!(command = %command, exit_code = code, "Command failed");
            let mut text = format!(
                "Command '{command}' failed with exit code {code}.\nStderr:\n{}",
                stderr.trim()
            );
            if !stdout.trim().is_empty() {
                text.push_str(&format!("\nOutput:\n{}", stdout.trim()));
            }
            ToolResult::failed(text)
        }
    }
}

/// Split a `cd <dir> [&& rest]` command into its target and remainder.
fn parse_change_directory(command: &str) -> Option<(&str, Option<&str>)> {
    let rest = command.trim().strip_prefix("cd ")?;
    let (target, remainder) = match rest.split_once("&&") {
        Some((target, remainder)) => (target, Some(remainder.trim()).filter(|r| !r.is_empty())),
        None => (rest, None),
    };
    Some((target.trim(), remainder))
}

#[async_trait]
impl Tool for ShellTool {
    fn name(&self) -> &str {
        "run_command"
    }

    fn description(&self) -> &str {
        "Execute a shell command in the current working directory and return its output. \
         `cd <dir>` changes the working directory for later commands. Dev servers \
         (npm start, npm run dev, vite) are started in the background."
    }

    fn input_description(&self) -> &str {
        "the command line, as a string"
    }

    async fn execute(
        &self,
        input: serde_json::Value,
        session: &mut SessionContext,
    ) -> Result<ToolResult, ToolError> {
        let command = string_input(self.name(), &input, "command")?;
        if command.trim().is_empty() {
            return Err(ToolError::InvalidInput {
                tool_name: self.name().into(),
                reason: "empty command".into(),
            });
        }

        if let Some((target, rest)) = parse_change_directory(&command) {
            return Ok(self.change_directory(target, rest, session).await);
        }

        if self.is_background(&command) {
            return Ok(self.spawn_background(&command, session));
        }

        debug!(command = %command, cwd = %session.cwd().display(), "Executing shell command");
        Ok(self.run_foreground(&command, session).await)
    }
}
