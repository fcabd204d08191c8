//! Session context — the mutable ambient state shared by tools.
//!
//! Holds the working directory every file and command tool resolves
//! against, plus the background processes launched during the session.
//! One context per conversation; it is threaded through tool calls
//! explicitly rather than living in a global.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::process::Child;
use tracing::debug;

/// Mutable state scoped to one running conversation.
#[derive(Debug)]
pub struct SessionContext {
    cwd: PathBuf,
    background: Vec<BackgroundProcess>,
}

impl SessionContext {
    /// Create a session rooted at `cwd`.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            background: Vec::new(),
        }
    }

    /// Create a session rooted at the process launch directory.
    pub fn from_current_dir() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// The current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Replace the working directory. Callers validate the target first.
    pub fn set_cwd(&mut self, dir: impl Into<PathBuf>) {
        self.cwd = dir.into();
        debug!(cwd = %self.cwd.display(), "Working directory changed");
    }

    /// Resolve a tool-supplied path against the working directory.
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.cwd.join(path)
    }

    /// Retain a background process handle. Returns its session-local id.
    pub fn track(&mut self, command: impl Into<String>, child: Child) -> usize {
        let id = self.background.len() + 1;
        self.background.push(BackgroundProcess {
            id,
            command: command.into(),
            child,
            started_at: Utc::now(),
        });
        id
    }

    /// All background processes launched so far, oldest first.
    pub fn background(&self) -> &[BackgroundProcess] {
        &self.background
    }

    pub fn background_mut(&mut self) -> &mut [BackgroundProcess] {
        &mut self.background
    }
}

/// Observed state of a background process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessStatus {
    Running,
    /// Exited with the given code (`None` when killed by a signal).
    Exited(Option<i32>),
    Unknown(String),
}

/// An owned handle to a detached process such as a dev server.
///
/// The handle is never awaited by the agent loop; the process outlives
/// the session unless [`BackgroundProcess::terminate`] is called.
#[derive(Debug)]
pub struct BackgroundProcess {
    pub id: usize,
    pub command: String,
    pub started_at: DateTime<Utc>,
    child: Child,
}

impl BackgroundProcess {
    /// OS process id, if the process has not been reaped.
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Non-blocking status check.
    pub fn status(&mut self) -> ProcessStatus {
        match self.child.try_wait() {
            Ok(None) => ProcessStatus::Running,
            Ok(Some(status)) => ProcessStatus::Exited(status.code()),
            Err(e) => ProcessStatus::Unknown(e.to_string()),
        }
    }

    /// Kill the process and wait for it to exit.
    pub async fn terminate(&mut self) -> std::io::Result<()> {
        if matches!(self.status(), ProcessStatus::Exited(_)) {
            return Ok(());
        }
        self.child.kill().await
    }
}
