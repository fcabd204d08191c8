//! Built-in tool implementations for Stepwise.
//!
//! Tools give the agent the ability to interact with the world:
//! run shell commands, create and read files, list folders, check the
//! weather, and open a browser. Every file and command tool resolves
//! paths against the session's working directory.

pub mod browser;
pub mod file_read;
pub mod file_write;
pub mod folder;
pub mod shell;
pub mod weather_lookup;

use stepwise_config::ToolsConfig;
use stepwise_core::tool::ToolRegistry;

pub use browser::LaunchBrowserTool;
pub use file_read::ReadFileTool;
pub use file_write::CreateFileTool;
pub use folder::{CreateFolderTool, ListFolderTool};
pub use shell::ShellTool;
pub use weather_lookup::WeatherLookupTool;

/// Create a tool registry with all built-in tools.
pub fn default_registry(config: &ToolsConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(WeatherLookupTool::new(&config.weather_url)));
    registry.register(Box::new(ShellTool::new(
        config.command_timeout_secs,
        config.dev_server_patterns.clone(),
    )));
    registry.register(Box::new(CreateFileTool));
    registry.register(Box::new(CreateFolderTool));
    registry.register(Box::new(ReadFileTool));
    registry.register(Box::new(ListFolderTool));
    registry.register(Box::new(LaunchBrowserTool::new()));
    registry
}
