//! Stepwise CLI — the main entry point.
//!
//! Commands:
//! - `chat`    — Interactive chat or single-message mode (the default)
//! - `tools`   — List the tools the agent can call
//! - `config`  — Show the effective configuration

use clap::{Parser, Subcommand};
use stepwise_config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "stepwise",
    about = "Stepwise — a plan, act, observe agent for your terminal",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the agent
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// List the available tools
    Tools,

    /// Show the effective configuration (secrets redacted)
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // .env in the working directory wins over the one in the config dir.
    let _ = dotenvy::from_filename(".env");
    let _ = dotenvy::from_path(AppConfig::config_dir().join(".env"));

    // Logs go to stderr so they never interleave with the conversation.
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        None => commands::chat::run(None).await?,
        Some(Commands::Chat { message }) => commands::chat::run(message).await?,
        Some(Commands::Tools) => commands::tools::run().await?,
        Some(Commands::Config) => commands::config_cmd::show().await?,
    }

    Ok(())
}
