//! `stepwise chat` — Interactive or single-message chat mode.

use std::sync::Arc;

use stepwise_agent::AgentLoop;
use stepwise_config::{API_KEY_VARS, AppConfig};
use stepwise_core::session::{ProcessStatus, SessionContext};
use tokio::io::BufReader;

use super::terminal::{TerminalSink, spawn_query_reader};

/// Providers that run locally and need no key.
const KEYLESS_PROVIDERS: &[&str] = &["ollama", "vllm"];

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early — give a clear error
    if !config.has_api_key() && !KEYLESS_PROVIDERS.contains(&config.default_provider.as_str()) {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables (or put it in a .env file):");
        for var in API_KEY_VARS {
            eprintln!("    {var}");
        }
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    // Build provider from config
    let router = stepwise_providers::router::build_from_config(&config);
    let provider = router.default().ok_or("No default provider configured")?;

    let tools = Arc::new(stepwise_tools::default_registry(&config.tools));
    let tool_names = tools.names().join(", ");

    let mut agent = AgentLoop::new(
        provider,
        &config.default_model,
        config.default_temperature,
        tools,
    )
    .with_max_tokens(config.default_max_tokens)
    .with_max_decode_retries(config.agent.max_decode_retries)
    .with_max_protocol_errors(config.agent.max_protocol_errors);

    let mut conversation =
        agent.new_conversation(config.agent.system_prompt_override.as_deref());
    let mut session = SessionContext::from_current_dir()?;
    let sink = TerminalSink;

    if let Some(msg) = message {
        // Single message mode
        return match agent
            .process_query(&mut conversation, &mut session, &msg, &sink)
            .await
        {
            Ok(_) => {
                report_background(&mut session);
                Ok(())
            }
            Err(_) => Err("Query aborted".into()),
        };
    }

    // Interactive mode
    println!();
    println!("  Stepwise — interactive mode");
    println!();
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {}", config.default_model);
    println!("  Tools:     {tool_names}");
    println!("  Directory: {}", session.cwd().display());
    println!();
    println!("  Type your request and press Enter.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let mut queries = spawn_query_reader(BufReader::new(tokio::io::stdin()));
    agent
        .run(&mut conversation, &mut session, &mut queries, &sink)
        .await;

    println!();
    report_background(&mut session);
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}

/// Background processes are left running; tell the user about them.
fn report_background(session: &mut SessionContext) {
    let running = running_background(session);
    if running.is_empty() {
        return;
    }

    println!("  Still running in the background:");
    for line in running {
        println!("{line}");
    }
    println!();
}

/// One line per background process that has not exited yet.
fn running_background(session: &mut SessionContext) -> Vec<String> {
    let mut running = Vec::new();
    for process in session.background_mut() {
        if process.status() != ProcessStatus::Running {
            continue;
        }
        let started = process.started_at.with_timezone(&chrono::Local).format("%H:%M:%S");
        running.push(match process.pid() {
            Some(pid) => format!(
                "    [{}] {} (pid {pid}, started {started})",
                process.id, process.command
            ),
            None => format!("    [{}] {} (started {started})", process.id, process.command),
        });
    }
    running
}
