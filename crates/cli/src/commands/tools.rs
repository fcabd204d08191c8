//! `stepwise tools` — List the tools available to the agent.

use stepwise_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let registry = stepwise_tools::default_registry(&config.tools);

    println!("🛠️  {} tools available:", registry.len());
    println!();
    for tool in registry.definitions() {
        println!("  {:<22} {}", tool.name, tool.description);
        println!("  {:<22} input: {}", "", tool.input);
    }
    println!();
    println!(
        "  Commands time out after {}s; these start in the background: {}",
        config.tools.command_timeout_secs,
        config.tools.dev_server_patterns.join(", ")
    );

    Ok(())
}
