//! `stepwise config` — Show the effective configuration.

use stepwise_config::AppConfig;

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let config_path = AppConfig::config_dir().join("config.toml");

    let source = if config_path.exists() {
        config_path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", config_path.display())
    };
    println!("# {source}");
    let router = stepwise_providers::router::build_from_config(&config);
    println!(
        "# providers: {} (default: {})",
        router.list().join(", "),
        config.default_provider
    );
    if !config.has_api_key() {
        println!("# ⚠️  No API key set");
    }
    println!();
    println!("{}", config.to_redacted_toml());
    Ok(())
}
