//! `notewire serve`: Start the HTTP webhook server.

use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    port_override: Option<u16>,
    host_override: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config =
        super::load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }
    if let Some(host) = host_override {
        config.gateway.host = host;
    }

    println!("📝 Notewire Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Webhook:   POST /webhook");
    println!("   Events:    POST /invoke");

    notewire_gateway::start(config).await?;

    Ok(())
}
