//! `taskpilot serve` — start the HTTP gateway.

use std::path::Path;

pub async fn run(path: Option<&Path>, port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(path)?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    if !config.has_api_key() {
        tracing::warn!("No API key configured; model calls will be rejected");
    }

    println!("taskpilot gateway");
    println!("   Listening: http://{}:{}", config.gateway.host, config.gateway.port);
    println!("   Store:     {}", config.store.backend);
    println!("   Model:     {}", config.default_model);

    taskpilot_gateway::start(config).await?;

    Ok(())
}
