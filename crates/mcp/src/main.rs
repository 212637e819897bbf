//! Travel desk MCP server binary.
//!
//! ```bash
//! # Local SQLite warehouse from travel.toml or defaults
//! travel-mcp
//!
//! # With the remote toolbox
//! TRAVEL_TOOLBOX_ENABLED=true TRAVEL_TOOLBOX_URL=http://127.0.0.1:5000 travel-mcp
//! ```

use anyhow::Result;
use travel_core::config::{AppConfig, LoadOptions};
use travel_mcp::{bootstrap_with_config, TravelMcpServer};

/// Logs go to stderr; stdout carries the protocol.
fn init_logging(config: &AppConfig) {
    use tracing::Level;
    use travel_core::config::LogFormat::*;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_max_level(log_level);

    match config.logging.format {
        Compact => builder.compact().init(),
        Pretty => builder.pretty().init(),
        Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap_with_config(config).await?;
    tracing::info!(
        event_name = "system.mcp.ready",
        tools = ?app.runtime.registry().names(),
        table = %app.config.warehouse.table_ref(),
        "travel desk MCP server ready"
    );

    TravelMcpServer::new(app.runtime.clone()).run_stdio().await?;
    app.db_pool.close().await;
    Ok(())
}
