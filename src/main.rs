//! # Concord
//!
//! Application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Database connection pool
//! - Redis connection (invite store)
//! - HTTP/WebSocket server

use anyhow::Result;
use tracing::info;

use concord::config::Settings;
use concord::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    concord::telemetry::init_tracing();

    info!("Starting Concord...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
