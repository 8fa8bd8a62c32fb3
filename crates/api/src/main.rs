//! Arm-Ailment Band backend - Main Entry Point

use anyhow::Context;
use api::config::BandConfig;
use api::{init_logging, run_server};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = BandConfig::load().context("failed to load configuration")?;
    init_logging(&config.log)?;

    info!("=== Arm-Ailment Band backend v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Database {}, model {}",
        config.database.url,
        config.model.path.display()
    );

    run_server(config).await
}
