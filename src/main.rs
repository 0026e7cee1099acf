use anyhow::Context;
use tracing::info;

use travelhub::config::AppConfig;
use travelhub::credentials::Credentials;
use travelhub::{telemetry, web};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    let _telemetry = telemetry::init(&config.logging)?;

    info!("Starting travelhub {}", travelhub::VERSION);
    web::run(config, Credentials::Environment).await
}
