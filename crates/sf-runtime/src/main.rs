//! # Storefront Runtime
//!
//! Process entry point for the storefront backend core.

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sf_runtime::{StorefrontConfig, StorefrontRuntime};

fn init_tracing(fallback_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = StorefrontConfig::from_env().context("failed to load configuration")?;
    init_tracing(&config.logging_level)?;

    for warning in config.placeholder_warnings() {
        warn!("Configuration: {}", warning);
    }

    let runtime = StorefrontRuntime::start(&config).context("failed to start storefront runtime")?;

    info!("Storefront runtime is running. Press Ctrl+C to stop.");
    runtime.run_until(tokio::signal::ctrl_c()).await;

    Ok(())
}
