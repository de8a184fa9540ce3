use anyhow::Context;
use prf_index_fetcher::{BatchDriver, FetcherConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting PRF historical index fetcher");

    let config = FetcherConfig::load().context("Failed to load configuration")?;
    info!("Loaded configuration: {:?}", config);

    let driver = BatchDriver::new(&config).context("Failed to create HTTP client")?;

    // Individual grid failures are logged by the driver and do not change the exit code
    driver.run().await.context("Batch run could not start")?;

    Ok(())
}
