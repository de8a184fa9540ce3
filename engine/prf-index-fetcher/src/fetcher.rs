use crate::client::{ExportClient, ReqwestExportClient};
use crate::config::FetcherConfig;
use crate::error::Result;
use crate::models::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Downloads one grid's historical index export and saves it to disk
pub struct HistoricalIndexFetcher {
    client: Arc<dyn ExportClient>,
    output_dir: PathBuf,
    format: ExportFormat,
    default_range: YearRange,
}

impl HistoricalIndexFetcher {
    /// Create a fetcher talking to the configured endpoint over HTTP
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = ReqwestExportClient::new(config)?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Create a fetcher using any export client
    pub fn with_client(config: &FetcherConfig, client: Arc<dyn ExportClient>) -> Self {
        Self {
            client,
            output_dir: config.output.dir.clone(),
            format: config.export.format,
            default_range: config.year_range(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn default_range(&self) -> YearRange {
        self.default_range
    }

    /// Create the output directory if it does not exist yet
    pub async fn prepare_output_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        Ok(())
    }

    /// Request this fetcher would send for `grid` over `range`
    pub fn request_for(&self, grid: GridId, range: YearRange) -> ExportRequest {
        ExportRequest::new(grid, range, self.format)
    }

    /// Fetch `grid` over the configured default year range
    pub async fn fetch_default(&self, grid: GridId) -> FetchOutcome {
        self.fetch(grid, self.default_range).await
    }

    /// Fetch one grid and persist the body.
    ///
    /// Never fails: every problem is logged and returned as a non-saved outcome.
    pub async fn fetch(&self, grid: GridId, range: YearRange) -> FetchOutcome {
        let request = self.request_for(grid, range);
        info!("Downloading grid {} ({})...", grid, range);

        let response = match self.client.fetch_export(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to fetch grid {}: {}", grid, e);
                return FetchOutcome::TransportFailed { message: e.to_string() };
            }
        };

        if response.status != 200 {
            warn!("Failed to fetch grid {}: {}", grid, response.status);
            return FetchOutcome::BadStatus { status: response.status };
        }

        if response.body.is_empty() {
            warn!("Failed to fetch grid {}: {} (empty body)", grid, response.status);
            return FetchOutcome::EmptyBody { status: response.status };
        }

        let path = request.output_path(&self.output_dir);
        match tokio::fs::write(&path, &response.body).await {
            Ok(()) => {
                info!("Saved {}", path.display());
                FetchOutcome::Saved { path, bytes: response.body.len() }
            }
            Err(e) => {
                warn!("Failed to write {} for grid {}: {}", path.display(), grid, e);
                FetchOutcome::WriteFailed { path, message: e.to_string() }
            }
        }
    }
}
