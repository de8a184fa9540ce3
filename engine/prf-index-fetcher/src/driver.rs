use crate::config::{ErrorPolicy, FetcherConfig};
use crate::error::Result;
use crate::fetcher::HistoricalIndexFetcher;
use crate::ledger::CompletedLedger;
use crate::models::{GridId, RunReport};
use crate::pacing::{FixedPause, WaitPolicy};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Walks the configured grid list, one fetch at a time
pub struct BatchDriver {
    fetcher: HistoricalIndexFetcher,
    grids: Vec<GridId>,
    wait: Arc<dyn WaitPolicy>,
    error_policy: ErrorPolicy,
    completed_log: Option<PathBuf>,
}

impl BatchDriver {
    /// Create a driver using HTTP and a real fixed pause
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let fetcher = HistoricalIndexFetcher::new(config)?;
        Ok(Self::with_parts(config, fetcher, Arc::new(FixedPause::new(config.pause()))))
    }

    /// Create a driver from an existing fetcher and wait policy
    pub fn with_parts(
        config: &FetcherConfig,
        fetcher: HistoricalIndexFetcher,
        wait: Arc<dyn WaitPolicy>,
    ) -> Self {
        Self {
            fetcher,
            grids: config.grids.clone(),
            wait,
            error_policy: config.error_policy,
            completed_log: config.output.completed_log.clone(),
        }
    }

    /// Run the whole batch.
    ///
    /// Only setup problems (output directory, unreadable ledger) are errors;
    /// per-grid failures end up in the report.
    pub async fn run(&self) -> Result<RunReport> {
        info!(
            "Starting batch of {} grids into {}",
            self.grids.len(),
            self.fetcher.output_dir().display()
        );
        self.fetcher.prepare_output_dir().await?;

        let mut ledger = match &self.completed_log {
            Some(path) => {
                let ledger = CompletedLedger::open(path).await?;
                info!("Loaded {} completed grids from {}", ledger.len(), path.display());
                Some(ledger)
            }
            None => None,
        };

        let mut report = RunReport::new();
        let mut fetched_any = false;

        for &grid in &self.grids {
            let request = self.fetcher.request_for(grid, self.fetcher.default_range());
            if ledger.as_ref().is_some_and(|l| l.contains(&request)) {
                info!("Skipping grid {} (already completed)", grid);
                report.record_skipped();
                continue;
            }

            if fetched_any {
                self.wait.wait().await;
            }
            fetched_any = true;

            let outcome = self.fetcher.fetch_default(grid).await;

            if outcome.is_saved() {
                if let Some(ledger) = ledger.as_mut() {
                    if let Err(e) = ledger.mark_completed(&request, Utc::now()).await {
                        warn!("Failed to record grid {} in {}: {}", grid, ledger.path().display(), e);
                    }
                }
            }

            let halt = outcome.is_transport_failure() && self.error_policy == ErrorPolicy::Halt;
            report.record(grid, outcome);

            if halt {
                error!("Halting run at grid {} after transport failure", grid);
                report.halted_at = Some(grid);
                break;
            }
        }

        report.finish();
        info!(
            "Batch finished: {} requested, {} saved, {} failed, {} skipped",
            report.requested, report.saved, report.failed, report.skipped
        );

        Ok(report)
    }
}
