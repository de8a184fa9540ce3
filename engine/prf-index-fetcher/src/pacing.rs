//! Throttling between consecutive requests

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

/// Decides how long to wait between two requests
#[async_trait]
pub trait WaitPolicy: Send + Sync {
    /// Called once between every pair of consecutive fetches
    async fn wait(&self);
}

/// Blocks the run for a constant interval
#[derive(Debug, Clone, Copy)]
pub struct FixedPause {
    interval: Duration,
}

impl FixedPause {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[async_trait]
impl WaitPolicy for FixedPause {
    async fn wait(&self) {
        if !self.interval.is_zero() {
            sleep(self.interval).await;
        }
    }
}
