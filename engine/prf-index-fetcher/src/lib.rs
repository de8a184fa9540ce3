//! PRF Historical Index Fetcher
//!
//! Downloads the historical index export for each configured grid and writes the
//! raw response body to disk, one request at a time with a fixed pause in between.

pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod fetcher;
pub mod ledger;
pub mod models;
pub mod pacing;


pub use client::{ExportClient, ReqwestExportClient};
pub use config::FetcherConfig;
pub use driver::BatchDriver;
pub use error::{FetchError, Result};
pub use fetcher::HistoricalIndexFetcher;
pub use models::*;
pub use pacing::{FixedPause, WaitPolicy};
