//! HTTP access to the export endpoint

use crate::config::FetcherConfig;
use crate::error::Result;
use crate::models::{ExportRequest, ExportResponse};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Source of export bytes for a single request
#[async_trait]
pub trait ExportClient: Send + Sync {
    /// Perform one request. Transport failures are returned as errors;
    /// any HTTP status, including non-200, is a successful response.
    async fn fetch_export(&self, request: &ExportRequest) -> Result<ExportResponse>;
}

/// Export client backed by reqwest
pub struct ReqwestExportClient {
    client: Client,
    base_url: String,
}

impl ReqwestExportClient {
    /// Create a client for the configured endpoint
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_client(builder.build()?, config.export.base_url.clone()))
    }

    /// Wrap an already configured reqwest client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into() }
    }

    /// Build the GET request for `request` without sending it
    pub fn build_request(&self, request: &ExportRequest) -> Result<reqwest::Request> {
        Ok(self.client.get(&self.base_url).query(&request.query_pairs()).build()?)
    }
}

#[async_trait]
impl ExportClient for ReqwestExportClient {
    async fn fetch_export(&self, request: &ExportRequest) -> Result<ExportResponse> {
        let http_request = self.build_request(request)?;
        debug!("GET {}", http_request.url());

        let response = self.client.execute(http_request).await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(ExportResponse { status, body: body.to_vec() })
    }
}
