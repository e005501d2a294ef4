//! Where chunks get submitted.
//!
//! [`BulkEndpoint`] abstracts the far side of a run so the runner can be
//! driven against an HTTP API in production and an in-memory fake in
//! tests.

use async_trait::async_trait;
use tagsweep_core::bulk::{BulkRequestBody, BulkResponse};
use tagsweep_core::entity::EntityKind;

use crate::error::EngineError;

/// A sink for one chunk of a bulk operation.
#[async_trait]
pub trait BulkEndpoint: Send + Sync {
    /// Submit one chunk and return the endpoint's accounting for it.
    async fn submit(
        &self,
        kind: EntityKind,
        body: &BulkRequestBody,
    ) -> Result<BulkResponse, EngineError>;
}

/// Submits chunks to a tagsweep API server over HTTP.
pub struct HttpBulkEndpoint {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBulkEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BulkEndpoint for HttpBulkEndpoint {
    async fn submit(
        &self,
        kind: EntityKind,
        body: &BulkRequestBody,
    ) -> Result<BulkResponse, EngineError> {
        let url = bulk_url(&self.base_url, kind);
        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

fn bulk_url(base_url: &str, kind: EntityKind) -> String {
    format!("{base_url}/api/v1/{}/tags/bulk", kind.noun_plural())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
