//! Catalog sources.
//!
//! The engine only sees already-decoded [`DistributionCatalogEntry`] values;
//! these sources do the fetching and decoding.

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use clustermatrix_core::{ClusterVersionCatalog, DistributionCatalogEntry};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Something that can produce the current version catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<DistributionCatalogEntry>>;
}

/// Decode a `{ "cluster-versions": [...] }` document.
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<DistributionCatalogEntry>> {
    let catalog: ClusterVersionCatalog = serde_json::from_slice(bytes)?;
    Ok(catalog.cluster_versions)
}

/// Authenticated HTTPS catalog source
pub struct HttpCatalogSource {
    config: CatalogConfig,
    http_client: reqwest::Client,
}

impl HttpCatalogSource {
    /// Create a new HTTPS source
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("clustermatrix/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(HttpCatalogSource {
            config,
            http_client,
        })
    }

    /// Create a source from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(CatalogConfig::from_env())
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Vec<DistributionCatalogEntry>> {
        let token = self
            .config
            .token
            .as_deref()
            .ok_or(CatalogError::NotConfigured)?;

        info!(url = %self.config.url, "Fetching cluster version catalog");

        let response = self
            .http_client
            .get(&self.config.url)
            .header(AUTHORIZATION, token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CatalogError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let entries = parse_catalog(&bytes)?;
        debug!(distributions = entries.len(), "Decoded catalog");
        Ok(entries)
    }
}

/// Catalog read from a local JSON file
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCatalogSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn fetch(&self) -> Result<Vec<DistributionCatalogEntry>> {
        info!(path = %self.path.display(), "Reading cluster version catalog");
        let bytes = tokio::fs::read(&self.path).await?;
        parse_catalog(&bytes)
    }
}
