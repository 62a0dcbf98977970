//! Error types for catalog sources

use thiserror::Error;

/// Errors that can occur while fetching the version catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No API token configured for the HTTPS source
    #[error("Catalog API token is not configured (set CLUSTERMATRIX_API_TOKEN)")]
    NotConfigured,

    /// The API rejected the token
    #[error("Catalog API rejected the credentials")]
    Unauthorized,

    /// Non-success HTTP status
    #[error("Catalog API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Transport-level HTTP error
    #[error("HTTP error: {0}")]
    Http(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Invalid catalog document: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Http(err.to_string())
    }
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
