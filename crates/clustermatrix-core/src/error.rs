//! Error types for matrix selection

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// The version does not start with a dotted integer sequence.
    #[error("Unparsable version: {version:?}")]
    UnparsableVersion { version: String },

    /// A major.minor key that is not `<int>.<int>`.
    #[error("Invalid major.minor bucket: {key:?}")]
    InvalidBucket { key: String },

    #[error("Policy configuration error: {0}")]
    PolicyConfig(String),
}

/// A failure attributed to the distribution whose evaluation it aborted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Distribution '{distribution}': {error}")]
pub struct DistributionFailure {
    pub distribution: String,
    #[source]
    pub error: MatrixError,
}

/// Result type for matrix operations
pub type Result<T> = std::result::Result<T, MatrixError>;
