//! clustermatrix core - Kubernetes distribution version selection
//!
//! Turns a catalog of available versions per distribution into a flat,
//! deterministic CI test matrix:
//! - `version`: raw version strings to comparable `(major, minor, patch)`
//! - `bucket`: unique major.minor lines, newest first
//! - `select`: highest version overall or per major.minor line
//! - `policy`: pinned / latest-only / latest-N-minors per distribution
//! - `matrix`: evaluates every configured distribution in catalog order
//!
//! Everything here is pure and synchronous; fetching the catalog lives in
//! `clustermatrix-catalog`.

pub mod bucket;
pub mod config;
pub mod error;
pub mod matrix;
pub mod policy;
pub mod schema;
pub mod select;
pub mod telemetry;
pub mod version;

pub use bucket::{major_minor_buckets, top_n_major_minors};
pub use config::{DistributionPolicy, MatrixConfig, Selection, StageTable};
pub use error::{DistributionFailure, MatrixError, Result};
pub use matrix::{build_matrix, matrix_digest, MatrixOutcome};
pub use policy::evaluate;
pub use schema::{ClusterVersionCatalog, DistributionCatalogEntry, MatrixEntry, Stage};
pub use select::{latest_overall, latest_per_bucket};
pub use telemetry::init_tracing;
pub use version::{normalize, MajorMinorKey, NormalizedVersion};
