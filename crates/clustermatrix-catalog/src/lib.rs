//! clustermatrix catalog - where the version catalog comes from
//!
//! - [`HttpCatalogSource`]: authenticated GET against the cluster versions API
//! - [`FileCatalogSource`]: the same JSON document read from disk
//!
//! Both implement [`CatalogSource`] and decode with [`parse_catalog`].

pub mod config;
pub mod error;
pub mod source;

pub use config::{CatalogConfig, DEFAULT_CATALOG_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{CatalogError, Result};
pub use source::{parse_catalog, CatalogSource, FileCatalogSource, HttpCatalogSource};
