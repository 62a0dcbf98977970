//! Catalog input and matrix output records.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Wire document returned by the cluster version catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterVersionCatalog {
    #[serde(rename = "cluster-versions", default)]
    pub cluster_versions: Vec<DistributionCatalogEntry>,
}

/// Versions available for one Kubernetes distribution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DistributionCatalogEntry {
    pub short_name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub versions: Vec<String>,
}

impl DistributionCatalogEntry {
    pub fn new<I, S>(short_name: &str, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            short_name: short_name.to_string(),
            versions: versions.into_iter().map(Into::into).collect(),
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Release maturity label attached to every entry of a distribution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Stable,
    Alpha,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Stable => "stable",
            Stage::Alpha => "alpha",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cell of the CI test matrix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatrixEntry {
    pub distribution: String,
    pub version: String,
    pub instance_type: String,
    pub stage: Stage,
}
