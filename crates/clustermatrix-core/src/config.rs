//! Per-distribution selection policies.
//!
//! The policy mapping is hand-maintained configuration, usually a TOML file:
//!
//! ```toml
//! [stages]
//! alpha = ["openshift"]
//!
//! [distributions.k3s]
//! policy = "latest_n_minors"
//! minors = 3
//!
//! [distributions.gke]
//! policy = "latest_only"
//! instance_type = "n2-standard-4"
//!
//! [distributions.openshift]
//! policy = "pinned"
//! versions = ["4.15.0-okd"]
//! ```
//!
//! A distribution with no entry under `[distributions]` is left out of the
//! matrix.

use crate::error::{MatrixError, Result};
use crate::schema::Stage;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Distributions labelled `alpha` when the config does not say otherwise.
pub const DEFAULT_ALPHA_DISTRIBUTIONS: &[&str] = &["openshift"];

/// How versions are picked from a distribution's catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Selection {
    /// Exactly these version strings, when the catalog has them.
    Pinned { versions: BTreeSet<String> },

    /// The single highest version.
    LatestOnly,

    /// The highest version in each of the `minors` most recent major.minor
    /// lines. `None` selects every line.
    LatestNMinors {
        #[serde(default)]
        minors: Option<usize>,
    },
}

/// Policy for one distribution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DistributionPolicy {
    #[serde(flatten)]
    pub selection: Selection,

    #[serde(default)]
    pub instance_type: String,
}

impl DistributionPolicy {
    pub fn pinned<I, S>(versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_selection(Selection::Pinned {
            versions: versions.into_iter().map(Into::into).collect(),
        })
    }

    pub fn latest_only() -> Self {
        Self::from_selection(Selection::LatestOnly)
    }

    pub fn latest_n_minors(minors: Option<usize>) -> Self {
        Self::from_selection(Selection::LatestNMinors { minors })
    }

    pub fn with_instance_type(mut self, instance_type: &str) -> Self {
        self.instance_type = instance_type.to_string();
        self
    }

    fn from_selection(selection: Selection) -> Self {
        Self {
            selection,
            instance_type: String::new(),
        }
    }
}

/// Stage labels by distribution name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageTable {
    #[serde(default = "default_alpha")]
    pub alpha: BTreeSet<String>,
}

impl Default for StageTable {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
        }
    }
}

fn default_alpha() -> BTreeSet<String> {
    DEFAULT_ALPHA_DISTRIBUTIONS
        .iter()
        .map(|name| name.to_string())
        .collect()
}

impl StageTable {
    pub fn stage_for(&self, distribution: &str) -> Stage {
        if self.alpha.contains(distribution) {
            Stage::Alpha
        } else {
            Stage::Stable
        }
    }
}

/// The full policy mapping handed to [`crate::build_matrix`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatrixConfig {
    #[serde(default)]
    pub stages: StageTable,

    #[serde(default)]
    pub distributions: BTreeMap<String, DistributionPolicy>,
}

impl MatrixConfig {
    pub fn with_policy(mut self, distribution: &str, policy: DistributionPolicy) -> Self {
        self.distributions.insert(distribution.to_string(), policy);
        self
    }

    pub fn policy_for(&self, distribution: &str) -> Option<&DistributionPolicy> {
        self.distributions.get(distribution)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| MatrixError::PolicyConfig(e.to_string()))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| MatrixError::PolicyConfig(e.to_string()))
    }

    /// Load a policy file. `.json` files are read as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MatrixError::PolicyConfig(format!("failed to read {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[distributions.k3s]
policy = "latest_n_minors"
minors = 3

[distributions.kind]
policy = "latest_n_minors"

[distributions.eks]
policy = "latest_n_minors"
minors = 2
instance_type = "m6i.large"

[distributions.gke]
policy = "latest_only"

[distributions.openshift]
policy = "pinned"
versions = ["4.15.0-okd", "4.14.0-okd"]
"#;

    #[test]
    fn test_parse_toml_policies() {
        let config = MatrixConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.distributions.len(), 5);

        assert_eq!(
            config.policy_for("k3s"),
            Some(&DistributionPolicy::latest_n_minors(Some(3)))
        );
        assert_eq!(
            config.policy_for("kind"),
            Some(&DistributionPolicy::latest_n_minors(None))
        );
        assert_eq!(
            config.policy_for("eks"),
            Some(&DistributionPolicy::latest_n_minors(Some(2)).with_instance_type("m6i.large"))
        );
        assert_eq!(
            config.policy_for("gke"),
            Some(&DistributionPolicy::latest_only())
        );
        assert_eq!(
            config.policy_for("openshift"),
            Some(&DistributionPolicy::pinned(["4.14.0-okd", "4.15.0-okd"]))
        );
        assert!(config.policy_for("oke").is_none());
    }

    #[test]
    fn test_default_stage_table() {
        let config = MatrixConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.stages.stage_for("openshift"), Stage::Alpha);
        assert_eq!(config.stages.stage_for("k3s"), Stage::Stable);
    }

    #[test]
    fn test_stage_table_override() {
        let config = MatrixConfig::from_toml_str(
            r#"
[stages]
alpha = ["oke"]
"#,
        )
        .unwrap();
        assert_eq!(config.stages.stage_for("oke"), Stage::Alpha);
        assert_eq!(config.stages.stage_for("openshift"), Stage::Stable);
        assert!(config.distributions.is_empty());
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let err = MatrixConfig::from_toml_str(
            r#"
[distributions.k3s]
policy = "oldest"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, MatrixError::PolicyConfig(_)));
    }

    #[test]
    fn test_parse_json_policies() {
        let config = MatrixConfig::from_json_str(
            r#"{
                "distributions": {
                    "gke": { "policy": "latest_only", "instance_type": "n2-standard-4" }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(
            config.policy_for("gke"),
            Some(&DistributionPolicy::latest_only().with_instance_type("n2-standard-4"))
        );
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("policies.toml");
        std::fs::write(&toml_path, SAMPLE).unwrap();
        assert_eq!(MatrixConfig::load(&toml_path).unwrap().distributions.len(), 5);

        let json_path = dir.path().join("policies.json");
        std::fs::write(&json_path, r#"{"distributions":{"gke":{"policy":"latest_only"}}}"#)
            .unwrap();
        assert_eq!(MatrixConfig::load(&json_path).unwrap().distributions.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = MatrixConfig::load(Path::new("/nonexistent/policies.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
