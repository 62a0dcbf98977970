//! Matrix assembly across all catalog distributions.

use crate::config::MatrixConfig;
use crate::error::DistributionFailure;
use crate::policy::evaluate;
use crate::schema::{DistributionCatalogEntry, MatrixEntry};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

/// Entries produced by [`build_matrix`] plus the distributions that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixOutcome {
    pub entries: Vec<MatrixEntry>,
    pub failures: Vec<DistributionFailure>,
}

impl MatrixOutcome {
    /// Whether every configured distribution was evaluated.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Entries, or the first failure when any distribution failed.
    pub fn into_strict(self) -> Result<Vec<MatrixEntry>, DistributionFailure> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure),
            None => Ok(self.entries),
        }
    }
}

/// Build the test matrix for `catalog` under `config`.
///
/// Distributions without a policy are skipped. Output follows catalog order,
/// then the per-policy order within each distribution. A distribution that
/// fails to evaluate contributes no entries and is reported in
/// [`MatrixOutcome::failures`]; the others are unaffected.
pub fn build_matrix(catalog: &[DistributionCatalogEntry], config: &MatrixConfig) -> MatrixOutcome {
    let mut outcome = MatrixOutcome::default();

    for distribution in catalog {
        let name = distribution.short_name.as_str();
        let Some(policy) = config.policy_for(name) else {
            debug!(distribution = %name, "No policy configured, skipping");
            continue;
        };

        let stage = config.stages.stage_for(name);
        match evaluate(distribution, policy, stage) {
            Ok(entries) => {
                debug!(
                    distribution = %name,
                    available = distribution.versions.len(),
                    selected = entries.len(),
                    "Evaluated distribution"
                );
                outcome.entries.extend(entries);
            }
            Err(error) => {
                warn!(distribution = %name, error = %error, "Distribution evaluation failed");
                outcome.failures.push(DistributionFailure {
                    distribution: name.to_string(),
                    error,
                });
            }
        }
    }

    info!(
        entries = outcome.entries.len(),
        failures = outcome.failures.len(),
        "Built test matrix"
    );

    outcome
}

/// SHA-256 hex digest over every entry's fields, in order.
pub fn matrix_digest(entries: &[MatrixEntry]) -> String {
    let mut hasher = Sha256::new();
    for entry in entries {
        hasher.update(entry.distribution.as_bytes());
        hasher.update(b"\0");
        hasher.update(entry.version.as_bytes());
        hasher.update(b"\0");
        hasher.update(entry.instance_type.as_bytes());
        hasher.update(b"\0");
        hasher.update(entry.stage.as_str().as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DistributionPolicy;
    use crate::error::MatrixError;
    use crate::schema::Stage;

    fn catalog() -> Vec<DistributionCatalogEntry> {
        vec![
            DistributionCatalogEntry::new("kind", ["1.29.2", "1.30.0", "1.30.4"]),
            DistributionCatalogEntry::new("oke", ["1.30.1"]),
            DistributionCatalogEntry::new("openshift", ["4.14.0-okd", "4.15.0-okd"]),
            DistributionCatalogEntry::new("gke", ["1.31.1", "1.30.5"]),
        ]
    }

    fn config() -> MatrixConfig {
        MatrixConfig::default()
            .with_policy("kind", DistributionPolicy::latest_n_minors(Some(2)))
            .with_policy("openshift", DistributionPolicy::pinned(["4.15.0-okd"]))
            .with_policy(
                "gke",
                DistributionPolicy::latest_only().with_instance_type("n2-standard-4"),
            )
    }

    #[test]
    fn test_build_matrix_order_and_skip() {
        let outcome = build_matrix(&catalog(), &config());
        assert!(outcome.is_complete());

        let pairs: Vec<(&str, &str)> = outcome
            .entries
            .iter()
            .map(|e| (e.distribution.as_str(), e.version.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("kind", "1.30.4"),
                ("kind", "1.29.2"),
                ("openshift", "4.15.0-okd"),
                ("gke", "1.31.1"),
            ]
        );
        assert_eq!(outcome.entries[2].stage, Stage::Alpha);
        assert_eq!(outcome.entries[3].instance_type, "n2-standard-4");
    }

    #[test]
    fn test_failure_is_isolated() {
        let mut catalog = catalog();
        catalog.insert(0, DistributionCatalogEntry::new("gke", ["preview"]));

        let outcome = build_matrix(&catalog, &config());
        assert!(!outcome.is_complete());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].distribution, "gke");
        assert_eq!(
            outcome.failures[0].error,
            MatrixError::UnparsableVersion {
                version: "preview".to_string()
            }
        );
        assert_eq!(outcome.entries.len(), 4);
    }

    #[test]
    fn test_into_strict() {
        let ok = build_matrix(&catalog(), &config()).into_strict().unwrap();
        assert_eq!(ok.len(), 4);

        let broken = vec![DistributionCatalogEntry::new("kind", ["x"])];
        let err = build_matrix(&broken, &config()).into_strict().unwrap_err();
        assert_eq!(err.distribution, "kind");
        assert!(err.to_string().contains("kind"));
    }

    #[test]
    fn test_duplicate_distributions_not_deduplicated() {
        let catalog = vec![
            DistributionCatalogEntry::new("gke", ["1.31.1"]),
            DistributionCatalogEntry::new("gke", ["1.31.1"]),
        ];
        let outcome = build_matrix(&catalog, &config());
        assert_eq!(outcome.entries.len(), 2);
    }

    #[test]
    fn test_digest_deterministic_and_order_sensitive() {
        let a = build_matrix(&catalog(), &config()).entries;
        let b = build_matrix(&catalog(), &config()).entries;
        assert_eq!(matrix_digest(&a), matrix_digest(&b));
        assert_eq!(matrix_digest(&a).len(), 64);

        let mut reversed = a.clone();
        reversed.reverse();
        assert_ne!(matrix_digest(&a), matrix_digest(&reversed));
    }
}
