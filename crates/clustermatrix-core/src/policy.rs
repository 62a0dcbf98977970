//! Policy evaluation for a single distribution.

use crate::bucket::top_n_major_minors;
use crate::config::{DistributionPolicy, Selection};
use crate::error::Result;
use crate::schema::{DistributionCatalogEntry, MatrixEntry, Stage};
use crate::select::{latest_overall, latest_per_bucket};
use std::collections::HashSet;

/// Apply `policy` to one catalog entry.
///
/// Empty catalogs and policies that match nothing produce an empty list.
/// An unparsable version aborts this distribution only; pinned selection
/// never parses versions.
pub fn evaluate(
    distribution: &DistributionCatalogEntry,
    policy: &DistributionPolicy,
    stage: Stage,
) -> Result<Vec<MatrixEntry>> {
    let versions = &distribution.versions;

    let selected: Vec<&str> = match &policy.selection {
        Selection::Pinned { versions: pinned } => {
            let mut seen = HashSet::new();
            versions
                .iter()
                .map(String::as_str)
                .filter(|v| pinned.contains(*v) && seen.insert(*v))
                .collect()
        }
        Selection::LatestOnly => latest_overall(versions)?.into_iter().collect(),
        Selection::LatestNMinors { minors } => {
            let allowed = top_n_major_minors(versions, *minors)?;
            if allowed.is_empty() {
                // An empty filter would mean "every bucket" to the selector.
                Vec::new()
            } else {
                latest_per_bucket(versions, Some(allowed.as_slice()))?
                    .into_values()
                    .rev()
                    .collect()
            }
        }
    };

    Ok(selected
        .into_iter()
        .map(|version| MatrixEntry {
            distribution: distribution.short_name.clone(),
            version: version.to_string(),
            instance_type: policy.instance_type.clone(),
            stage,
        })
        .collect())
}
