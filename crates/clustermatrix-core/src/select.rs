//! Latest-version selection.

use crate::error::Result;
use crate::version::{normalize, MajorMinorKey, NormalizedVersion};
use std::collections::BTreeMap;

/// The raw version with the greatest normalized value, or `None` for an
/// empty input.
///
/// When several raw strings normalize to the same triple the first one wins.
pub fn latest_overall<S: AsRef<str>>(versions: &[S]) -> Result<Option<&str>> {
    let mut best: Option<(NormalizedVersion, &str)> = None;

    for raw in versions {
        let raw = raw.as_ref();
        let normalized = normalize(raw)?;
        match best {
            Some((current, _)) if normalized <= current => {}
            _ => best = Some((normalized, raw)),
        }
    }

    Ok(best.map(|(_, raw)| raw))
}

/// Highest raw version within each major.minor bucket.
///
/// With `allowed` set and non-empty, versions outside those buckets are
/// skipped. `None` or an empty slice keeps every bucket. Ties keep the first
/// version seen.
pub fn latest_per_bucket<'a, S: AsRef<str>>(
    versions: &'a [S],
    allowed: Option<&[MajorMinorKey]>,
) -> Result<BTreeMap<MajorMinorKey, &'a str>> {
    let allowed = allowed.filter(|keys| !keys.is_empty());
    let mut best: BTreeMap<MajorMinorKey, (NormalizedVersion, &'a str)> = BTreeMap::new();

    for raw in versions {
        let raw = raw.as_ref();
        let normalized = normalize(raw)?;
        let bucket = normalized.bucket();

        if let Some(keys) = allowed {
            if !keys.contains(&bucket) {
                continue;
            }
        }

        let replace = best
            .get(&bucket)
            .map_or(true, |(current, _)| normalized > *current);
        if replace {
            best.insert(bucket, (normalized, raw));
        }
    }

    Ok(best
        .into_iter()
        .map(|(bucket, (_, raw))| (bucket, raw))
        .collect())
}
