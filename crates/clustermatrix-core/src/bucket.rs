//! Major.minor aggregation.

use crate::error::Result;
use crate::version::MajorMinorKey;
use std::collections::BTreeSet;

/// Unique major.minor buckets of `versions`, highest first.
pub fn major_minor_buckets<S: AsRef<str>>(versions: &[S]) -> Result<Vec<MajorMinorKey>> {
    let unique = versions
        .iter()
        .map(|v| MajorMinorKey::of(v.as_ref()))
        .collect::<Result<BTreeSet<_>>>()?;

    Ok(unique.into_iter().rev().collect())
}

/// The `n` highest major.minor buckets of `versions`.
///
/// `None` means every bucket. An `n` larger than the number of distinct
/// buckets returns all of them.
pub fn top_n_major_minors<S: AsRef<str>>(
    versions: &[S],
    n: Option<usize>,
) -> Result<Vec<MajorMinorKey>> {
    let mut buckets = major_minor_buckets(versions)?;
    if let Some(n) = n {
        buckets.truncate(n);
    }
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(raw: &[&str]) -> Vec<MajorMinorKey> {
        raw.iter().map(|k| k.parse().unwrap()).collect()
    }

    #[test]
    fn test_buckets_descending_and_unique() {
        let versions = ["1.9.3", "1.10.0", "1.9.1", "1.10.2", "1.8"];
        let buckets = major_minor_buckets(&versions).unwrap();
        assert_eq!(buckets, keys(&["1.10", "1.9", "1.8"]));
    }

    #[test]
    fn test_buckets_order_across_majors() {
        let versions = ["4.14.2", "1.30.0", "4.15.0-okd"];
        let buckets = major_minor_buckets(&versions).unwrap();
        assert_eq!(buckets, keys(&["4.15", "4.14", "1.30"]));
    }

    #[test]
    fn test_top_n_zero_is_empty() {
        let versions = ["1.30.1", "1.29.0"];
        assert!(top_n_major_minors(&versions, Some(0)).unwrap().is_empty());
    }

    #[test]
    fn test_top_n_none_is_all() {
        let versions = ["1.30.1", "1.29.0", "1.28.4"];
        assert_eq!(
            top_n_major_minors(&versions, None).unwrap(),
            top_n_major_minors(&versions, Some(usize::MAX)).unwrap()
        );
    }

    #[test]
    fn test_empty_input() {
        let versions: [&str; 0] = [];
        assert!(major_minor_buckets(&versions).unwrap().is_empty());
    }

    #[test]
    fn test_unparsable_version_fails() {
        let versions = ["1.30.1", "nightly"];
        assert!(major_minor_buckets(&versions).is_err());
    }
}
