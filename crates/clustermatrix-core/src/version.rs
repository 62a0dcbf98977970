//! Version normalization.
//!
//! Distribution catalogs publish loosely formatted version strings
//! (`1.30.1`, `1.29`, `4.15.0-okd`, `1.30.1+k3s1`). Selection only needs a
//! numeric ordering, so each raw string is reduced to a
//! `(major, minor, patch)` triple while the raw string itself is what gets
//! emitted downstream.

use crate::error::{MatrixError, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Comparable `(major, minor, patch)` triple derived from a raw version.
///
/// Ordering is lexicographic over the numeric fields, so `1.10` sorts after `1.9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl NormalizedVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The major.minor bucket this version belongs to.
    pub fn bucket(&self) -> MajorMinorKey {
        MajorMinorKey::new(self.major, self.minor)
    }
}

impl fmt::Display for NormalizedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Parse the leading dotted integer sequence of `raw`.
///
/// Up to three components are read; missing ones default to `0` and anything
/// after the third component or after the first non-numeric character is
/// ignored. Fails only when `raw` does not start with a digit.
pub fn normalize(raw: &str) -> Result<NormalizedVersion> {
    let mut parts = [0u64; 3];
    let mut rest = raw;

    for (idx, slot) in parts.iter_mut().enumerate() {
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            if idx == 0 {
                return Err(unparsable(raw));
            }
            break;
        }

        *slot = rest[..digits].parse().map_err(|_| unparsable(raw))?;
        rest = &rest[digits..];

        match rest.strip_prefix('.') {
            Some(tail) => rest = tail,
            None => break,
        }
    }

    Ok(NormalizedVersion::new(parts[0], parts[1], parts[2]))
}

fn unparsable(raw: &str) -> MatrixError {
    MatrixError::UnparsableVersion {
        version: raw.to_string(),
    }
}

/// Grouping key `<major>.<minor>`.
///
/// Orders like a [`NormalizedVersion`] with the patch component fixed at `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MajorMinorKey {
    pub major: u64,
    pub minor: u64,
}

impl MajorMinorKey {
    pub fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    /// Bucket of a raw version string.
    pub fn of(raw: &str) -> Result<Self> {
        Ok(normalize(raw)?.bucket())
    }
}

impl fmt::Display for MajorMinorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for MajorMinorKey {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || MatrixError::InvalidBucket { key: s.to_string() };
        let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for MajorMinorKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
