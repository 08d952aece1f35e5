//! Version parsing and delta classification.
//!
//! Parsing is total: malformed input becomes [`SemverInfo::Invalid`] instead
//! of an error, and every comparison in this module branches on validity
//! before touching numeric fields.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::model::VersionChange;

static RANGE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[v^~>=]+").expect("valid regex"));

static STRICT_SEMVER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(\d+)\.(\d+)\.(\d+)(?:-([0-9a-z-]+(?:\.[0-9a-z-]+)*))?(?:\+([0-9a-z-]+(?:\.[0-9a-z-]+)*))?$",
    )
    .expect("valid regex")
});

static PARTIAL_SEMVER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semver {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>, // e.g., "beta.1"
    pub build: Option<String>,      // never compared
    pub raw: String,
}

impl Semver {
    pub fn has_prerelease(&self) -> bool {
        self.prerelease.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Result of [`parse_version`].
///
/// `Invalid` carries only the raw input. It is not "version 0.0.0" and is
/// never ordered against a valid version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SemverInfo {
    Valid(Semver),
    /// `raw` is empty when the input was absent or empty.
    Invalid { raw: String },
}

impl SemverInfo {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn as_valid(&self) -> Option<&Semver> {
        match self {
            Self::Valid(version) => Some(version),
            Self::Invalid { .. } => None,
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            Self::Valid(version) => &version.raw,
            Self::Invalid { raw } => raw,
        }
    }

    pub fn has_prerelease(&self) -> bool {
        self.as_valid().is_some_and(Semver::has_prerelease)
    }

    /// `true` when this is a valid version on a 0.x.x line.
    pub fn is_zero_major(&self) -> bool {
        self.as_valid().is_some_and(|v| v.major == 0)
    }
}

/// Parses a raw version string, tolerating range prefixes and partial input.
///
/// Never fails. `"^1.2"` yields a valid `1.2.0`, `"latest"` yields
/// [`SemverInfo::Invalid`].
pub fn parse_version(raw: Option<&str>) -> SemverInfo {
    let Some(original) = raw.filter(|r| !r.is_empty()) else {
        return SemverInfo::Invalid { raw: String::new() };
    };

    let stripped = RANGE_PREFIX.replace(original.trim(), "");
    let cleaned = stripped.trim();

    if let Some(caps) = STRICT_SEMVER.captures(cleaned) {
        let numbers = (
            caps[1].parse::<u64>(),
            caps[2].parse::<u64>(),
            caps[3].parse::<u64>(),
        );
        if let (Ok(major), Ok(minor), Ok(patch)) = numbers {
            return SemverInfo::Valid(Semver {
                major,
                minor,
                patch,
                prerelease: caps.get(4).map(|m| m.as_str().to_string()),
                build: caps.get(5).map(|m| m.as_str().to_string()),
                raw: original.to_string(),
            });
        }
    }

    if let Some(caps) = PARTIAL_SEMVER.captures(cleaned) {
        let component = |index: usize| {
            caps.get(index)
                .map_or(Ok(0), |m| m.as_str().parse::<u64>())
        };
        if let (Ok(major), Ok(minor), Ok(patch)) = (component(1), component(2), component(3)) {
            return SemverInfo::Valid(Semver {
                major,
                minor,
                patch,
                prerelease: None,
                build: None,
                raw: original.to_string(),
            });
        }
    }

    SemverInfo::Invalid {
        raw: original.to_string(),
    }
}

/// Three-way ordering of two valid versions.
///
/// Orders by major, minor, patch. On a numeric tie a prerelease sorts before
/// the release, and two prereleases compare as plain strings (not
/// identifier-by-identifier).
pub fn compare_versions(a: &Semver, b: &Semver) -> Ordering {
    a.major
        .cmp(&b.major)
        .then(a.minor.cmp(&b.minor))
        .then(a.patch.cmp(&b.patch))
        .then_with(|| match (a.prerelease.as_deref(), b.prerelease.as_deref()) {
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(left), Some(right)) => left.cmp(right),
            (None, None) => Ordering::Equal,
        })
}

/// Classifies the change from `current` to `next`.
pub fn classify_change(current: &SemverInfo, next: &SemverInfo) -> VersionChange {
    let (Some(current), Some(next)) = (current.as_valid(), next.as_valid()) else {
        return VersionChange::Unknown;
    };

    let same_triple = current.major == next.major
        && current.minor == next.minor
        && current.patch == next.patch;

    if same_triple {
        return if current.prerelease != next.prerelease {
            VersionChange::Prerelease
        } else {
            VersionChange::Unchanged
        };
    }

    if current.major != next.major {
        VersionChange::Major
    } else if current.minor != next.minor {
        VersionChange::Minor
    } else if current.patch != next.patch {
        VersionChange::Patch
    } else {
        // Unreachable once the triple comparison above has run.
        VersionChange::Prerelease
    }
}
