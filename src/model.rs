use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Changeset impact level assigned to a dependency update.
///
/// Ordering follows [`SemverImpact::ORDER`]: `patch < minor < major`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemverImpact {
    Patch,
    Minor,
    Major,
}

impl SemverImpact {
    /// Impact levels from lowest to highest rank.
    pub const ORDER: [SemverImpact; 3] = [Self::Patch, Self::Minor, Self::Major];

    /// Position of this level in [`SemverImpact::ORDER`].
    pub fn rank(self) -> usize {
        Self::ORDER
            .iter()
            .position(|level| *level == self)
            .unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

impl PartialOrd for SemverImpact {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemverImpact {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for SemverImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemverImpact {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patch" => Ok(Self::Patch),
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            _ => Err(UnknownTag::new("impact", s)),
        }
    }
}

/// Qualitative trust in an assessment.
///
/// Ranked by [`Confidence::ORDER`]: `high` is rank 0, `low` is the worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Confidence levels from best to worst.
    pub const ORDER: [Confidence; 3] = [Self::High, Self::Medium, Self::Low];

    /// Position of this level in [`Confidence::ORDER`].
    pub fn rank(self) -> usize {
        Self::ORDER
            .iter()
            .position(|level| *level == self)
            .unwrap_or_default()
    }

    /// One level worse, saturating at `low`.
    pub fn demote(self) -> Self {
        match self {
            Self::High => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(UnknownTag::new("confidence", s)),
        }
    }
}

/// Category of change between two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionChange {
    Major,
    Minor,
    Patch,
    Prerelease,
    /// Identical version triples and prerelease tags.
    #[serde(rename = "none")]
    Unchanged,
    /// At least one side failed to parse.
    Unknown,
}

impl VersionChange {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::Prerelease => "prerelease",
            Self::Unchanged => "none",
            Self::Unknown => "unknown",
        }
    }

    /// Capitalized label used in reasoning lines.
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Major => "Major",
            Self::Minor => "Minor",
            Self::Patch => "Patch",
            Self::Prerelease => "Prerelease",
            Self::Unchanged => "No",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for VersionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tag shared by security updates, vulnerabilities and
/// breaking-change indicators.
///
/// Deserializes through [`FromStr`], so `"HIGH"` and `"moderate"` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// `high` or `critical`.
    pub fn is_high_or_worse(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "moderate" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(UnknownTag::new("severity", s)),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = UnknownTag;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Reads an optional severity tag, treating unrecognized tags as absent.
fn lenient_severity<'de, D>(deserializer: D) -> Result<Option<Severity>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let tag = Option::<String>::deserialize(deserializer)?;
    Ok(tag.and_then(|t| t.parse().ok()))
}

/// Update-type tag assigned by the dependency bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateType {
    Major,
    Minor,
    Patch,
    Pin,
    Digest,
    LockFileMaintenance,
    Rollback,
    Bump,
    /// Package rename or replacement by a different package.
    Replacement,
    #[default]
    #[serde(other)]
    Other,
}

impl FromStr for UpdateType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "major" => Self::Major,
            "minor" => Self::Minor,
            "patch" => Self::Patch,
            "pin" => Self::Pin,
            "digest" => Self::Digest,
            "lockFileMaintenance" => Self::LockFileMaintenance,
            "rollback" => Self::Rollback,
            "bump" => Self::Bump,
            "replacement" => Self::Replacement,
            _ => Self::Other,
        })
    }
}

/// A tag string that does not name any known level.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} tag: '{value}'")]
pub struct UnknownTag {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownTag {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyUpdate {
    pub name: String,
    pub current_version: Option<String>,
    pub new_version: Option<String>,
    pub manager: String, // e.g., "npm", "cargo"
    #[serde(default)]
    pub update_type: UpdateType,
    #[serde(default)]
    pub is_security_update: bool,
    #[serde(default, deserialize_with = "lenient_severity")]
    pub security_severity: Option<Severity>,
}

impl DependencyUpdate {
    pub fn new(
        name: impl Into<String>,
        current_version: Option<&str>,
        new_version: Option<&str>,
        manager: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            current_version: current_version.map(str::to_string),
            new_version: new_version.map(str::to_string),
            manager: manager.into(),
            update_type: UpdateType::default(),
            is_security_update: false,
            security_severity: None,
        }
    }

    pub fn with_update_type(mut self, update_type: UpdateType) -> Self {
        self.update_type = update_type;
        self
    }

    /// Marks this record as a security update with an optional severity.
    pub fn with_security(mut self, severity: Option<Severity>) -> Self {
        self.is_security_update = true;
        self.security_severity = severity;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakingChangeAnalysis {
    pub indicators: Vec<BreakingChangeIndicator>,
}

impl BreakingChangeAnalysis {
    pub fn critical_indicator_count(&self) -> usize {
        self.indicators
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakingChangeIndicator {
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
    pub source: Option<String>, // e.g., "changelog", "diff"
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAnalysis {
    pub vulnerabilities: Vec<Vulnerability>,
    #[serde(default)]
    pub risk_score: f64,
}

impl SecurityAnalysis {
    pub fn high_severity_count(&self) -> usize {
        self.vulnerabilities
            .iter()
            .filter(|v| v.severity.is_high_or_worse())
            .count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    pub id: String, // CVE-2023-XXXX, GHSA-...
    pub severity: Severity,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyImpact {
    pub name: String,
    pub current_version: Option<String>,
    pub new_version: Option<String>,
    pub version_change: VersionChange,
    pub semver_impact: SemverImpact,
    pub is_breaking: bool,
    pub is_security_update: bool,
    pub security_severity: Option<Severity>,
    pub is_downgrade: bool,
    pub is_prerelease: bool,
    pub confidence: Confidence,
    pub reasoning: Vec<String>,
    pub breaking_change_analysis: Option<BreakingChangeAnalysis>,
    pub security_analysis: Option<SecurityAnalysis>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactAssessment {
    pub dependencies: Vec<DependencyImpact>,
    pub overall_impact: SemverImpact,
    pub recommended_changeset_type: SemverImpact,
    pub is_security_update: bool,
    pub has_breaking_changes: bool,
    pub has_downgrades: bool,
    pub has_prereleases: bool,
    pub confidence: Confidence,
    pub reasoning: Vec<String>,
    pub total_vulnerabilities: usize,
    pub high_severity_vulnerabilities: usize,
    pub critical_breaking_indicators: usize,
    /// Blended security and breaking-change risk, within `0.0..=100.0`.
    pub overall_risk_score: f64,
}
