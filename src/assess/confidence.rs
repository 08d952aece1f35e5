//! Confidence scoring and the per-dependency reasoning trail.

use crate::assess::version::SemverInfo;
use crate::model::{Confidence, SemverImpact, Severity, VersionChange};

/// Derives confidence for one assessed dependency.
///
/// Starts at `high` and only demotes, except for the final security rule,
/// which moves `low` to `medium` and anything else to `high`.
pub fn confidence_for(
    change: VersionChange,
    current: &SemverInfo,
    next: &SemverInfo,
    is_security_update: bool,
) -> Confidence {
    let mut confidence = Confidence::High;

    if !current.is_valid() || !next.is_valid() || change == VersionChange::Unknown {
        confidence = Confidence::Low;
    } else {
        if current.is_zero_major() || next.is_zero_major() {
            confidence = confidence.demote();
        }
        if current.has_prerelease() || next.has_prerelease() {
            confidence = confidence.demote();
        }
    }

    if is_security_update {
        confidence = match confidence {
            Confidence::Low => Confidence::Medium,
            _ => Confidence::High,
        };
    }

    confidence
}

/// Append-only reasoning trail.
///
/// Lines must be pushed in the documented order: change, security,
/// breaking, downgrade, prerelease, impact. Nothing is reordered or
/// deduplicated.
#[derive(Debug, Default)]
pub struct ReasoningBuilder {
    lines: Vec<String>,
}

impl ReasoningBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version_change(
        mut self,
        change: VersionChange,
        current: Option<&str>,
        next: Option<&str>,
    ) -> Self {
        let current = current.unwrap_or("unknown");
        let next = next.unwrap_or("unknown");
        let line = match change {
            VersionChange::Unknown => {
                format!("Unable to parse versions: {current} → {next}")
            }
            _ => format!("{} version change: {current} → {next}", change.label()),
        };
        self.lines.push(line);
        self
    }

    pub fn security(mut self, is_security_update: bool, severity: Option<Severity>) -> Self {
        if is_security_update {
            let severity = severity.map_or("unknown", Severity::as_str);
            self.lines.push(format!("Security update (severity: {severity})"));
        }
        self
    }

    pub fn breaking(mut self, is_breaking: bool, current: &SemverInfo) -> Self {
        if is_breaking {
            self.lines.push("Contains breaking changes".to_string());
            if current.is_zero_major() {
                self.lines.push(
                    "0.x.x versions may introduce breaking changes in minor releases".to_string(),
                );
            }
        }
        self
    }

    pub fn downgrade(mut self, is_downgrade: bool) -> Self {
        if is_downgrade {
            self.lines.push("Version downgrade detected - review carefully".to_string());
        }
        self
    }

    pub fn prerelease(mut self, is_prerelease: bool) -> Self {
        if is_prerelease {
            self.lines.push("Involves a prerelease version - may be unstable".to_string());
        }
        self
    }

    /// Closes the trail with the assessed impact line.
    pub fn finish(mut self, impact: SemverImpact) -> Vec<String> {
        self.lines.push(format!("Assessed impact: {impact}"));
        self.lines
    }
}
