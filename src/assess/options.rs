//! Assessment policy.
//!
//! Options deserialize from camelCase JSON and any omitted field keeps its
//! default, so a partial document is merged over [`ImpactAssessmentOptions::default`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::model::SemverImpact;

#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Failed to read options file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid options document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Policy knobs for an [`ImpactAssessor`](crate::assess::ImpactAssessor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImpactAssessmentOptions {
    /// Floor security updates at patch and raise critical patches to minor
    pub security_minimum_patch: bool,

    /// Treat major version changes as breaking
    pub major_as_breaking: bool,

    /// Entering a prerelease counts as patch instead of minor
    pub prerelease_as_lower_impact: bool,

    /// Impact used when versions cannot be classified
    pub default_changeset_type: SemverImpact,

    /// Rules keyed by package manager identifier (e.g., "npm", "cargo")
    pub manager_rules: HashMap<String, ManagerRule>,
}

impl Default for ImpactAssessmentOptions {
    fn default() -> Self {
        Self {
            security_minimum_patch: true,
            major_as_breaking: true,
            prerelease_as_lower_impact: true,
            default_changeset_type: SemverImpact::Patch,
            manager_rules: HashMap::new(),
        }
    }
}

/// Per-manager policy override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ManagerRule {
    /// Overrides [`ImpactAssessmentOptions::major_as_breaking`] for this manager
    pub major_as_breaking: Option<bool>,

    /// Accepted for configuration compatibility; not consulted.
    pub prerelease_handling: Option<PrereleaseHandling>,

    /// Impact this manager's updates may be softened to
    pub default_impact: Option<SemverImpact>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrereleaseHandling {
    Strict,
    Lenient,
}

impl ImpactAssessmentOptions {
    /// Parses options from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::Json`] if the document does not match the schema.
    pub fn from_json_str(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses options from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::Io`] if the file cannot be read, or
    /// [`OptionsError::Json`] if its content is invalid.
    pub fn from_json_file(path: &Path) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn with_security_minimum_patch(mut self, enabled: bool) -> Self {
        self.security_minimum_patch = enabled;
        self
    }

    pub fn with_major_as_breaking(mut self, enabled: bool) -> Self {
        self.major_as_breaking = enabled;
        self
    }

    pub fn with_prerelease_as_lower_impact(mut self, enabled: bool) -> Self {
        self.prerelease_as_lower_impact = enabled;
        self
    }

    pub fn with_default_changeset_type(mut self, impact: SemverImpact) -> Self {
        self.default_changeset_type = impact;
        self
    }

    pub fn with_manager_rule(mut self, manager: impl Into<String>, rule: ManagerRule) -> Self {
        self.manager_rules.insert(manager.into(), rule);
        self
    }

    pub fn manager_rule(&self, manager: &str) -> Option<&ManagerRule> {
        self.manager_rules.get(manager)
    }

    pub fn major_as_breaking_for(&self, manager: &str) -> bool {
        self.manager_rule(manager)
            .and_then(|rule| rule.major_as_breaking)
            .unwrap_or(self.major_as_breaking)
    }
}
