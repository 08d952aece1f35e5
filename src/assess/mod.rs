//! Assess module - semver impact assessment for dependency updates.
//!
//! Data flows one way through the stages:
//! - **Version**: total parsing and delta classification via [`parse_version`], [`classify_change`]
//! - **Impact**: change type + policy to a changeset level via [`impact_for`]
//! - **Confidence**: trust level and ordered reasoning via [`confidence_for`], [`ReasoningBuilder`]
//! - **Aggregate**: batch recommendation and risk score via [`aggregate`]
//! - **Assessor**: the configured entry point, [`ImpactAssessor`]

pub mod aggregate;
pub mod assessor;
pub mod confidence;
pub mod impact;
pub mod options;
pub mod version;

// Re-export commonly used types
pub use aggregate::{aggregate, BREAKING_INDICATOR_WEIGHT, MAX_RISK_SCORE};
pub use assessor::{DependencyAnalyses, ImpactAssessor};
pub use confidence::{confidence_for, ReasoningBuilder};
pub use impact::{
    apply_manager_rule, apply_security_floor, impact_for, is_breaking, is_downgrade,
    is_prerelease,
};
pub use options::{ImpactAssessmentOptions, ManagerRule, OptionsError, PrereleaseHandling};
pub use version::{classify_change, compare_versions, parse_version, Semver, SemverInfo};
