//! Batch entry point tying the parser, classifier, calculator, confidence
//! builder and aggregator together.

use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

use crate::assess::aggregate::aggregate;
use crate::assess::confidence::{confidence_for, ReasoningBuilder};
use crate::assess::impact::{
    apply_manager_rule, apply_security_floor, impact_for, is_breaking, is_downgrade,
    is_prerelease,
};
use crate::assess::options::ImpactAssessmentOptions;
use crate::assess::version::{classify_change, parse_version};
use crate::model::{
    BreakingChangeAnalysis, DependencyImpact, DependencyUpdate, ImpactAssessment,
    SecurityAnalysis, VersionChange,
};

/// Collaborator analyses keyed by position in the assessed batch.
///
/// Records can share a name (same package under two managers or
/// workspaces), so each analysis belongs to exactly one input index.
#[derive(Debug, Clone, Default)]
pub struct DependencyAnalyses {
    pub breaking: HashMap<usize, BreakingChangeAnalysis>,
    pub security: HashMap<usize, SecurityAnalysis>,
}

impl DependencyAnalyses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_breaking(mut self, index: usize, analysis: BreakingChangeAnalysis) -> Self {
        self.breaking.insert(index, analysis);
        self
    }

    pub fn with_security(mut self, index: usize, analysis: SecurityAnalysis) -> Self {
        self.security.insert(index, analysis);
        self
    }
}

/// Assigns changeset impact levels to dependency updates.
///
/// Holds only read-only options, so one instance can be shared across
/// threads and called concurrently.
#[derive(Debug, Clone, Default)]
pub struct ImpactAssessor {
    options: ImpactAssessmentOptions,
}

impl ImpactAssessor {
    pub fn new(options: ImpactAssessmentOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImpactAssessmentOptions {
        &self.options
    }

    pub fn assess(&self, updates: &[DependencyUpdate]) -> ImpactAssessment {
        self.assess_with_analyses(updates, &DependencyAnalyses::default())
    }

    /// Assesses a batch, attaching analyses by input index for the
    /// vulnerability counters and risk score. Output order matches `updates`.
    #[instrument(skip_all, fields(count = updates.len()))]
    pub fn assess_with_analyses(
        &self,
        updates: &[DependencyUpdate],
        analyses: &DependencyAnalyses,
    ) -> ImpactAssessment {
        let impacts = updates
            .iter()
            .enumerate()
            .map(|(index, update)| {
                self.assess_dependency(
                    update,
                    analyses.breaking.get(&index).cloned(),
                    analyses.security.get(&index).cloned(),
                )
            })
            .collect();

        let assessment = self.aggregate(impacts);

        info!(
            overall = %assessment.overall_impact,
            confidence = %assessment.confidence,
            risk_score = assessment.overall_risk_score,
            "Impact assessment completed"
        );

        assessment
    }

    pub fn assess_dependency(
        &self,
        update: &DependencyUpdate,
        breaking_change_analysis: Option<BreakingChangeAnalysis>,
        security_analysis: Option<SecurityAnalysis>,
    ) -> DependencyImpact {
        let options = &self.options;
        let current = parse_version(update.current_version.as_deref());
        let next = parse_version(update.new_version.as_deref());
        let change = classify_change(&current, &next);

        if change == VersionChange::Unknown {
            warn!(
                dependency = %update.name,
                current = current.raw(),
                new = next.raw(),
                "Could not parse versions, falling back to default impact"
            );
        }

        let mut semver_impact = impact_for(change, &current, &next, options);
        let breaking = is_breaking(change, &current, &next, update, options);
        let downgrade = is_downgrade(&current, &next);
        let prerelease = is_prerelease(&current, &next);

        semver_impact = apply_security_floor(semver_impact, update, options);
        semver_impact = apply_manager_rule(semver_impact, update, options);

        let confidence = confidence_for(change, &current, &next, update.is_security_update);

        let reasoning = ReasoningBuilder::new()
            .version_change(
                change,
                update.current_version.as_deref(),
                update.new_version.as_deref(),
            )
            .security(update.is_security_update, update.security_severity)
            .breaking(breaking, &current)
            .downgrade(downgrade)
            .prerelease(prerelease)
            .finish(semver_impact);

        debug!(
            dependency = %update.name,
            manager = %update.manager,
            change = %change,
            impact = %semver_impact,
            confidence = %confidence,
            breaking,
            "Assessed dependency"
        );

        DependencyImpact {
            name: update.name.clone(),
            current_version: update.current_version.clone(),
            new_version: update.new_version.clone(),
            version_change: change,
            semver_impact,
            is_breaking: breaking,
            is_security_update: update.is_security_update,
            security_severity: update.security_severity,
            is_downgrade: downgrade,
            is_prerelease: prerelease,
            confidence,
            reasoning,
            breaking_change_analysis,
            security_analysis,
        }
    }

    /// Folds per-dependency impacts into one assessment.
    pub fn aggregate(&self, impacts: Vec<DependencyImpact>) -> ImpactAssessment {
        aggregate(impacts, self.options.default_changeset_type)
    }
}
