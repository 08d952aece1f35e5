//! Folds per-dependency impacts into one batch assessment.

use crate::model::{Confidence, DependencyImpact, ImpactAssessment, SemverImpact};

/// Upper bound of [`ImpactAssessment::overall_risk_score`].
pub const MAX_RISK_SCORE: f64 = 100.0;

/// Risk contributed by each breaking-change indicator, regardless of severity.
pub const BREAKING_INDICATOR_WEIGHT: f64 = 10.0;

/// Aggregates a batch of impacts. `default_impact` is reported for an empty batch.
pub fn aggregate(dependencies: Vec<DependencyImpact>, default_impact: SemverImpact) -> ImpactAssessment {
    if dependencies.is_empty() {
        return ImpactAssessment {
            dependencies,
            overall_impact: default_impact,
            recommended_changeset_type: default_impact,
            is_security_update: false,
            has_breaking_changes: false,
            has_downgrades: false,
            has_prereleases: false,
            confidence: Confidence::High,
            reasoning: vec!["No dependencies to assess".to_string()],
            total_vulnerabilities: 0,
            high_severity_vulnerabilities: 0,
            critical_breaking_indicators: 0,
            overall_risk_score: 0.0,
        };
    }

    let overall_impact = dependencies
        .iter()
        .map(|d| d.semver_impact)
        .max_by_key(|impact| impact.rank())
        .unwrap_or(default_impact);

    let confidence = dependencies
        .iter()
        .map(|d| d.confidence)
        .max_by_key(|confidence| confidence.rank())
        .unwrap_or(Confidence::High);

    let security_count = dependencies.iter().filter(|d| d.is_security_update).count();
    let breaking_count = dependencies.iter().filter(|d| d.is_breaking).count();

    let mut reasoning = vec![format!("Assessed {} dependencies", dependencies.len())];
    if security_count > 0 {
        reasoning.push(format!("{security_count} security update(s) included"));
    }
    if breaking_count > 0 {
        reasoning.push(format!("{breaking_count} update(s) with breaking changes"));
    }
    reasoning.push(format!("Overall impact: {overall_impact}"));

    let total_vulnerabilities = dependencies
        .iter()
        .filter_map(|d| d.security_analysis.as_ref())
        .map(|s| s.vulnerabilities.len())
        .sum();

    let high_severity_vulnerabilities = dependencies
        .iter()
        .filter_map(|d| d.security_analysis.as_ref())
        .map(|s| s.high_severity_count())
        .sum();

    let critical_breaking_indicators = dependencies
        .iter()
        .filter_map(|d| d.breaking_change_analysis.as_ref())
        .map(|b| b.critical_indicator_count())
        .sum();

    ImpactAssessment {
        overall_impact,
        recommended_changeset_type: overall_impact,
        is_security_update: security_count > 0,
        has_breaking_changes: breaking_count > 0,
        has_downgrades: dependencies.iter().any(|d| d.is_downgrade),
        has_prereleases: dependencies.iter().any(|d| d.is_prerelease),
        confidence,
        reasoning,
        total_vulnerabilities,
        high_severity_vulnerabilities,
        critical_breaking_indicators,
        overall_risk_score: risk_score(&dependencies),
        dependencies,
    }
}

/// Mean of per-dependency risk (security risk score plus weighted indicator
/// count), capped at [`MAX_RISK_SCORE`].
fn risk_score(dependencies: &[DependencyImpact]) -> f64 {
    if dependencies.is_empty() {
        return 0.0;
    }

    let total: f64 = dependencies
        .iter()
        .map(|d| {
            let security = d.security_analysis.as_ref().map_or(0.0, |s| s.risk_score);
            let breaking = d
                .breaking_change_analysis
                .as_ref()
                .map_or(0.0, |b| b.indicators.len() as f64 * BREAKING_INDICATOR_WEIGHT);
            security + breaking
        })
        .sum();

    (total / dependencies.len() as f64).min(MAX_RISK_SCORE)
}
