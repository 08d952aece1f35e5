//! Impact calculation: maps a classified change plus policy onto a
//! changeset level, and derives the breaking/downgrade/prerelease flags.

use std::cmp::Ordering;

use crate::assess::options::ImpactAssessmentOptions;
use crate::assess::version::{compare_versions, SemverInfo};
use crate::model::{DependencyUpdate, SemverImpact, Severity, UpdateType, VersionChange};

/// Base impact of a change before security and manager adjustments.
pub fn impact_for(
    change: VersionChange,
    current: &SemverInfo,
    next: &SemverInfo,
    options: &ImpactAssessmentOptions,
) -> SemverImpact {
    match change {
        VersionChange::Major => SemverImpact::Major,
        VersionChange::Minor => SemverImpact::Minor,
        VersionChange::Patch => SemverImpact::Patch,
        // Any detected update is worth at least a patch note.
        VersionChange::Unchanged => SemverImpact::Patch,
        VersionChange::Unknown => options.default_changeset_type,
        VersionChange::Prerelease => prerelease_impact(current, next, options),
    }
}

fn prerelease_impact(
    current: &SemverInfo,
    next: &SemverInfo,
    options: &ImpactAssessmentOptions,
) -> SemverImpact {
    let (Some(current), Some(next)) = (current.as_valid(), next.as_valid()) else {
        return options.default_changeset_type;
    };

    match (current.has_prerelease(), next.has_prerelease()) {
        // Graduating to stable: judge by the base versions.
        (true, false) => {
            if current.major != next.major {
                SemverImpact::Major
            } else if current.minor != next.minor {
                SemverImpact::Minor
            } else {
                SemverImpact::Patch
            }
        }
        (false, true) if options.prerelease_as_lower_impact => SemverImpact::Patch,
        (false, true) => SemverImpact::Minor,
        _ => SemverImpact::Patch,
    }
}

/// Whether the update should be flagged as breaking.
///
/// Checks run in order and the first positive one wins.
pub fn is_breaking(
    change: VersionChange,
    current: &SemverInfo,
    next: &SemverInfo,
    update: &DependencyUpdate,
    options: &ImpactAssessmentOptions,
) -> bool {
    if change == VersionChange::Major && options.major_as_breaking_for(&update.manager) {
        match (current.as_valid(), next.as_valid()) {
            // 0.x.x lines break on minor.
            (Some(c), Some(n)) if c.major == 0 && n.major == 0 => {
                if c.minor != n.minor {
                    return true;
                }
            }
            _ => return true,
        }
    }

    if change == VersionChange::Minor && current.is_zero_major() {
        return true;
    }

    if update.update_type == UpdateType::Replacement {
        return true;
    }

    update.is_security_update
        && update.security_severity == Some(Severity::Critical)
        && change == VersionChange::Major
}

/// `true` when `next` orders strictly before `current`. Invalid input is never a downgrade.
pub fn is_downgrade(current: &SemverInfo, next: &SemverInfo) -> bool {
    match (current.as_valid(), next.as_valid()) {
        (Some(current), Some(next)) => compare_versions(next, current) == Ordering::Less,
        _ => false,
    }
}

pub fn is_prerelease(current: &SemverInfo, next: &SemverInfo) -> bool {
    current.has_prerelease() || next.has_prerelease()
}

/// Applies the security floor. Never lowers `impact`.
pub fn apply_security_floor(
    impact: SemverImpact,
    update: &DependencyUpdate,
    options: &ImpactAssessmentOptions,
) -> SemverImpact {
    if !update.is_security_update || !options.security_minimum_patch {
        return impact;
    }

    if update.security_severity == Some(Severity::Critical) && impact == SemverImpact::Patch {
        SemverImpact::Minor
    } else {
        impact.max(SemverImpact::Patch)
    }
}

/// Applies the manager rule's `default_impact`, which may only soften a
/// non-major impact.
pub fn apply_manager_rule(
    impact: SemverImpact,
    update: &DependencyUpdate,
    options: &ImpactAssessmentOptions,
) -> SemverImpact {
    let Some(rule_impact) = options
        .manager_rule(&update.manager)
        .and_then(|rule| rule.default_impact)
    else {
        return impact;
    };

    if impact != SemverImpact::Major && rule_impact.rank() < impact.rank() {
        rule_impact
    } else {
        impact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assess::options::ManagerRule;
    use crate::assess::version::parse_version;
    use proptest::prelude::*;

    fn versions(a: &str, b: &str) -> (SemverInfo, SemverInfo) {
        (parse_version(Some(a)), parse_version(Some(b)))
    }

    fn npm(current: &str, next: &str) -> DependencyUpdate {
        DependencyUpdate::new("left-pad", Some(current), Some(next), "npm")
    }

    #[test]
    fn test_direct_mappings() {
        let options = ImpactAssessmentOptions::default();
        let (a, b) = versions("1.0.0", "1.0.0");

        assert_eq!(impact_for(VersionChange::Major, &a, &b, &options), SemverImpact::Major);
        assert_eq!(impact_for(VersionChange::Minor, &a, &b, &options), SemverImpact::Minor);
        assert_eq!(impact_for(VersionChange::Patch, &a, &b, &options), SemverImpact::Patch);
        assert_eq!(impact_for(VersionChange::Unchanged, &a, &b, &options), SemverImpact::Patch);
    }

    #[test]
    fn test_unknown_uses_default_changeset_type() {
        let options =
            ImpactAssessmentOptions::default().with_default_changeset_type(SemverImpact::Minor);
        let (a, b) = versions("garbage", "1.0.0");

        assert_eq!(impact_for(VersionChange::Unknown, &a, &b, &options), SemverImpact::Minor);
        assert_eq!(impact_for(VersionChange::Prerelease, &a, &b, &options), SemverImpact::Minor);
    }

    #[test]
    fn test_graduating_prerelease() {
        let options = ImpactAssessmentOptions::default();

        let (a, b) = versions("1.0.0-beta.1", "1.0.0");
        assert_eq!(impact_for(VersionChange::Prerelease, &a, &b, &options), SemverImpact::Patch);

        let (a, b) = versions("1.0.0-rc.1", "2.0.0");
        assert_eq!(impact_for(VersionChange::Prerelease, &a, &b, &options), SemverImpact::Major);

        let (a, b) = versions("1.1.0-rc.1", "1.2.0");
        assert_eq!(impact_for(VersionChange::Prerelease, &a, &b, &options), SemverImpact::Minor);
    }

    #[test]
    fn test_entering_prerelease_respects_policy() {
        let (a, b) = versions("1.0.0", "1.0.0-alpha");

        let lenient = ImpactAssessmentOptions::default();
        assert_eq!(impact_for(VersionChange::Prerelease, &a, &b, &lenient), SemverImpact::Patch);

        let strict = ImpactAssessmentOptions::default().with_prerelease_as_lower_impact(false);
        assert_eq!(impact_for(VersionChange::Prerelease, &a, &b, &strict), SemverImpact::Minor);
    }

    #[test]
    fn test_between_prereleases_is_patch() {
        let options = ImpactAssessmentOptions::default().with_prerelease_as_lower_impact(false);
        let (a, b) = versions("1.0.0-alpha", "1.0.0-beta");
        assert_eq!(impact_for(VersionChange::Prerelease, &a, &b, &options), SemverImpact::Patch);
    }

    #[test]
    fn test_major_is_breaking() {
        let options = ImpactAssessmentOptions::default();
        let (a, b) = versions("1.2.3", "2.0.0");
        let update = npm("1.2.3", "2.0.0");
        assert!(is_breaking(VersionChange::Major, &a, &b, &update, &options));

        let relaxed = options.with_major_as_breaking(false);
        assert!(!is_breaking(VersionChange::Major, &a, &b, &update, &relaxed));
    }

    #[test]
    fn test_manager_can_disable_major_as_breaking() {
        let options = ImpactAssessmentOptions::default().with_manager_rule(
            "npm",
            ManagerRule {
                major_as_breaking: Some(false),
                ..ManagerRule::default()
            },
        );
        let (a, b) = versions("1.2.3", "2.0.0");
        assert!(!is_breaking(VersionChange::Major, &a, &b, &npm("1.2.3", "2.0.0"), &options));
    }

    #[test]
    fn test_zero_major_minor_bump_is_breaking() {
        let options = ImpactAssessmentOptions::default().with_major_as_breaking(false);
        let (a, b) = versions("0.2.0", "0.3.0");
        assert!(is_breaking(VersionChange::Minor, &a, &b, &npm("0.2.0", "0.3.0"), &options));

        let (a, b) = versions("1.2.0", "1.3.0");
        assert!(!is_breaking(VersionChange::Minor, &a, &b, &npm("1.2.0", "1.3.0"), &options));
    }

    #[test]
    fn test_replacement_is_always_breaking() {
        let options = ImpactAssessmentOptions::default();
        let update = npm("1.0.0", "1.0.1").with_update_type(UpdateType::Replacement);
        let (a, b) = versions("1.0.0", "1.0.1");
        assert!(is_breaking(VersionChange::Patch, &a, &b, &update, &options));
    }

    #[test]
    fn test_critical_security_major_is_breaking() {
        let options = ImpactAssessmentOptions::default().with_major_as_breaking(false);
        let (a, b) = versions("1.0.0", "2.0.0");

        let critical = npm("1.0.0", "2.0.0").with_security(Some(Severity::Critical));
        assert!(is_breaking(VersionChange::Major, &a, &b, &critical, &options));

        let high = npm("1.0.0", "2.0.0").with_security(Some(Severity::High));
        assert!(!is_breaking(VersionChange::Major, &a, &b, &high, &options));
    }

    #[test]
    fn test_downgrade_detection() {
        let (a, b) = versions("2.0.0", "1.9.9");
        assert!(is_downgrade(&a, &b));

        let (a, b) = versions("1.0.0", "1.0.0-rc.1");
        assert!(is_downgrade(&a, &b));

        let (a, b) = versions("1.0.0", "1.0.1");
        assert!(!is_downgrade(&a, &b));

        let (a, b) = versions("nope", "1.0.0");
        assert!(!is_downgrade(&a, &b));
        assert!(!is_downgrade(&b, &a));
    }

    #[test]
    fn test_prerelease_flag() {
        let (a, b) = versions("1.0.0", "1.1.0-beta");
        assert!(is_prerelease(&a, &b));
        let (a, b) = versions("1.0.0", "1.1.0+build");
        assert!(!is_prerelease(&a, &b));
    }

    #[test]
    fn test_security_floor() {
        let options = ImpactAssessmentOptions::default();

        let critical = npm("1.0.0", "1.0.1").with_security(Some(Severity::Critical));
        assert_eq!(apply_security_floor(SemverImpact::Patch, &critical, &options), SemverImpact::Minor);
        assert_eq!(apply_security_floor(SemverImpact::Major, &critical, &options), SemverImpact::Major);

        let high = npm("1.0.0", "1.0.1").with_security(Some(Severity::High));
        assert_eq!(apply_security_floor(SemverImpact::Patch, &high, &options), SemverImpact::Patch);
        assert_eq!(apply_security_floor(SemverImpact::Minor, &high, &options), SemverImpact::Minor);

        let disabled = options.with_security_minimum_patch(false);
        assert_eq!(apply_security_floor(SemverImpact::Patch, &critical, &disabled), SemverImpact::Patch);
    }

    #[test]
    fn test_manager_rule_only_softens() {
        let options = ImpactAssessmentOptions::default().with_manager_rule(
            "npm",
            ManagerRule {
                default_impact: Some(SemverImpact::Patch),
                ..ManagerRule::default()
            },
        );
        let update = npm("1.0.0", "1.1.0");

        assert_eq!(apply_manager_rule(SemverImpact::Minor, &update, &options), SemverImpact::Patch);
        assert_eq!(apply_manager_rule(SemverImpact::Major, &update, &options), SemverImpact::Major);

        let other = DependencyUpdate::new("serde", Some("1.0.0"), Some("1.1.0"), "cargo");
        assert_eq!(apply_manager_rule(SemverImpact::Minor, &other, &options), SemverImpact::Minor);
    }

    proptest! {
        #[test]
        fn manager_rule_never_escalates(
            impact in prop_oneof![Just(SemverImpact::Patch), Just(SemverImpact::Minor)],
            rule_impact in prop_oneof![
                Just(SemverImpact::Patch),
                Just(SemverImpact::Minor),
                Just(SemverImpact::Major),
            ],
        ) {
            let options = ImpactAssessmentOptions::default().with_manager_rule(
                "npm",
                ManagerRule {
                    default_impact: Some(rule_impact),
                    ..ManagerRule::default()
                },
            );
            let result = apply_manager_rule(impact, &npm("1.0.0", "1.0.1"), &options);
            prop_assert!(result.rank() <= impact.rank());
            prop_assert_ne!(result, SemverImpact::Major);
        }
    }
}
