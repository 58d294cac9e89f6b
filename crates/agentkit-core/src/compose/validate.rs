use super::conflict::{find_conflicts, ConflictPair};
use super::cycle::{find_catalog_cycles, find_cycles};
use super::recommend::{recommend, Recommendation, RecommendationPolicy};
use super::resolve::{resolve, ResolvedCapabilitySet};
use super::{dedup_ids, MissingReference};
use crate::catalog::CapabilityCatalog;
use crate::error::Result;
use serde::Serialize;

// ---------------------------------------------------------------------------
// ValidationReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub requested: Vec<String>,
    pub missing_references: Vec<MissingReference>,
    pub conflicts: Vec<ConflictPair>,
    pub cycles: Vec<Vec<String>>,
    pub recommendations: Vec<Recommendation>,
    /// Absent when unknown requested ids stopped validation before resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<ResolvedCapabilitySet>,
}

impl ValidationReport {
    fn unresolved(requested: Vec<String>, missing_references: Vec<MissingReference>) -> Self {
        Self {
            is_valid: false,
            requested,
            missing_references,
            conflicts: Vec::new(),
            cycles: Vec::new(),
            recommendations: Vec::new(),
            resolved: None,
        }
    }

    /// Resolved ids, or nothing when resolution never ran.
    pub fn resolved_ids(&self) -> impl Iterator<Item = &str> {
        self.resolved
            .iter()
            .flat_map(|r| r.resolved.iter().map(String::as_str))
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

pub struct Validator<'a> {
    catalog: &'a CapabilityCatalog,
    policy: RecommendationPolicy,
}

impl<'a> Validator<'a> {
    pub fn new(catalog: &'a CapabilityCatalog) -> Self {
        Self {
            catalog,
            policy: RecommendationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RecommendationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validate an agent's requested capability set.
    ///
    /// Unknown requested ids short-circuit: the report lists them and nothing
    /// is resolved. Otherwise the set is resolved and checked for dangling
    /// declared references, required cycles and conflicts, and
    /// recommendations are attached. Recommendations never affect validity.
    pub fn validate<S: AsRef<str>>(&self, requested: &[S]) -> Result<ValidationReport> {
        let requested = dedup_ids(requested);

        let unknown: Vec<MissingReference> = requested
            .iter()
            .filter(|id| !self.catalog.contains(id))
            .map(MissingReference::requested)
            .collect();
        if !unknown.is_empty() {
            tracing::debug!(count = unknown.len(), "unknown requested capabilities");
            return Ok(ValidationReport::unresolved(requested, unknown));
        }

        let resolved = resolve(self.catalog, &requested)?;
        let missing_references =
            missing_declared_references(self.catalog, resolved.resolved.iter().map(String::as_str));
        let cycles = find_cycles(self.catalog, &resolved.resolved);
        let conflicts = find_conflicts(self.catalog, &resolved.resolved);
        let recommendations = recommend(self.catalog, &resolved.resolved, &self.policy);

        let is_valid = missing_references.is_empty() && conflicts.is_empty() && cycles.is_empty();
        tracing::debug!(
            is_valid,
            resolved = resolved.resolved.len(),
            conflicts = conflicts.len(),
            cycles = cycles.len(),
            "validated capability set"
        );

        Ok(ValidationReport {
            is_valid,
            requested,
            missing_references,
            conflicts,
            cycles,
            recommendations,
            resolved: Some(resolved),
        })
    }
}

/// [`Validator::validate`] with the default recommendation policy.
pub fn validate<S: AsRef<str>>(
    catalog: &CapabilityCatalog,
    requested: &[S],
) -> Result<ValidationReport> {
    Validator::new(catalog).validate(requested)
}

// ---------------------------------------------------------------------------
// Whole-catalog check
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogReport {
    pub is_consistent: bool,
    pub capabilities: usize,
    pub missing_references: Vec<MissingReference>,
    pub cycles: Vec<Vec<String>>,
}

/// Referential integrity and required cycles across the entire catalog.
pub fn check_catalog(catalog: &CapabilityCatalog) -> CatalogReport {
    let missing_references = missing_declared_references(catalog, catalog.ids());
    let cycles = find_catalog_cycles(catalog);
    CatalogReport {
        is_consistent: missing_references.is_empty() && cycles.is_empty(),
        capabilities: catalog.len(),
        missing_references,
        cycles,
    }
}

fn missing_declared_references<'a>(
    catalog: &'a CapabilityCatalog,
    ids: impl Iterator<Item = &'a str>,
) -> Vec<MissingReference> {
    let mut missing: Vec<MissingReference> = ids
        .filter_map(|id| catalog.get(id))
        .flat_map(|record| {
            record
                .references()
                .filter(|(_, target)| !catalog.contains(target))
                .map(move |(relation, target)| {
                    MissingReference::declared(target, &record.id, relation)
                })
        })
        .collect();
    missing.sort();
    missing.dedup();
    missing
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::{catalog, raw, requires};
    use crate::catalog::RawCapability;
    use crate::types::Relation;

    #[test]
    fn clean_selection_is_valid() {
        let cat = catalog(vec![
            requires("workflows/bug-fix", &["skills/testing", "skills/debugging"]),
            raw("skills/testing"),
            raw("skills/debugging"),
        ]);
        let report = validate(&cat, &["workflows/bug-fix"]).unwrap();
        assert!(report.is_valid);
        assert_eq!(report.resolved_ids().count(), 3);
        assert!(report.missing_references.is_empty());
    }

    #[test]
    fn declared_conflict_invalidates() {
        let cat = catalog(vec![
            RawCapability {
                conflicts: vec!["skills/b".into()],
                ..raw("skills/a")
            },
            raw("skills/b"),
        ]);
        let report = validate(&cat, &["skills/a", "skills/b"]).unwrap();
        assert!(!report.is_valid);
        assert_eq!(report.conflicts, vec![ConflictPair::new("skills/a", "skills/b")]);
        assert!(report.cycles.is_empty());
    }

    #[test]
    fn transitive_conflict_is_reported() {
        let cat = catalog(vec![
            requires("workflows/fast", &["skills/skip-tests"]),
            RawCapability {
                conflicts: vec!["skills/testing".into()],
                ..raw("skills/skip-tests")
            },
            raw("skills/testing"),
        ]);
        let report = validate(&cat, &["workflows/fast", "skills/testing"]).unwrap();
        assert!(!report.is_valid);
        assert_eq!(
            report.conflicts,
            vec![ConflictPair::new("skills/skip-tests", "skills/testing")]
        );
    }

    #[test]
    fn unknown_requested_id_short_circuits() {
        let cat = catalog(vec![requires("skills/a", &["skills/b"]), raw("skills/b")]);
        let report = validate(&cat, &["skills/a", "skills/ghost"]).unwrap();
        assert!(!report.is_valid);
        assert_eq!(
            report.missing_references,
            vec![MissingReference::requested("skills/ghost")]
        );
        assert!(report.resolved.is_none());
        assert!(report.recommendations.is_empty());
        assert_eq!(report.resolved_ids().count(), 0);
    }

    #[test]
    fn cycle_in_selection_invalidates() {
        let cat = catalog(vec![
            requires("skills/x", &["skills/y"]),
            requires("skills/y", &["skills/x"]),
        ]);
        let report = validate(&cat, &["skills/x"]).unwrap();
        assert!(!report.is_valid);
        assert_eq!(report.cycles.len(), 1);
        assert!(report.conflicts.is_empty());
    }

    #[test]
    fn dangling_declared_reference_invalidates() {
        let cat = catalog(vec![
            RawCapability {
                requires: vec!["skills/gone".into()],
                optional: vec!["skills/also-gone".into()],
                ..raw("skills/a")
            },
        ]);
        let report = validate(&cat, &["skills/a"]).unwrap();
        assert!(!report.is_valid);
        assert_eq!(
            report.missing_references,
            vec![
                MissingReference::declared("skills/also-gone", "skills/a", Relation::Optional),
                MissingReference::declared("skills/gone", "skills/a", Relation::Requires),
            ]
        );
    }

    #[test]
    fn recommendations_do_not_affect_validity() {
        let cat = catalog(vec![
            RawCapability {
                suggests: vec!["skills/b".into()],
                ..raw("skills/a")
            },
            raw("skills/b"),
        ]);
        let report = validate(&cat, &["skills/a"]).unwrap();
        assert!(report.is_valid);
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].id, "skills/b");
    }

    #[test]
    fn validator_applies_policy_limit() {
        let cat = catalog(vec![
            RawCapability {
                suggests: vec!["skills/b".into(), "skills/c".into()],
                ..raw("skills/a")
            },
            raw("skills/b"),
            raw("skills/c"),
        ]);
        let policy = RecommendationPolicy::default().with_limit(Some(1));
        let report = Validator::new(&cat)
            .with_policy(policy)
            .validate(&["skills/a"])
            .unwrap();
        assert_eq!(report.recommendations.len(), 1);
    }

    #[test]
    fn catalog_check_reports_everything() {
        let cat = catalog(vec![
            requires("skills/x", &["skills/y"]),
            requires("skills/y", &["skills/x"]),
            RawCapability {
                conflicts: vec!["skills/nowhere".into()],
                ..raw("skills/z")
            },
        ]);
        let report = check_catalog(&cat);
        assert!(!report.is_consistent);
        assert_eq!(report.capabilities, 3);
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(
            report.missing_references,
            vec![MissingReference::declared(
                "skills/nowhere",
                "skills/z",
                Relation::Conflicts
            )]
        );
    }

    #[test]
    fn report_serializes_to_json() {
        let cat = catalog(vec![raw("skills/a")]);
        let report = validate(&cat, &["skills/a"]).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["is_valid"], true);
        assert_eq!(json["resolved"]["resolved"][0], "skills/a");
    }
}
