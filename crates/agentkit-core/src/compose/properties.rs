//! Property tests over randomly generated acyclic and cyclic catalogs.

use super::*;
use crate::catalog::fixtures::{catalog, raw};
use crate::catalog::{CapabilityCatalog, RawCapability};
use proptest::prelude::*;
use std::collections::BTreeSet;

const MAX_NODES: usize = 8;

fn id(i: usize) -> String {
    format!("skills/s{i}")
}

/// Edge lists per node; self-references are dropped since the loader rejects them.
fn edges(n: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    proptest::collection::vec(proptest::collection::vec(0..n, 0..3), n).prop_map(|lists| {
        lists
            .into_iter()
            .enumerate()
            .map(|(i, targets)| targets.into_iter().filter(|t| *t != i).collect())
            .collect()
    })
}

fn arb_catalog() -> impl Strategy<Value = CapabilityCatalog> {
    (2..=MAX_NODES)
        .prop_flat_map(|n| (Just(n), edges(n), edges(n), edges(n)))
        .prop_map(|(n, requires, suggests, conflicts)| {
            let ids = |targets: &[usize]| targets.iter().map(|t| id(*t)).collect::<Vec<_>>();
            let records = (0..n)
                .map(|i| RawCapability {
                    requires: ids(&requires[i]),
                    suggests: ids(&suggests[i]),
                    conflicts: ids(&conflicts[i]),
                    ..raw(&id(i))
                })
                .collect();
            catalog(records)
        })
}

fn arb_case() -> impl Strategy<Value = (CapabilityCatalog, Vec<String>)> {
    arb_catalog().prop_flat_map(|cat| {
        let ids: Vec<String> = cat.ids().map(str::to_string).collect();
        let max = ids.len().min(3);
        let picks = proptest::sample::subsequence(ids, 0..=max);
        (Just(cat), picks)
    })
}

proptest! {
    #[test]
    fn resolved_set_is_closed_under_requires((cat, requested) in arb_case()) {
        let r = resolve(&cat, &requested).unwrap();
        for member in &r.resolved {
            for dep in &cat.get(member).unwrap().required_dependencies {
                prop_assert!(r.resolved.contains(dep), "{member} requires {dep}");
            }
        }
    }

    #[test]
    fn resolved_is_superset_of_requested((cat, requested) in arb_case()) {
        let r = resolve(&cat, &requested).unwrap();
        for id in &requested {
            prop_assert!(r.contains(id));
        }
    }

    #[test]
    fn resolution_is_idempotent((cat, requested) in arb_case()) {
        let once = resolve(&cat, &requested).unwrap();
        let again: Vec<&str> = once.resolved.iter().map(String::as_str).collect();
        let twice = resolve(&cat, &again).unwrap();
        prop_assert_eq!(&once.resolved, &twice.resolved);
        prop_assert!(twice.resolution_trace.is_empty());
    }

    #[test]
    fn every_added_id_has_a_chain_from_a_request((cat, requested) in arb_case()) {
        let r = resolve(&cat, &requested).unwrap();
        for added in r.added() {
            let chain = r.chain_for(added).unwrap();
            prop_assert!(requested.contains(&chain[0]));
        }
    }

    #[test]
    fn recommendations_stay_outside_and_compatible((cat, requested) in arb_case()) {
        let r = resolve(&cat, &requested).unwrap();
        let recs = recommend(&cat, &r.resolved, &RecommendationPolicy::default());
        for rec in &recs {
            prop_assert!(!r.resolved.contains(&rec.id));
            let candidate = cat.get(&rec.id).unwrap();
            for member in &r.resolved {
                prop_assert!(!candidate.conflicts_with(member));
                prop_assert!(!cat.get(member).unwrap().conflicts_with(&rec.id));
            }
        }
    }

    #[test]
    fn conflict_pairs_are_canonical_and_unique((cat, requested) in arb_case()) {
        let r = resolve(&cat, &requested).unwrap();
        let pairs = find_conflicts(&cat, &r.resolved);
        let unique: BTreeSet<&ConflictPair> = pairs.iter().collect();
        prop_assert_eq!(unique.len(), pairs.len());
        for pair in &pairs {
            prop_assert!(pair.first < pair.second);
            prop_assert!(r.resolved.contains(&pair.first) && r.resolved.contains(&pair.second));
            let a = cat.get(&pair.first).unwrap();
            let b = cat.get(&pair.second).unwrap();
            prop_assert!(a.conflicts_with(&pair.second) && b.conflicts_with(&pair.first));
        }
    }

    #[test]
    fn cycles_follow_required_edges((cat, requested) in arb_case()) {
        let r = resolve(&cat, &requested).unwrap();
        for cycle in find_cycles(&cat, &r.resolved) {
            prop_assert!(!cycle.is_empty());
            for (i, from) in cycle.iter().enumerate() {
                let to = &cycle[(i + 1) % cycle.len()];
                prop_assert!(cat.get(from).unwrap().required_dependencies.contains(to));
            }
        }
    }

    #[test]
    fn validity_matches_report_contents((cat, requested) in arb_case()) {
        let report = validate(&cat, &requested).unwrap();
        let clean = report.missing_references.is_empty()
            && report.conflicts.is_empty()
            && report.cycles.is_empty();
        prop_assert_eq!(report.is_valid, clean);
    }
}
