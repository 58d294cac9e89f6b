use crate::catalog::CapabilityCatalog;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Two capabilities that must not be selected together. `first < second`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ConflictPair {
    pub first: String,
    pub second: String,
}

impl ConflictPair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }
}

impl fmt::Display for ConflictPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.first, self.second)
    }
}

/// Every conflicting pair inside `resolved`, each reported once, sorted.
///
/// Both directions are checked so a catalog whose reverse conflict edges were
/// never materialized is still handled.
pub fn find_conflicts(catalog: &CapabilityCatalog, resolved: &BTreeSet<String>) -> Vec<ConflictPair> {
    let ids: Vec<&str> = resolved.iter().map(String::as_str).collect();
    let mut pairs = Vec::new();
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            if declares_conflict(catalog, a, b) || declares_conflict(catalog, b, a) {
                pairs.push(ConflictPair::new(*a, *b));
            }
        }
    }
    pairs
}

fn declares_conflict(catalog: &CapabilityCatalog, from: &str, to: &str) -> bool {
    catalog
        .get(from)
        .map(|r| r.conflicts_with(to))
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
