//! Capability composition: resolve a requested set against a catalog and
//! report what is wrong with it.
//!
//! Every function here is a pure computation over a borrowed
//! [`CapabilityCatalog`](crate::catalog::CapabilityCatalog). Conflicts,
//! cycles and dangling references are returned as data; only an unknown
//! *requested* id passed straight to [`resolve`] is an error.

pub mod conflict;
pub mod cycle;
pub mod recommend;
pub mod resolve;
pub mod validate;

#[cfg(test)]
mod properties;

use crate::types::Relation;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

pub use conflict::{find_conflicts, ConflictPair};
pub use cycle::{find_catalog_cycles, find_cycles};
pub use recommend::{recommend, Recommendation, RecommendationPolicy, RecommendationWeights};
pub use resolve::{resolve, ResolvedCapabilitySet};
pub use validate::{check_catalog, validate, CatalogReport, ValidationReport, Validator};

// ---------------------------------------------------------------------------
// MissingReference
// ---------------------------------------------------------------------------

/// A capability id that something points at but the catalog does not contain.
///
/// `referenced_by` and `relation` are `None` when the id was requested directly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MissingReference {
    pub id: String,
    pub referenced_by: Option<String>,
    pub relation: Option<Relation>,
}

impl MissingReference {
    pub fn requested(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            referenced_by: None,
            relation: None,
        }
    }

    pub fn declared(id: impl Into<String>, by: impl Into<String>, relation: Relation) -> Self {
        Self {
            id: id.into(),
            referenced_by: Some(by.into()),
            relation: Some(relation),
        }
    }
}

impl fmt::Display for MissingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.referenced_by, self.relation) {
            (Some(by), Some(rel)) => write!(f, "{} ({} from {})", self.id, rel, by),
            _ => write!(f, "{} (requested)", self.id),
        }
    }
}

/// Caller order, first occurrence wins.
pub(crate) fn dedup_ids<S: AsRef<str>>(ids: &[S]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    ids.iter()
        .map(|s| s.as_ref().to_string())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
