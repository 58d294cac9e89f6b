use super::{dedup_ids, MissingReference};
use crate::catalog::CapabilityCatalog;
use crate::error::{AgentkitError, Result};
use crate::types::Relation;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

// ---------------------------------------------------------------------------
// ResolvedCapabilitySet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCapabilitySet {
    /// Requested ids, deduplicated, in caller order.
    pub requested: Vec<String>,
    /// `requested` plus everything transitively required. Closed under
    /// `required_dependencies` for ids present in the catalog.
    pub resolved: BTreeSet<String>,
    /// Added id → chain of ids that pulled it in, starting at a requested id.
    pub resolution_trace: BTreeMap<String, Vec<String>>,
    /// Required dependencies with no catalog entry. Not part of `resolved`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dangling: Vec<MissingReference>,
}

impl ResolvedCapabilitySet {
    pub fn contains(&self, id: &str) -> bool {
        self.resolved.contains(id)
    }

    /// Ids that were pulled in by dependencies rather than requested.
    pub fn added(&self) -> impl Iterator<Item = &str> {
        self.resolution_trace.keys().map(String::as_str)
    }

    pub fn chain_for(&self, id: &str) -> Option<&[String]> {
        self.resolution_trace.get(id).map(Vec::as_slice)
    }
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

/// Breadth-first closure over `required_dependencies`.
///
/// Optional and suggested dependencies are never added. Requested ids are
/// visited in caller order and each record's dependencies in declaration
/// order, so the first chain discovered for an id is the one traced.
/// Already-resolved ids are never re-queued, which also makes required
/// cycles terminate; reporting them is left to [`super::cycle`].
pub fn resolve<S: AsRef<str>>(
    catalog: &CapabilityCatalog,
    requested: &[S],
) -> Result<ResolvedCapabilitySet> {
    let requested = dedup_ids(requested);

    let unknown: Vec<String> = requested
        .iter()
        .filter(|id| !catalog.contains(id))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(AgentkitError::UnknownCapability(unknown));
    }

    let mut resolved: BTreeSet<String> = requested.iter().cloned().collect();
    let mut queue: VecDeque<String> = requested.iter().cloned().collect();
    let mut trace: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut dangling = Vec::new();

    while let Some(id) = queue.pop_front() {
        let Some(record) = catalog.get(&id) else {
            continue;
        };
        for dep in &record.required_dependencies {
            if resolved.contains(dep) {
                continue;
            }
            if !catalog.contains(dep) {
                tracing::debug!(from = %id, dep = %dep, "required dependency not in catalog");
                dangling.push(MissingReference::declared(dep, &id, Relation::Requires));
                continue;
            }
            let mut chain = trace.get(&id).cloned().unwrap_or_default();
            chain.push(id.clone());
            tracing::trace!(dep = %dep, via = ?chain, "resolved dependency");
            trace.insert(dep.clone(), chain);
            resolved.insert(dep.clone());
            queue.push_back(dep.clone());
        }
    }

    Ok(ResolvedCapabilitySet {
        requested,
        resolved,
        resolution_trace: trace,
        dangling,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
