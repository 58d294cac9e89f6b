//! The capability catalog.
//!
//! A catalog is built once per invocation by [`loader::load`] from
//! [`source::CapabilitySource`] values and is read-only afterwards. Every
//! composition component borrows it; nothing mutates a record after load.

pub mod builtin;
pub mod loader;
pub mod source;

use crate::error::{AgentkitError, Result};
use crate::types::{CapabilityKind, CapabilityStatus, Relation};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub use loader::{load, load_dirs};
pub use source::{CapabilitySource, RawCapability};

// ---------------------------------------------------------------------------
// CapabilityRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityRecord {
    pub id: String,
    pub kind: CapabilityKind,
    pub name: String,
    pub description: String,
    pub version: String,
    pub status: CapabilityStatus,
    /// Declaration order is kept; resolution order depends on it.
    pub required_dependencies: Vec<String>,
    pub optional_dependencies: Vec<String>,
    pub suggested_dependencies: Vec<String>,
    /// Effective conflicts: declared ones plus reverse edges materialized at load.
    pub conflicts: BTreeSet<String>,
    pub declared_conflicts: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    /// Where the record was defined (file path or embedded document name).
    pub origin: String,
}

impl CapabilityRecord {
    pub fn conflicts_with(&self, other: &str) -> bool {
        self.conflicts.contains(other)
    }

    /// Every reference subject to referential-integrity checks, in declaration order.
    pub fn references(&self) -> impl Iterator<Item = (Relation, &str)> {
        let required = self
            .required_dependencies
            .iter()
            .map(|id| (Relation::Requires, id.as_str()));
        let optional = self
            .optional_dependencies
            .iter()
            .map(|id| (Relation::Optional, id.as_str()));
        let conflicts = self
            .declared_conflicts
            .iter()
            .map(|id| (Relation::Conflicts, id.as_str()));
        required.chain(optional).chain(conflicts)
    }

    /// Conflicts implied by another record's declaration rather than this one's.
    pub fn implied_conflicts(&self) -> impl Iterator<Item = &str> {
        self.conflicts
            .difference(&self.declared_conflicts)
            .map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// CapabilityCatalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct CapabilityCatalog {
    records: BTreeMap<String, CapabilityRecord>,
}

impl CapabilityCatalog {
    pub(crate) fn from_records(records: BTreeMap<String, CapabilityRecord>) -> Self {
        Self { records }
    }

    pub fn get(&self, id: &str) -> Option<&CapabilityRecord> {
        self.records.get(id)
    }

    /// Like [`get`](Self::get) but a missing id is an `UnknownCapability` error.
    pub fn require(&self, id: &str) -> Result<&CapabilityRecord> {
        self.get(id)
            .ok_or_else(|| AgentkitError::UnknownCapability(vec![id.to_string()]))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// All ids in lexicographic order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapabilityRecord> {
        self.records.values()
    }

    pub fn by_kind(&self, kind: CapabilityKind) -> impl Iterator<Item = &CapabilityRecord> {
        self.records.values().filter(move |r| r.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

/// Builders shared by the composition tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use super::source::{CapabilitySource, RawCapability};
    use super::CapabilityCatalog;

    pub fn raw(id: &str) -> RawCapability {
        let kind = match id.split('/').next() {
            Some("workflows") => "workflow",
            Some("commands") => "command",
            _ => "skill",
        };
        RawCapability {
            id: Some(id.to_string()),
            kind: Some(kind.to_string()),
            name: Some(id.rsplit('/').next().unwrap_or(id).to_string()),
            version: Some("1.0.0".to_string()),
            ..RawCapability::default()
        }
    }

    pub fn requires(id: &str, deps: &[&str]) -> RawCapability {
        RawCapability {
            requires: deps.iter().map(|d| d.to_string()).collect(),
            ..raw(id)
        }
    }

    pub fn catalog(records: Vec<RawCapability>) -> CapabilityCatalog {
        let sources = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| CapabilitySource::new(format!("fixture-{i}"), record));
        super::load(sources).expect("fixture catalog should load")
    }
}
