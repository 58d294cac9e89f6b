//! Building a [`CapabilityCatalog`] from parsed sources.
//!
//! Loading happens in two passes:
//!
//! 1. Each source is checked and converted into a typed [`CapabilityRecord`].
//!    Missing scalar fields, unknown kinds or statuses, non-semver versions and
//!    self-references are rejected as `MalformedCapability`; a second record
//!    with an id already seen is a `DuplicateCapability`.
//! 2. Conflict normalization: for every declared conflict `A → B` with `B` in
//!    the catalog, `A` is added to `B`'s effective conflict set. Declared
//!    conflicts stay available on `declared_conflicts`.
//!
//! Referential integrity is not checked here; see [`crate::compose::validate`].

use super::source::{self, CapabilitySource, RawCapability};
use super::{CapabilityCatalog, CapabilityRecord};
use crate::error::{AgentkitError, Result};
use crate::types::{CapabilityKind, CapabilityStatus};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::OnceLock;

static SEMVER_RE: OnceLock<Regex> = OnceLock::new();

fn semver_re() -> &'static Regex {
    SEMVER_RE.get_or_init(|| {
        Regex::new(r"^\d+\.\d+\.\d+(?:-[0-9A-Za-z.\-]+)?(?:\+[0-9A-Za-z.\-]+)?$").unwrap()
    })
}

pub fn load(sources: impl IntoIterator<Item = CapabilitySource>) -> Result<CapabilityCatalog> {
    let mut records: BTreeMap<String, CapabilityRecord> = BTreeMap::new();

    for src in sources {
        let record = build_record(src)?;
        if let Some(existing) = records.get(&record.id) {
            return Err(AgentkitError::DuplicateCapability {
                id: record.id,
                first: existing.origin.clone(),
                second: record.origin,
            });
        }
        tracing::debug!(id = %record.id, origin = %record.origin, "loaded capability");
        records.insert(record.id.clone(), record);
    }

    normalize_conflicts(&mut records);
    tracing::debug!(count = records.len(), "capability catalog built");
    Ok(CapabilityCatalog::from_records(records))
}

/// Read and load every capability document under `dirs`.
pub fn load_dirs<P: AsRef<Path>>(dirs: &[P]) -> Result<CapabilityCatalog> {
    load(source::read_dirs(dirs)?)
}

fn build_record(src: CapabilitySource) -> Result<CapabilityRecord> {
    let CapabilitySource { origin, record } = src;
    let malformed = |reason: String| AgentkitError::MalformedCapability {
        origin: origin.clone(),
        reason,
    };

    let RawCapability {
        id,
        kind,
        name,
        description,
        version,
        status,
        requires,
        optional,
        suggests,
        conflicts,
        tags,
    } = record;

    let id = required_field("id", id).map_err(&malformed)?;
    let kind = required_field("kind", kind).map_err(&malformed)?;
    let name = required_field("name", name).map_err(&malformed)?;
    let version = required_field("version", version).map_err(&malformed)?;

    let kind: CapabilityKind = kind
        .parse()
        .map_err(|_| malformed(format!("unknown kind '{kind}'")))?;
    let status = match status.as_deref().map(str::trim) {
        None | Some("") => CapabilityStatus::default(),
        Some(s) => s
            .parse()
            .map_err(|_| malformed(format!("unknown status '{s}'")))?,
    };
    if !semver_re().is_match(&version) {
        return Err(malformed(format!(
            "version '{version}' is not a semantic version"
        )));
    }

    let required_dependencies = reference_list(&id, "requires", requires).map_err(&malformed)?;
    let optional_dependencies = reference_list(&id, "optional", optional).map_err(&malformed)?;
    let suggested_dependencies = reference_list(&id, "suggests", suggests).map_err(&malformed)?;
    let declared_conflicts: BTreeSet<String> = reference_list(&id, "conflicts", conflicts)
        .map_err(&malformed)?
        .into_iter()
        .collect();
    let tags = tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    Ok(CapabilityRecord {
        id,
        kind,
        name,
        description: description.unwrap_or_default().trim().to_string(),
        version,
        status,
        required_dependencies,
        optional_dependencies,
        suggested_dependencies,
        conflicts: declared_conflicts.clone(),
        declared_conflicts,
        tags,
        origin,
    })
}

fn required_field(field: &str, value: Option<String>) -> std::result::Result<String, String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(format!("missing required field '{field}'")),
    }
}

/// Trim, reject blanks and self-references, drop repeats keeping first occurrence.
fn reference_list(
    id: &str,
    field: &str,
    refs: Vec<String>,
) -> std::result::Result<Vec<String>, String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(refs.len());
    for r in refs {
        let r = r.trim().to_string();
        if r.is_empty() {
            return Err(format!("empty entry in '{field}'"));
        }
        if r == id {
            return Err(format!("'{id}' references itself in '{field}'"));
        }
        if seen.insert(r.clone()) {
            out.push(r);
        }
    }
    Ok(out)
}

fn normalize_conflicts(records: &mut BTreeMap<String, CapabilityRecord>) {
    let declared: Vec<(String, String)> = records
        .values()
        .flat_map(|r| {
            r.declared_conflicts
                .iter()
                .map(move |other| (r.id.clone(), other.clone()))
        })
        .collect();

    for (from, to) in declared {
        if let Some(target) = records.get_mut(&to) {
            if target.conflicts.insert(from.clone()) {
                tracing::trace!(from = %from, to = %to, "materialized reverse conflict");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
