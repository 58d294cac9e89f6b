use crate::catalog::{CapabilityCatalog, CapabilityRecord};
use crate::types::CapabilityStatus;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationWeights {
    /// Points per distinct selected capability that suggests or optionally uses the candidate.
    #[serde(default = "default_referrer_weight")]
    pub referrer: u32,
    /// Points per tag the candidate shares with the selection.
    #[serde(default = "default_tag_weight")]
    pub tag_overlap: u32,
}

fn default_referrer_weight() -> u32 {
    10
}

fn default_tag_weight() -> u32 {
    1
}

impl Default for RecommendationWeights {
    fn default() -> Self {
        Self {
            referrer: default_referrer_weight(),
            tag_overlap: default_tag_weight(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default)]
    pub weights: RecommendationWeights,
}

impl RecommendationPolicy {
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        if limit.is_some() {
            self.limit = limit;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: String,
    pub score: u32,
    pub status: CapabilityStatus,
    /// Selected capabilities that suggest or optionally depend on this one.
    pub suggested_by: Vec<String>,
    pub shared_tags: Vec<String>,
}

/// Rank capabilities worth adding to `resolved`.
///
/// Candidates are the suggested and optional dependencies of the selection
/// that are not already selected. Deprecated capabilities, ids missing from
/// the catalog, and anything in conflict with the selection are dropped.
/// Ordering: score descending, then stable before draft, then id.
pub fn recommend(
    catalog: &CapabilityCatalog,
    resolved: &BTreeSet<String>,
    policy: &RecommendationPolicy,
) -> Vec<Recommendation> {
    let members: Vec<&CapabilityRecord> = resolved.iter().filter_map(|id| catalog.get(id)).collect();

    let mut referrers: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for member in &members {
        let candidates = member
            .suggested_dependencies
            .iter()
            .chain(&member.optional_dependencies);
        for candidate in candidates {
            if !resolved.contains(candidate) {
                referrers
                    .entry(candidate.as_str())
                    .or_default()
                    .insert(member.id.as_str());
            }
        }
    }

    let selection_tags: BTreeSet<&str> = members
        .iter()
        .flat_map(|m| m.tags.iter().map(String::as_str))
        .collect();

    let weights = &policy.weights;
    let mut ranked: Vec<Recommendation> = referrers
        .into_iter()
        .filter_map(|(id, by)| {
            let record = catalog.get(id)?;
            if record.status == CapabilityStatus::Deprecated {
                return None;
            }
            if conflicts_with_selection(record, &members) {
                tracing::debug!(id, "skipping recommendation that conflicts with selection");
                return None;
            }
            let shared_tags: Vec<String> = record
                .tags
                .iter()
                .filter(|t| selection_tags.contains(t.as_str()))
                .cloned()
                .collect();
            let score = weights
                .referrer
                .saturating_mul(by.len() as u32)
                .saturating_add(weights.tag_overlap.saturating_mul(shared_tags.len() as u32));
            Some(Recommendation {
                id: id.to_string(),
                score,
                status: record.status,
                suggested_by: by.into_iter().map(str::to_string).collect(),
                shared_tags,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.status.preference().cmp(&b.status.preference()))
            .then_with(|| a.id.cmp(&b.id))
    });
    if let Some(limit) = policy.limit {
        ranked.truncate(limit);
    }
    ranked
}

fn conflicts_with_selection(candidate: &CapabilityRecord, members: &[&CapabilityRecord]) -> bool {
    members
        .iter()
        .any(|m| candidate.conflicts_with(&m.id) || m.conflicts_with(&candidate.id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
