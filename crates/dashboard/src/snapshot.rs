//! Immutable aggregation result.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::merge::Merged;
use crate::normalize::ResourceSummary;
use crate::source::SourceKey;
use crate::stats::DashboardStats;

/// One complete aggregation run.
///
/// Built in one step from every resolved source; there is no way to patch a
/// field afterwards, only to build a new snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    #[serde(flatten)]
    sources: BTreeMap<SourceKey, ResourceSummary>,
    stats: DashboardStats,
    fallbacks: BTreeSet<SourceKey>,
}

impl DashboardSnapshot {
    /// Assemble a snapshot from every `(key, merged)` pair of one run.
    pub fn assemble<I>(resolved: I) -> Self
    where
        I: IntoIterator<Item = (SourceKey, Merged)>,
    {
        let mut sources = BTreeMap::new();
        let mut fallbacks = BTreeSet::new();

        for (key, merged) in resolved {
            if merged.fell_back() {
                fallbacks.insert(key);
            }
            sources.insert(key, merged.summary);
        }

        let stats = DashboardStats::compute(&sources);

        Self {
            sources,
            stats,
            fallbacks,
        }
    }

    pub fn get(&self, key: SourceKey) -> Option<&ResourceSummary> {
        self.sources.get(&key)
    }

    pub fn sources(&self) -> &BTreeMap<SourceKey, ResourceSummary> {
        &self.sources
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    /// Sources whose value is their fallback in this snapshot.
    pub fn fallbacks(&self) -> &BTreeSet<SourceKey> {
        &self.fallbacks
    }

    /// Every source fell back.
    pub fn is_total_outage(&self) -> bool {
        !self.sources.is_empty() && self.fallbacks.len() == self.sources.len()
    }

    /// Non-blocking notice for the rendering layer, if anything fell back.
    pub fn notice(&self) -> Option<String> {
        if self.is_total_outage() {
            return Some("The dashboard could not reach the server; showing empty data.".to_string());
        }
        if self.fallbacks.is_empty() {
            return None;
        }
        let names: Vec<&str> = self.fallbacks.iter().map(SourceKey::as_str).collect();
        Some(format!("Some data could not be loaded: {}.", names.join(", ")))
    }
}
