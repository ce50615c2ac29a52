//! Concurrent multi-source aggregation.
//!
//! Every source is fetched at once on the calling task (no spawned threads),
//! each behind its own timeout and fallback boundary, and the results are
//! joined into one [`DashboardSnapshot`].

use std::collections::HashSet;
use std::time::Duration;

use futures_util::future::join_all;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::DashboardConfig;
use crate::fetch::FetchError;
use crate::merge::merge;
use crate::snapshot::DashboardSnapshot;
use crate::source::{DataSourceSpec, SourceKey, standard_sources};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AggregatorError {
    #[error("data source '{0}' is declared more than once")]
    DuplicateSource(SourceKey),
    #[error("source timeout must be greater than zero")]
    ZeroTimeout,
}

#[derive(Debug, Clone)]
pub struct DashboardAggregator {
    sources: Vec<DataSourceSpec>,
    timeout: Duration,
}

impl DashboardAggregator {
    pub fn new(sources: Vec<DataSourceSpec>, timeout: Duration) -> Result<Self, AggregatorError> {
        if timeout.is_zero() {
            return Err(AggregatorError::ZeroTimeout);
        }

        let mut seen = HashSet::new();
        for source in &sources {
            if !seen.insert(source.key) {
                return Err(AggregatorError::DuplicateSource(source.key));
            }
        }

        Ok(Self { sources, timeout })
    }

    /// Aggregator over the standard HTTP source table.
    pub fn from_config(config: &DashboardConfig, client: reqwest::Client) -> Result<Self, AggregatorError> {
        Self::new(standard_sources(config, client), config.source_timeout)
    }

    pub fn sources(&self) -> &[DataSourceSpec] {
        &self.sources
    }

    /// Fetch every source concurrently and build a fresh snapshot.
    ///
    /// Never fails as a whole: a source that errors, times out or returns an
    /// unusable payload contributes its normalised fallback instead.
    pub async fn aggregate(&self) -> DashboardSnapshot {
        let fetches = self.sources.iter().map(|source| async move {
            let timeout = source.timeout.unwrap_or(self.timeout);
            let raw = match tokio::time::timeout(timeout, source.fetcher.fetch()).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(timeout)),
            };
            let merged = merge(source.key, raw, &source.fallback, source.normalizer.as_ref());
            (source.key, merged)
        });

        let resolved = join_all(fetches).await;
        let snapshot = DashboardSnapshot::assemble(resolved);

        if snapshot.is_total_outage() {
            warn!(sources = self.sources.len(), "every dashboard source failed; rendering fallbacks");
        } else {
            debug!(
                sources = self.sources.len(),
                fallbacks = snapshot.fallbacks().len(),
                "dashboard snapshot assembled"
            );
        }

        snapshot
    }
}
