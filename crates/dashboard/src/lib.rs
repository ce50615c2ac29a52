//! `atrium-dashboard`: overview snapshot aggregation.
//!
//! Fans out one read per backend resource, isolates every failure behind a
//! per-source fallback, and folds the results into an immutable
//! [`DashboardSnapshot`] with derived statistics.

pub mod aggregator;
pub mod board;
pub mod config;
pub mod fetch;
pub mod merge;
pub mod normalize;
pub mod snapshot;
pub mod source;
pub mod stats;

pub use aggregator::{AggregatorError, DashboardAggregator};
pub use board::{Displayed, SnapshotBoard, Ticket};
pub use config::{ConfigError, DashboardConfig};
pub use fetch::{FetchError, HttpSource, SourceFetcher};
pub use merge::{FallbackCause, Merged, merge};
pub use normalize::{ListNormalizer, NormalizeError, Normalizer, ResourceSummary, coerce_count};
pub use snapshot::DashboardSnapshot;
pub use source::{DataSourceSpec, SourceKey, empty_list, standard_sources};
pub use stats::DashboardStats;
