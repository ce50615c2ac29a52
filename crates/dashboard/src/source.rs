//! Data-source table for the dashboard overview.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Value, json};

use crate::config::DashboardConfig;
use crate::fetch::{HttpSource, SourceFetcher};
use crate::normalize::{ListNormalizer, Normalizer};

/// Destination field of one source in the snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKey {
    Jobs,
    Scholarships,
    Blogs,
    Services,
    Applications,
    Messages,
    Users,
}

impl SourceKey {
    pub const ALL: [SourceKey; 7] = [
        SourceKey::Jobs,
        SourceKey::Scholarships,
        SourceKey::Blogs,
        SourceKey::Services,
        SourceKey::Applications,
        SourceKey::Messages,
        SourceKey::Users,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKey::Jobs => "jobs",
            SourceKey::Scholarships => "scholarships",
            SourceKey::Blogs => "blogs",
            SourceKey::Services => "services",
            SourceKey::Applications => "applications",
            SourceKey::Messages => "messages",
            SourceKey::Users => "users",
        }
    }

    /// Backend list endpoint, relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            SourceKey::Jobs => "jobs",
            SourceKey::Scholarships => "scholarships",
            SourceKey::Blogs => "blogs",
            SourceKey::Services => "services",
            SourceKey::Applications => "applications",
            SourceKey::Messages => "contacts",
            SourceKey::Users => "users",
        }
    }
}

impl core::fmt::Display for SourceKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape every list source falls back to.
pub fn empty_list() -> Value {
    json!({ "total": 0, "recent": [] })
}

/// One aggregation input: where to read, what to use instead on failure,
/// and how to normalise either.
#[derive(Clone)]
pub struct DataSourceSpec {
    pub key: SourceKey,
    pub fetcher: Arc<dyn SourceFetcher>,
    pub fallback: Value,
    pub normalizer: Arc<dyn Normalizer>,
    /// Overrides the aggregator-wide timeout for this source.
    pub timeout: Option<Duration>,
}

impl DataSourceSpec {
    pub fn new(key: SourceKey, fetcher: Arc<dyn SourceFetcher>) -> Self {
        Self {
            key,
            fetcher,
            fallback: empty_list(),
            normalizer: Arc::new(ListNormalizer::default()),
            timeout: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Value) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Arc<dyn Normalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl core::fmt::Debug for DataSourceSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DataSourceSpec")
            .field("key", &self.key)
            .field("fallback", &self.fallback)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// The overview's source table: one authenticated `GET` per resource.
pub fn standard_sources(config: &DashboardConfig, client: reqwest::Client) -> Vec<DataSourceSpec> {
    let normalizer: Arc<dyn Normalizer> = Arc::new(ListNormalizer::new(config.recent_limit));

    SourceKey::ALL
        .into_iter()
        .map(|key| {
            let mut http = HttpSource::new(client.clone(), config.endpoint(key.path()));
            if let Some(token) = &config.auth_token {
                http = http.with_token(token.clone());
            }
            DataSourceSpec::new(key, Arc::new(http)).with_normalizer(normalizer.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_sources_cover_every_key_once() {
        let config = DashboardConfig::default().with_api_url("http://backend/api");
        let sources = standard_sources(&config, reqwest::Client::new());

        let keys: Vec<_> = sources.iter().map(|s| s.key).collect();
        assert_eq!(keys, SourceKey::ALL.to_vec());
        assert!(sources.iter().all(|s| s.fallback == empty_list()));
    }

    #[test]
    fn messages_read_from_contacts_endpoint() {
        let config = DashboardConfig::default().with_api_url("http://backend/api/");
        assert_eq!(
            config.endpoint(SourceKey::Messages.path()),
            "http://backend/api/contacts"
        );
    }

    #[test]
    fn keys_serialize_as_field_names() {
        for key in SourceKey::ALL {
            assert_eq!(
                serde_json::to_value(key).unwrap(),
                Value::String(key.as_str().to_string())
            );
        }
    }
}
