//! Per-source fallback boundary.

use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use crate::fetch::FetchError;
use crate::normalize::{NormalizeError, Normalizer, ResourceSummary};
use crate::source::SourceKey;

/// Why a source ended up showing its fallback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FallbackCause {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Normalised value for one source, plus the cause if it fell back.
#[derive(Debug, Clone, PartialEq)]
pub struct Merged {
    pub summary: ResourceSummary,
    pub cause: Option<FallbackCause>,
}

impl Merged {
    pub fn fell_back(&self) -> bool {
        self.cause.is_some()
    }
}

/// Normalise `raw`, or the fallback when `raw` is an error or cannot be
/// normalised. The fallback goes through the same normaliser.
pub fn merge(
    key: SourceKey,
    raw: Result<Value, FetchError>,
    fallback: &Value,
    normalizer: &dyn Normalizer,
) -> Merged {
    let cause = match raw {
        Ok(value) => match normalizer.normalize(&value) {
            Ok(summary) => return Merged { summary, cause: None },
            Err(e) => FallbackCause::from(e),
        },
        Err(e) => FallbackCause::from(e),
    };

    warn!(source = %key, error = %cause, "data source failed; using fallback");

    let summary = normalizer.normalize(fallback).unwrap_or_else(|e| {
        error!(source = %key, error = %e, "fallback value does not normalise; using empty summary");
        ResourceSummary::default()
    });

    Merged {
        summary,
        cause: Some(cause),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::ListNormalizer;
    use crate::source::empty_list;
    use serde_json::json;

    #[test]
    fn success_is_normalised() {
        let merged = merge(
            SourceKey::Services,
            Ok(json!({ "total": 5, "recent": [{ "title": "X" }] })),
            &empty_list(),
            &ListNormalizer::default(),
        );
        assert!(!merged.fell_back());
        assert_eq!(merged.summary.total, 5);
        assert_eq!(merged.summary.recent, vec![json!({ "title": "X" })]);
    }

    #[test]
    fn fetch_failure_uses_normalised_fallback() {
        let merged = merge(
            SourceKey::Jobs,
            Err(FetchError::Status(503)),
            &json!([{ "id": "placeholder" }]),
            &ListNormalizer::default(),
        );
        assert_eq!(merged.cause, Some(FallbackCause::Fetch(FetchError::Status(503))));
        assert_eq!(merged.summary.total, 1);
    }

    #[test]
    fn unnormalisable_payload_uses_fallback() {
        let merged = merge(
            SourceKey::Users,
            Ok(json!("<html>maintenance</html>")),
            &empty_list(),
            &ListNormalizer::default(),
        );
        assert!(matches!(merged.cause, Some(FallbackCause::Normalize(_))));
        assert_eq!(merged.summary, ResourceSummary::default());
    }

    #[test]
    fn broken_fallback_degrades_to_empty_summary() {
        let merged = merge(
            SourceKey::Blogs,
            Err(FetchError::Network("refused".to_string())),
            &json!(null),
            &ListNormalizer::default(),
        );
        assert!(merged.fell_back());
        assert_eq!(merged.summary, ResourceSummary::default());
    }
}
