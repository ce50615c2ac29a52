//! Derived dashboard statistics.
//!
//! Pure functions over normalised summaries. A missing source counts as zero.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::normalize::ResourceSummary;
use crate::source::SourceKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_jobs: u64,
    pub open_jobs: u64,
    pub total_scholarships: u64,
    pub total_blogs: u64,
    pub published_blogs: u64,
    pub total_services: u64,
    pub total_applications: u64,
    pub pending_applications: u64,
    pub unread_messages: u64,
    pub total_users: u64,
}

impl DashboardStats {
    pub fn compute(sources: &BTreeMap<SourceKey, ResourceSummary>) -> Self {
        let total = |key: SourceKey| sources.get(&key).map_or(0, |s| s.total);
        let derived = |key: SourceKey, field: &str, matches: fn(&Value) -> bool| {
            sources.get(&key).map_or(0, |s| derived_count(s, field, matches))
        };

        Self {
            total_jobs: total(SourceKey::Jobs),
            open_jobs: derived(SourceKey::Jobs, "open", is_open_job),
            total_scholarships: total(SourceKey::Scholarships),
            total_blogs: total(SourceKey::Blogs),
            published_blogs: derived(SourceKey::Blogs, "published", is_published),
            total_services: total(SourceKey::Services),
            total_applications: total(SourceKey::Applications),
            pending_applications: derived(SourceKey::Applications, "pending", is_pending),
            unread_messages: derived(SourceKey::Messages, "unread", is_unread),
            total_users: total(SourceKey::Users),
        }
    }
}

/// `field` if present, else `meta.field`, else `counts.field`, else a count
/// over every listed entry that satisfies `matches`.
fn derived_count(summary: &ResourceSummary, field: &str, matches: fn(&Value) -> bool) -> u64 {
    summary
        .first_count(&[&[field], &["meta", field], &["counts", field]])
        .unwrap_or_else(|| summary.entries.iter().filter(|v| matches(v)).count() as u64)
}

fn status_is(entry: &Value, expected: &[&str]) -> bool {
    entry
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|s| expected.iter().any(|e| s.eq_ignore_ascii_case(e)))
}

fn flag_is(entry: &Value, field: &str, expected: bool) -> bool {
    match entry.get(field) {
        Some(Value::Bool(b)) => *b == expected,
        Some(Value::Number(n)) => n.as_u64() == Some(u64::from(expected)),
        _ => false,
    }
}

fn is_open_job(entry: &Value) -> bool {
    status_is(entry, &["open", "active", "published"]) || flag_is(entry, "is_active", true)
}

fn is_published(entry: &Value) -> bool {
    status_is(entry, &["published"]) || flag_is(entry, "published", true)
}

fn is_pending(entry: &Value) -> bool {
    status_is(entry, &["pending", "submitted", "new"])
}

fn is_unread(entry: &Value) -> bool {
    status_is(entry, &["unread", "new"])
        || flag_is(entry, "is_read", false)
        || flag_is(entry, "read", false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{ListNormalizer, Normalizer};
    use serde_json::json;

    fn summaries(entries: &[(SourceKey, Value)]) -> BTreeMap<SourceKey, ResourceSummary> {
        entries
            .iter()
            .map(|(k, v)| (*k, ListNormalizer::new(50).normalize(v).unwrap()))
            .collect()
    }

    #[test]
    fn totals_come_from_normalised_total() {
        let stats = DashboardStats::compute(&summaries(&[
            (SourceKey::Jobs, json!({ "total": 0, "recent": [] })),
            (SourceKey::Services, json!({ "total": 5, "recent": [{ "title": "X" }] })),
        ]));
        assert_eq!(stats.total_jobs, 0);
        assert_eq!(stats.total_services, 5);
        assert_eq!(stats.total_users, 0);
    }

    #[test]
    fn derived_counts_prefer_top_level_field() {
        let stats = DashboardStats::compute(&summaries(&[(
            SourceKey::Applications,
            json!({ "data": [{ "status": "pending" }], "pending": "12", "meta": { "pending": 3 } }),
        )]));
        assert_eq!(stats.pending_applications, 12);
    }

    #[test]
    fn derived_counts_fall_back_to_nested_fields() {
        let stats = DashboardStats::compute(&summaries(&[
            (SourceKey::Applications, json!({ "data": [], "meta": { "pending": 3 } })),
            (SourceKey::Messages, json!({ "data": [], "counts": { "unread": 4 } })),
        ]));
        assert_eq!(stats.pending_applications, 3);
        assert_eq!(stats.unread_messages, 4);
    }

    #[test]
    fn derived_counts_fall_back_to_recent_entries() {
        let stats = DashboardStats::compute(&summaries(&[
            (
                SourceKey::Jobs,
                json!([{ "status": "open" }, { "status": "closed" }, { "is_active": true }]),
            ),
            (
                SourceKey::Blogs,
                json!([{ "published": true }, { "published": false }, { "status": "Published" }]),
            ),
            (
                SourceKey::Messages,
                json!([{ "is_read": 0 }, { "is_read": 1 }, { "read": false }, { "status": "new" }]),
            ),
        ]));
        assert_eq!(stats.open_jobs, 2);
        assert_eq!(stats.published_blogs, 2);
        assert_eq!(stats.unread_messages, 3);
    }

    #[test]
    fn derived_counts_cover_entries_past_the_recent_limit() {
        let unread: Vec<Value> = (0..20).map(|_| json!({ "is_read": 0 })).collect();
        let sources = BTreeMap::from([(
            SourceKey::Messages,
            ListNormalizer::new(5).normalize(&Value::Array(unread)).unwrap(),
        )]);

        let stats = DashboardStats::compute(&sources);
        assert_eq!(sources[&SourceKey::Messages].recent.len(), 5);
        assert_eq!(stats.unread_messages, 20);
    }

    #[test]
    fn numeric_flags_only_match_zero_or_one() {
        let stats = DashboardStats::compute(&summaries(&[
            (
                SourceKey::Messages,
                json!([{ "is_read": 2 }, { "is_read": -1 }, { "is_read": 0.0 }, { "is_read": 0 }]),
            ),
            (SourceKey::Jobs, json!([{ "is_active": 2 }, { "is_active": 1 }])),
        ]));
        assert_eq!(stats.unread_messages, 1);
        assert_eq!(stats.open_jobs, 1);
    }

    #[test]
    fn junk_derived_field_is_zero() {
        let stats = DashboardStats::compute(&summaries(&[(
            SourceKey::Messages,
            json!({ "data": [{ "status": "unread" }], "unread": "lots" }),
        )]));
        assert_eq!(stats.unread_messages, 0);
    }

    #[test]
    fn serializes_in_camel_case() {
        let json = serde_json::to_value(DashboardStats::default()).unwrap();
        assert_eq!(json["totalJobs"], json!(0));
        assert_eq!(json["pendingApplications"], json!(0));
    }
}
