//! Payload normalisation.
//!
//! The backend answers list endpoints in several shapes that have drifted
//! over time. All of them are accepted as equally valid:
//!
//! - a bare array: `[...]`
//! - a data envelope: `{ "data": [...], "total": 12, ... }`
//! - a summary envelope: `{ "total": 12, "recent": [...], ... }`
//!
//! Counters are coerced with [`coerce_count`], which never yields anything
//! but a finite non-negative integer.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Normalised shape of one data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceSummary {
    pub total: u64,
    pub recent: Vec<Value>,
    /// Every listed entry before the `recent` cut; derived tallies count these.
    #[serde(skip)]
    pub entries: Vec<Value>,
    /// Remaining envelope fields (e.g. `meta`, `counts`), kept for derived stats.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extras: Map<String, Value>,
}

impl ResourceSummary {
    /// Look up a nested field among the envelope extras.
    pub fn field(&self, path: &[&str]) -> Option<&Value> {
        let (head, rest) = path.split_first()?;
        lookup(self.extras.get(*head)?, rest)
    }

    /// First present, non-null field along `chains`, coerced to a count.
    pub fn first_count(&self, chains: &[&[&str]]) -> Option<u64> {
        chains
            .iter()
            .filter_map(|path| self.field(path))
            .find(|v| !v.is_null())
            .map(coerce_count)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("unsupported payload shape: expected array or object, got {0}")]
    UnsupportedShape(&'static str),

    #[error("object has no list or total field (keys: {0:?})")]
    UnrecognisedEnvelope(Vec<String>),
}

/// Converts a raw payload into a [`ResourceSummary`].
pub trait Normalizer: Send + Sync {
    fn normalize(&self, raw: &Value) -> Result<ResourceSummary, NormalizeError>;
}

impl<F> Normalizer for F
where
    F: Fn(&Value) -> Result<ResourceSummary, NormalizeError> + Send + Sync,
{
    fn normalize(&self, raw: &Value) -> Result<ResourceSummary, NormalizeError> {
        self(raw)
    }
}

/// Normaliser for list endpoints, keeping at most `recent_limit` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListNormalizer {
    pub recent_limit: usize,
}

impl ListNormalizer {
    pub fn new(recent_limit: usize) -> Self {
        Self { recent_limit }
    }
}

impl Default for ListNormalizer {
    fn default() -> Self {
        Self { recent_limit: 5 }
    }
}

const LIST_KEYS: [&str; 2] = ["data", "recent"];
const TOTAL_KEYS: [&str; 2] = ["total", "count"];

impl Normalizer for ListNormalizer {
    fn normalize(&self, raw: &Value) -> Result<ResourceSummary, NormalizeError> {
        let mut summary = match raw {
            Value::Array(items) => ResourceSummary {
                total: items.len() as u64,
                recent: items.clone(),
                entries: items.clone(),
                extras: Map::new(),
            },
            Value::Object(map) => match map.get("data") {
                // `{ data: { total, recent } }` wraps a summary envelope; the
                // outer object still counts when the inner one is unrecognised.
                Some(inner @ Value::Object(_)) => match self.normalize(inner) {
                    Ok(summary) => return Ok(summary),
                    Err(_) => normalize_envelope(map)?,
                },
                _ => normalize_envelope(map)?,
            },
            other => return Err(NormalizeError::UnsupportedShape(kind(other))),
        };

        summary.recent.truncate(self.recent_limit);
        Ok(summary)
    }
}

fn normalize_envelope(map: &Map<String, Value>) -> Result<ResourceSummary, NormalizeError> {
    let recognised = LIST_KEYS
        .iter()
        .chain(TOTAL_KEYS.iter())
        .any(|k| map.contains_key(*k));
    if !recognised {
        return Err(NormalizeError::UnrecognisedEnvelope(map.keys().cloned().collect()));
    }

    let recent = LIST_KEYS
        .iter()
        .find_map(|k| map.get(*k).and_then(Value::as_array))
        .cloned()
        .unwrap_or_default();

    let extras: Map<String, Value> = map
        .iter()
        .filter(|(k, _)| !LIST_KEYS.contains(&k.as_str()) && !TOTAL_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let total = TOTAL_KEYS
        .iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
        .map(coerce_count)
        .or_else(|| {
            ["meta", "pagination"]
                .iter()
                .filter_map(|k| extras.get(*k))
                .filter_map(|v| lookup(v, &["total"]))
                .find(|v| !v.is_null())
                .map(coerce_count)
        })
        .unwrap_or(recent.len() as u64);

    Ok(ResourceSummary {
        total,
        entries: recent.clone(),
        recent,
        extras,
    })
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Coerce a JSON value to a non-negative integer counter.
///
/// Numbers and numeric strings are truncated towards zero; negatives,
/// non-finite values and anything unparseable become `0`.
pub fn coerce_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u
            } else if n.is_i64() {
                0
            } else {
                n.as_f64().map(count_from_f64).unwrap_or(0)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(count_from_f64))
                .unwrap_or(0)
        }
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => 0,
    }
}

fn count_from_f64(f: f64) -> u64 {
    if !f.is_finite() || f <= 0.0 {
        0
    } else if f >= u64::MAX as f64 {
        u64::MAX
    } else {
        f.trunc() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array_counts_items() {
        let summary = ListNormalizer::new(2)
            .normalize(&json!([{ "id": 1 }, { "id": 2 }, { "id": 3 }]))
            .unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.recent, vec![json!({ "id": 1 }), json!({ "id": 2 })]);
    }

    #[test]
    fn data_envelope_prefers_declared_total() {
        let summary = ListNormalizer::default()
            .normalize(&json!({ "data": [{ "id": 1 }], "total": "42", "meta": { "page": 1 } }))
            .unwrap();
        assert_eq!(summary.total, 42);
        assert_eq!(summary.recent.len(), 1);
        assert_eq!(summary.field(&["meta", "page"]), Some(&json!(1)));
    }

    #[test]
    fn data_envelope_falls_back_to_meta_total() {
        let summary = ListNormalizer::default()
            .normalize(&json!({ "data": [], "meta": { "total": 17 } }))
            .unwrap();
        assert_eq!(summary.total, 17);
    }

    #[test]
    fn summary_envelope_defaults_missing_recent() {
        let summary = ListNormalizer::default()
            .normalize(&json!({ "total": 5 }))
            .unwrap();
        assert_eq!(summary.total, 5);
        assert!(summary.recent.is_empty());
    }

    #[test]
    fn nested_data_summary_is_unwrapped() {
        let summary = ListNormalizer::default()
            .normalize(&json!({ "data": { "total": 3, "recent": [{ "title": "X" }] } }))
            .unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.recent, vec![json!({ "title": "X" })]);
    }

    #[test]
    fn entries_keep_the_full_list_past_the_recent_cut() {
        let items: Vec<Value> = (0..20).map(|id| json!({ "id": id })).collect();
        let summary = ListNormalizer::new(5)
            .normalize(&json!({ "data": items.clone() }))
            .unwrap();
        assert_eq!(summary.total, 20);
        assert_eq!(summary.recent.len(), 5);
        assert_eq!(summary.entries, items);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("entries").is_none());
    }

    #[test]
    fn unrecognised_inner_data_falls_back_to_outer_envelope() {
        let summary = ListNormalizer::default()
            .normalize(&json!({ "data": { "page": 1 }, "total": 5 }))
            .unwrap();
        assert_eq!(summary.total, 5);
        assert!(summary.recent.is_empty());
    }

    #[test]
    fn non_list_payloads_are_rejected() {
        let n = ListNormalizer::default();
        assert_eq!(n.normalize(&json!(null)), Err(NormalizeError::UnsupportedShape("null")));
        assert_eq!(n.normalize(&json!("oops")), Err(NormalizeError::UnsupportedShape("string")));
        assert!(matches!(
            n.normalize(&json!({ "message": "Unauthenticated." })),
            Err(NormalizeError::UnrecognisedEnvelope(_))
        ));
    }

    #[test]
    fn closures_are_normalizers() {
        let n = |_: &Value| -> Result<ResourceSummary, NormalizeError> {
            Ok(ResourceSummary::default())
        };
        assert_eq!(n.normalize(&json!(1)).unwrap(), ResourceSummary::default());
    }

    #[test]
    fn coerce_count_handles_junk() {
        assert_eq!(coerce_count(&json!(7)), 7);
        assert_eq!(coerce_count(&json!(-3)), 0);
        assert_eq!(coerce_count(&json!(4.9)), 4);
        assert_eq!(coerce_count(&json!(" 12 ")), 12);
        assert_eq!(coerce_count(&json!("3.5")), 3);
        assert_eq!(coerce_count(&json!("NaN")), 0);
        assert_eq!(coerce_count(&json!("inf")), 0);
        assert_eq!(coerce_count(&json!("twelve")), 0);
        assert_eq!(coerce_count(&json!(true)), 0);
        assert_eq!(coerce_count(&json!(null)), 0);
        assert_eq!(coerce_count(&json!([1])), 0);
        assert_eq!(coerce_count(&json!(1e300)), u64::MAX);
    }

    #[test]
    fn first_count_walks_chains_in_order() {
        let summary = ListNormalizer::default()
            .normalize(&json!({
                "data": [],
                "meta": { "pending": null },
                "counts": { "pending": "9" }
            }))
            .unwrap();
        assert_eq!(
            summary.first_count(&[&["pending"], &["meta", "pending"], &["counts", "pending"]]),
            Some(9)
        );
        assert_eq!(summary.first_count(&[&["missing"]]), None);
    }
}
