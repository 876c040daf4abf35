//! Canonical cache identity for a set of queries
//!
//! Each query is encoded as a JSON array over a fixed list of identity fields, in a
//! fixed order, with `null` standing in for every absent optional. The per-query
//! encodings are sorted and combined into one JSON array, so neither the order of
//! the targets nor the order in which a query's properties were assigned affects
//! the result.
//!
//! Fields outside the tuple (`ref_id`, `label`) do not take part in identity: two
//! panels asking for the same data under different ref ids share cache entries.
//!
//! # Examples
//!
//! ```rust
//! use relcache::{Query, QueryType, QueriesFingerprint};
//!
//! let a = Query::new("A", QueryType::ListAssets);
//! let b = Query::new("B", QueryType::ListAssetModels);
//!
//! assert_eq!(
//!     QueriesFingerprint::of(&[a.clone(), b.clone()]),
//!     QueriesFingerprint::of(&[b, a]),
//! );
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::query::Query;

/// Canonical identity of a set of queries
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueriesFingerprint(String);

impl QueriesFingerprint {
    /// Derive the fingerprint of `queries`
    pub fn of(queries: &[Query]) -> Self {
        let mut identities: Vec<String> = queries.iter().map(query_identity).collect();
        identities.sort_unstable();

        let combined = Value::Array(identities.into_iter().map(Value::String).collect());
        Self(combined.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueriesFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode the identity fields of one query
///
/// The order of this tuple is part of the key format; append new fields at the end.
pub fn query_identity(query: &Query) -> String {
    let datasource = query.datasource.as_ref();

    let tuple = vec![
        text(Some(query.query_type.as_str())),
        text(query.region.as_deref()),
        text(query.response_format.map(|f| f.as_str())),
        text(query.asset_id.as_deref()),
        texts(query.asset_ids.as_deref()),
        text(query.property_id.as_deref()),
        text(query.property_alias.as_deref()),
        text(query.quality.map(|q| q.as_str())),
        text(query.resolution.map(|r| r.as_str())),
        flag(query.last_observation),
        flag(query.flatten_l4e),
        query.max_page_aggregations.map_or(Value::Null, Value::from),
        text(datasource.and_then(|d| d.kind.as_deref())),
        text(datasource.and_then(|d| d.uid.as_deref())),
        text(query.time_ordering.map(|o| o.as_str())),
        flag(query.load_all_children),
        text(query.hierarchy_id.as_deref()),
        text(query.model_id.as_deref()),
        text(query.filter.map(|f| f.as_str())),
    ];

    Value::Array(tuple).to_string()
}

fn text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |v| Value::String(v.to_owned()))
}

fn texts(values: Option<&[String]>) -> Value {
    values.map_or(Value::Null, |vs| {
        Value::Array(vs.iter().cloned().map(Value::String).collect())
    })
}

fn flag(value: Option<bool>) -> Value {
    value.map_or(Value::Null, Value::Bool)
}
