//! Requests and responses exchanged with the fetch layer

use serde::{Deserialize, Serialize};

use super::frame::DataFrame;
use super::query::Query;
use super::time_range::TimeRange;

/// A batch of queries evaluated over one time range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub request_id: String,
    pub range: TimeRange,
    pub targets: Vec<Query>,
    #[serde(default)]
    pub interval_ms: Option<u64>,
    #[serde(default)]
    pub max_data_points: Option<u64>,
}

impl QueryRequest {
    pub fn new(request_id: impl Into<String>, range: TimeRange, targets: Vec<Query>) -> Self {
        Self {
            request_id: request_id.into(),
            range,
            targets,
            interval_ms: None,
            max_data_points: None,
        }
    }
}

/// Frames returned for a [`QueryRequest`], each tagged with its query's ref id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub data: Vec<DataFrame>,
}

impl QueryResponse {
    pub fn new(data: Vec<DataFrame>) -> Self {
        Self { data }
    }
}
