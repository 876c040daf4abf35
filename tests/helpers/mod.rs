// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for relcache integration tests
//!
//! Provides a deterministic in-process data source so cached responses can be
//! compared against full, uncached fetches.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use relcache::{
    DataFrame, Field, Query, QueryRequest, QueryResponse, QueryType, TimeOrdering, TimeRange,
};

/// One sample per minute
pub const STEP_MS: i64 = 60_000;

/// Mock backend answering query requests from a synthetic signal
///
/// Every time-series query yields one sample per minute with value
/// `minutes since epoch`. Samples are returned for the half-open window
/// `(from, to]`, so a cached prefix and a fresh suffix split at the same instant
/// never overlap.
///
/// # Example
///
/// ```rust,ignore
/// let source = MockDataSource::new();
/// let full = source.fetch(&request);
/// let info = cache.get(&request).unwrap();
/// let fresh = source.fetch(&info.paginating_request);
/// assert_eq!(by_ref_id(&info.assemble(fresh)), by_ref_id(&full));
/// ```
#[derive(Debug, Default)]
pub struct MockDataSource;

impl MockDataSource {
    pub fn new() -> Self {
        Self
    }

    /// Answer every target of `request`
    pub fn fetch(&self, request: &QueryRequest) -> QueryResponse {
        let data = request
            .targets
            .iter()
            .map(|query| frame_for(query, &request.range))
            .collect();
        QueryResponse::new(data)
    }
}

fn frame_for(query: &Query, range: &TimeRange) -> DataFrame {
    let frame = DataFrame::new(format!("{} {}", query.query_type, query.ref_id))
        .with_ref_id(query.ref_id.clone());

    if !query.query_type.is_time_series() {
        return frame.with_field(Field::string("name", ["Demo Turbine Asset 1", "Demo Wind Farm"]));
    }

    let to = range.end_millis();
    let mut times: Vec<i64> = if query.query_type.is_latest_value() {
        vec![to - to.rem_euclid(STEP_MS)]
    } else {
        let first = range.start_millis().div_euclid(STEP_MS) + 1;
        let last = to.div_euclid(STEP_MS);
        (first..=last).map(|minute| minute * STEP_MS).collect()
    };

    if query.is_descending() {
        times.reverse();
    }

    let values: Vec<f64> = times.iter().map(|t| (t / STEP_MS) as f64).collect();
    frame
        .with_field(Field::time(times))
        .with_field(Field::number("RotationsPerSecond", values).with_unit("RPS"))
}

/// 2024-05-28 at `hour:minute` UTC
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 28, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

/// Request over `from_expression`..`now` resolved at `now`
pub fn relative_request(
    request_id: &str,
    from_expression: &str,
    now: DateTime<Utc>,
    targets: Vec<Query>,
) -> QueryRequest {
    let range = TimeRange::relative(from_expression, "now", now)
        .unwrap_or_else(|e| panic!("invalid test expression {from_expression}: {e}"));
    QueryRequest::new(request_id, range, targets)
}

/// Raw property history, ascending
pub fn history_query(ref_id: &str) -> Query {
    Query {
        property_id: Some("mock-property-id".into()),
        asset_id: Some("mock-asset-id".into()),
        ..Query::new(ref_id, QueryType::PropertyValueHistory)
    }
}

#[allow(dead_code)]
pub fn descending(query: Query) -> Query {
    Query {
        time_ordering: Some(TimeOrdering::Descending),
        ..query
    }
}

/// Frames of a response keyed by ref id
///
/// Reassembled responses may list frames in a different order than a full fetch.
#[allow(dead_code)]
pub fn by_ref_id(response: &QueryResponse) -> BTreeMap<String, DataFrame> {
    response
        .data
        .iter()
        .map(|frame| (frame.ref_id.clone().unwrap_or_default(), frame.clone()))
        .collect()
}

/// Install a test subscriber honoring `RUST_LOG`; safe to call repeatedly
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
