//! Building the follow-up request for a cache hit
//!
//! On a hit only the trailing range is fetched fresh, and only for queries whose
//! data is time-indexed: list/describe results are served whole from the cache.

use crate::types::request::QueryRequest;
use crate::types::time_range::TimeRange;

/// Copy of `request` over `range`, keeping only time-series targets
///
/// Every other request attribute is carried over unchanged. The target list may end
/// up empty when no query is time-series; callers can skip the fetch in that case.
pub fn paginating_request(request: &QueryRequest, range: TimeRange) -> QueryRequest {
    let targets = request
        .targets
        .iter()
        .filter(|target| target.query_type.is_time_series())
        .cloned()
        .collect();

    QueryRequest {
        range,
        targets,
        ..request.clone()
    }
}
