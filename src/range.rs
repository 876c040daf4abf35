//! Range arithmetic for relative-range caching
//!
//! Three decisions are made here, all on resolved [`TimeRange`]s:
//!
//! - whether a request range is worth caching at all ([`is_cacheable`])
//! - whether a cached range still covers the start of a new request ([`covers_start`])
//! - which trailing range must be fetched fresh to bring cached data up to date
//!   ([`paginating_range`])
//!
//! ```text
//!  cache:    |from ............................. to|
//!  request:        |from ........................................ to|
//!                                 |<- refresh ->|
//!  paginating:                    |from (min of cache.to, request.to - refresh) to|
//! ```

use chrono::{DateTime, TimeDelta, Utc};

use crate::types::time_range::TimeRange;

/// Whether `range` may be served from or stored in the cache
///
/// A range qualifies when its raw start is relative to now (e.g. `now-6h`) and it
/// reaches back strictly further than `refresh_window` before its end. Absolute
/// ranges never qualify, whatever their span.
pub fn is_cacheable(range: &TimeRange, refresh_window: TimeDelta) -> bool {
    if !range.raw.from.is_relative_to_now() {
        return false;
    }

    range
        .to
        .checked_sub_signed(refresh_window)
        .is_some_and(|limit| range.from < limit)
}

/// Whether `cache_range` still covers the start of `request_range`
///
/// True when both start at the same instant, or when the request starts strictly
/// inside the cached window. A request starting exactly at the cached end is not
/// covered.
///
/// ```text
/// covered (same from):     cache:   |from.....
///                          request: |from.....
///
/// covered (inside):        cache:   |from......to|
///                          request: .....|from........
///
/// not covered:             cache:   |from..to|
///                          request: ..........|from...
/// ```
pub fn covers_start(cache_range: &TimeRange, request_range: &TimeRange) -> bool {
    if request_range.from == cache_range.from {
        return true;
    }

    cache_range.from < request_range.from && request_range.from < cache_range.to
}

/// Range still needed to bring cached data up to `request_range.to`
///
/// Starts at the earlier of the cached end and `request_range.to - refresh_window`,
/// so at least the refresh window is always fetched fresh. The raw boundaries of the
/// request are preserved.
pub fn paginating_range(
    request_range: &TimeRange,
    cache_range: &TimeRange,
    refresh_window: TimeDelta,
) -> TimeRange {
    let refresh_from = request_range
        .to
        .checked_sub_signed(refresh_window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    TimeRange {
        from: cache_range.to.min(refresh_from),
        to: request_range.to,
        raw: request_range.raw.clone(),
    }
}
