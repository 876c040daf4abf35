//! Span creation helpers for cache operations.
//!
//! Telemetry is kept apart from cache logic: instead of `#[instrument]` attributes,
//! each instrumented operation has a helper here that the operation enters.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub fn my_operation(&mut self, request: &QueryRequest) -> Option<T> {
//!     let span = spans::my_operation(&request.request_id);
//!     let _guard = span.enter();
//!     // Cache logic here
//! }
//! ```

use tracing::Span;

/// Create span for storing a response.
///
/// Parent: caller's request span, if any
/// Children: none
#[inline]
pub(crate) fn set_response(request_id: &str, targets: usize, frames: usize) -> Span {
    tracing::info_span!(
        "relcache.set",
        request_id = %request_id,
        targets = targets,
        frames = frames,
    )
}

/// Create span for looking up a cached response.
///
/// Parent: caller's request span, if any
/// Children: trim_frames span on a hit
#[inline]
pub(crate) fn get_cached(request_id: &str, targets: usize) -> Span {
    tracing::info_span!(
        "relcache.get",
        request_id = %request_id,
        targets = targets,
    )
}

/// Create span for trimming cached frames to the still-valid window.
///
/// Parent: get_cached span
#[inline]
pub(crate) fn trim_frames(frames: usize, from_ms: i64, to_ms: i64) -> Span {
    tracing::debug_span!(
        "relcache.trim_frames",
        frames = frames,
        from_ms = from_ms,
        to_ms = to_ms,
    )
}
