//! Well-known constants
//!
//! This module centralizes the magic numbers and names shared by the range
//! classifier, the frame trimmer and the fingerprint encoding.

/// Number of trailing minutes that are always fetched fresh, regardless of cache.
///
/// A range is only worth caching when it reaches further back than this window,
/// and every paginating request re-fetches at least this much.
pub const DEFAULT_REFRESH_WINDOW_MINUTES: i64 = 15;

/// Name of the time column produced by the time-series framers.
pub const TIME_FIELD_NAME: &str = "time";

/// Prefix that marks a raw range boundary as relative to the current instant.
pub const RELATIVE_NOW: &str = "now";
