// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Trimming cached frames to the part of a window that is still valid
//!
//! Cached frames are cut to a window `(from, to]` of epoch milliseconds: the lower
//! bound is exclusive, the upper bound inclusive. Every field of a frame is sliced
//! with the same row range so rows stay aligned.
//!
//! How a cached frame is treated depends on its query:
//!
//! | Query                          | start set   | end set                  |
//! |--------------------------------|-------------|--------------------------|
//! | latest value (`PropertyValue`) | no fields   | no fields, if descending |
//! | descending time series         | no fields   | trimmed, newest first    |
//! | ascending time series          | trimmed     | excluded                 |
//! | anything else                  | unchanged   | excluded                 |
//!
//! Descending frames go to the end set because fresh (newer) rows have to be placed
//! *before* them when the response is reassembled.

use std::ops::Range;

use chrono::{DateTime, Utc};

use crate::cache::CachedQuery;
use crate::errors::TrimError;
use crate::types::frame::DataFrame;

/// Window `(from, to]` in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimWindow {
    /// Exclusive lower bound
    pub from: i64,
    /// Inclusive upper bound
    pub to: i64,
}

impl TrimWindow {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self::new(from.timestamp_millis(), to.timestamp_millis())
    }
}

/// Trim an ascending frame to `window`
///
/// With `keep_last_observation`, the sample immediately before the window is kept as
/// well, unless no sample falls after `window.from` at all.
pub fn trim_frame(
    frame: &DataFrame,
    window: TrimWindow,
    keep_last_observation: bool,
) -> Result<DataFrame, TrimError> {
    if frame.fields.is_empty() {
        return Ok(frame.clone());
    }

    let times = time_values(frame)?;
    let rows = window_rows(times, window, keep_last_observation);

    Ok(frame.slice_rows(rows))
}

/// Trim a descending (newest-first) frame to `window`
///
/// The time column is searched as if it were ascending and the resulting row range is
/// mapped back, so the returned rows keep their newest-first order.
pub fn trim_frame_descending(
    frame: &DataFrame,
    window: TrimWindow,
    keep_last_observation: bool,
) -> Result<DataFrame, TrimError> {
    if frame.fields.is_empty() {
        return Ok(frame.clone());
    }

    let times = time_values(frame)?;
    let ascending: Vec<i64> = times.iter().rev().copied().collect();
    let reversed = window_rows(&ascending, window, keep_last_observation);

    let len = times.len();
    Ok(frame.slice_rows(len - reversed.end..len - reversed.start))
}

/// Frames served before the paginated rows
pub fn trim_start_frames(
    cached: &[CachedQuery],
    window: TrimWindow,
) -> Result<Vec<DataFrame>, TrimError> {
    cached
        .iter()
        .map(|CachedQuery { query, frame }| {
            let kind = query.query_type;

            if kind.is_latest_value() {
                // Always re-fetched
                return Ok(frame.without_fields());
            }
            if !kind.is_time_series() {
                return Ok(frame.clone());
            }
            if query.is_descending() {
                // Served from the end set
                return Ok(frame.without_fields());
            }

            trim_frame(frame, window, query.keeps_last_observation())
        })
        .collect()
}

/// Frames served after the paginated rows: descending time series only
pub fn trim_end_frames(
    cached: &[CachedQuery],
    window: TrimWindow,
) -> Result<Vec<DataFrame>, TrimError> {
    cached
        .iter()
        .filter(|cached| cached.query.query_type.is_time_series() && cached.query.is_descending())
        .map(|CachedQuery { query, frame }| {
            if query.query_type.is_latest_value() {
                return Ok(frame.without_fields());
            }
            trim_frame_descending(frame, window, query.keeps_last_observation())
        })
        .collect()
}

fn time_values(frame: &DataFrame) -> Result<&[i64], TrimError> {
    frame
        .time_values()
        .ok_or_else(|| {
            TrimError::missing_time_field(frame.name.as_deref(), frame.ref_id.as_deref())
        })
}

/// Rows of ascending `times` that fall in `window`
fn window_rows(times: &[i64], window: TrimWindow, keep_last_observation: bool) -> Range<usize> {
    let len = times.len();

    let from_index = match times.iter().position(|&t| t > window.from) {
        // Nothing after the lower bound
        None => len,
        Some(index) if keep_last_observation => index.saturating_sub(1),
        Some(index) => index,
    };

    let to_index = times
        .iter()
        .position(|&t| t > window.to)
        .unwrap_or(len)
        .max(from_index);

    from_index..to_index
}
