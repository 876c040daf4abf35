// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cache for requests over ranges relative to now
//!
//! A dashboard refreshing `now-6h` every minute asks for six hours of data each
//! time, of which only the last minute is new. This cache stores the previous
//! response and, on the next request, returns the cached rows that are still valid
//! plus a request for the trailing range that has to be fetched fresh.
//!
//! ```text
//!  stored:     |from .......................... to|
//!  request:       |from ................................... to|
//!  served:        (from ............ p.from]
//!  fetched:                          |p.from ............... to|
//! ```
//!
//! The last refresh window (15 minutes by default) is always fetched fresh, so
//! late-arriving samples are picked up.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::{
    CacheInfo, CacheKey, CacheStats, CachedEntry, CachedQuery, CachedResponse, EntryStore,
    MemoryStore, WriteOutcome,
};
use crate::config::CacheConfig;
use crate::errors::{CacheWriteError, ConfigError};
use crate::paginate::paginating_request;
use crate::range::{covers_start, is_cacheable, paginating_range};
use crate::tracing::spans;
use crate::trim::{trim_end_frames, trim_start_frames, TrimWindow};
use crate::types::query::Query;
use crate::types::request::{QueryRequest, QueryResponse};

/// Response cache for relative time ranges
///
/// Not internally synchronized: `set` and `get` take `&mut self`. Wrap the cache in
/// a mutex to share it between threads.
///
/// # Examples
///
/// ```rust
/// use chrono::{TimeDelta, Utc};
/// use relcache::{
///     DataFrame, Field, Query, QueryRequest, QueryResponse, QueryType, RelativeRangeCache,
///     TimeRange, WriteOutcome,
/// };
///
/// let mut cache = RelativeRangeCache::new();
/// let targets = vec![Query::new("A", QueryType::PropertyValueHistory)];
///
/// let then = Utc::now();
/// let request = QueryRequest::new("1", TimeRange::relative("now-1h", "now", then)?, targets.clone());
/// let t = then.timestamp_millis();
/// let response = QueryResponse::new(vec![DataFrame::new("rpm")
///     .with_ref_id("A")
///     .with_field(Field::time(vec![t - 1_800_000, t - 60_000]))
///     .with_field(Field::number("value", [1.0, 2.0]))]);
///
/// assert_eq!(cache.set(&request, &response), WriteOutcome::Stored { replaced: false });
///
/// // One minute later, the same panel refreshes
/// let now = then + TimeDelta::minutes(1);
/// let request = QueryRequest::new("2", TimeRange::relative("now-1h", "now", now)?, targets);
/// let info = cache.get(&request).expect("cached");
///
/// // Only the last 15 minutes are requested again
/// assert_eq!(info.paginating_request.range.from, now - TimeDelta::minutes(15));
/// assert_eq!(info.cached_response.start.data[0].len(), 1);
/// # Ok::<(), relcache::RelCacheError>(())
/// ```
#[derive(Debug)]
pub struct RelativeRangeCache {
    config: CacheConfig,
    store: Box<dyn EntryStore>,
    discarded_writes: u64,
    stale_lookups: u64,
}

impl Default for RelativeRangeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RelativeRangeCache {
    /// Creates an unbounded cache with the default refresh window
    pub fn new() -> Self {
        Self::from_parts(CacheConfig::unbounded(), Box::new(MemoryStore::new()))
    }

    /// Creates a cache backed by a [`MemoryStore`] with the limits of `config`
    pub fn with_config(config: CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = MemoryStore::from_config(&config);
        Ok(Self::from_parts(config, Box::new(store)))
    }

    /// Creates a cache over an explicit backend
    ///
    /// The eviction fields of `config` are not applied; the backend decides what it
    /// keeps.
    pub fn with_store(
        config: CacheConfig,
        store: Box<dyn EntryStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, store))
    }

    fn from_parts(config: CacheConfig, store: Box<dyn EntryStore>) -> Self {
        Self {
            config,
            store,
            discarded_writes: 0,
            stale_lookups: 0,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Store `response` as the result of `request`
    ///
    /// Every frame of the response must carry the ref id of one of the request's
    /// targets; otherwise the whole batch is discarded and any entry stored earlier
    /// for the same key stays in place.
    pub fn set(&mut self, request: &QueryRequest, response: &QueryResponse) -> WriteOutcome {
        let span = spans::set_response(
            &request.request_id,
            request.targets.len(),
            response.data.len(),
        );
        let _guard = span.enter();

        if !is_cacheable(&request.range, self.config.refresh_window) {
            debug!(raw_from = %request.range.raw.from, "Range is not cacheable, skipping write");
            return WriteOutcome::NotCacheable;
        }

        let queries = match pair_frames(request, response) {
            Ok(queries) => queries,
            Err(error) => {
                warn!(
                    request_id = %request.request_id,
                    error = %error,
                    "Discarding response batch"
                );
                self.discarded_writes += 1;
                return WriteOutcome::Discarded(error);
            }
        };

        let key = CacheKey::for_request(request);
        let entry = CachedEntry {
            queries,
            range: request.range.clone(),
        };
        let replaced = self.store.insert(key, entry).is_some();
        debug!(store = self.store.name(), replaced, "Stored response");

        WriteOutcome::Stored { replaced }
    }

    /// Cached part of the response to `request`, if any
    ///
    /// Returns `None` when the range is not cacheable, nothing is stored for the
    /// request, the stored range no longer covers the request start, or a stored
    /// frame cannot be trimmed. The caller then performs a full fetch.
    pub fn get(&mut self, request: &QueryRequest) -> Option<CacheInfo> {
        let span = spans::get_cached(&request.request_id, request.targets.len());
        let _guard = span.enter();

        if !is_cacheable(&request.range, self.config.refresh_window) {
            debug!(raw_from = %request.range.raw.from, "Range is not cacheable, skipping lookup");
            return None;
        }

        let key = CacheKey::for_request(request);
        let entry = self.store.get(&key)?;

        if !covers_start(&entry.range, &request.range) {
            debug!(
                cached_to = %entry.range.to,
                request_from = %request.range.from,
                "Cached range no longer covers the request"
            );
            self.stale_lookups += 1;
            return None;
        }

        let paginating = paginating_range(&request.range, &entry.range, self.config.refresh_window);
        let window = TrimWindow::between(request.range.from, paginating.from);

        let trimmed = {
            let span = spans::trim_frames(entry.queries.len(), window.from, window.to);
            let _guard = span.enter();

            trim_start_frames(&entry.queries, window)
                .and_then(|start| Ok((start, trim_end_frames(&entry.queries, window)?)))
        };

        let (start, end) = match trimmed {
            Ok(frames) => frames,
            Err(error) => {
                warn!(key = %key, error = %error, "Cached frames are unusable, treating as a miss");
                return None;
            }
        };

        debug!(
            start_frames = start.len(),
            end_frames = end.len(),
            paginating_from = %paginating.from,
            "Serving cached frames"
        );

        Some(CacheInfo {
            cached_response: CachedResponse {
                start: QueryResponse::new(start),
                end: QueryResponse::new(end),
            },
            paginating_request: paginating_request(request, paginating),
        })
    }

    /// Backend statistics plus write and staleness counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            discarded_writes: self.discarded_writes,
            stale_lookups: self.stale_lookups,
            ..self.store.stats()
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Drop every stored entry
    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }
}

/// Pair every response frame with the target of the same ref id
fn pair_frames(
    request: &QueryRequest,
    response: &QueryResponse,
) -> Result<Vec<CachedQuery>, CacheWriteError> {
    let targets: HashMap<&str, &Query> = request
        .targets
        .iter()
        .map(|query| (query.ref_id.as_str(), query))
        .collect();

    response
        .data
        .iter()
        .map(|frame| {
            let ref_id = frame
                .ref_id
                .as_deref()
                .ok_or_else(|| CacheWriteError::missing_ref_id(frame.name.as_deref()))?;
            let query = targets
                .get(ref_id)
                .ok_or_else(|| CacheWriteError::unmatched_frame(ref_id))?;

            Ok(CachedQuery {
                query: (*query).clone(),
                frame: frame.clone(),
            })
        })
        .collect()
}
