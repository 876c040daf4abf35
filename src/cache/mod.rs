// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Relative-range response cache and its storage backends
//!
//! [`RelativeRangeCache`] is the entry point: it stores responses for relative
//! ranges and, on later requests, hands back the still-valid part of the cached
//! frames together with the minimal request needed to bring them up to date.
//!
//! Entries live in an [`EntryStore`]:
//!
//! - [`MemoryStore`]: `HashMap`-backed, unbounded by default, optional LRU limit and TTL
//! - [`NoOpStore`]: stores nothing, every lookup misses
//!
//! # Examples
//!
//! ```rust
//! use relcache::{CacheConfigBuilder, RelativeRangeCache};
//! use std::time::Duration;
//!
//! // Unbounded, entries live as long as the cache
//! let cache = RelativeRangeCache::new();
//! assert!(cache.is_empty());
//!
//! // At most 100 entries, each valid for an hour
//! let config = CacheConfigBuilder::new()
//!     .max_entries(100)
//!     .ttl(Duration::from_secs(3600))
//!     .build();
//! let cache = RelativeRangeCache::with_config(config).unwrap();
//! assert_eq!(cache.store_name(), "MemoryStore");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CacheWriteError;
use crate::fingerprint::QueriesFingerprint;
use crate::merge::append_matching_frames;
use crate::types::frame::DataFrame;
use crate::types::query::Query;
use crate::types::request::{QueryRequest, QueryResponse};
use crate::types::time_range::TimeRange;

mod memory;
mod noop;
mod relative;
pub mod types;

pub use memory::MemoryStore;
pub use noop::NoOpStore;
pub use relative::RelativeRangeCache;

/// Key of a cache entry: query identity plus the raw start of the range
///
/// `now-1h` and `now-6h` over the same queries are separate entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub(crate) fingerprint: QueriesFingerprint,
    pub(crate) raw_from: String,
}

impl CacheKey {
    pub fn new(fingerprint: QueriesFingerprint, raw_from: impl Into<String>) -> Self {
        Self {
            fingerprint,
            raw_from: raw_from.into(),
        }
    }

    /// Key under which responses to `request` are stored
    pub fn for_request(request: &QueryRequest) -> Self {
        Self::new(
            QueriesFingerprint::of(&request.targets),
            request.range.raw.from.descriptor(),
        )
    }

    pub fn fingerprint(&self) -> &QueriesFingerprint {
        &self.fingerprint
    }

    pub fn raw_from(&self) -> &str {
        &self.raw_from
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pair = Value::Array(vec![
            Value::String(self.raw_from.clone()),
            Value::String(self.fingerprint.as_str().to_owned()),
        ]);
        write!(f, "{pair}")
    }
}

/// A response frame paired with the query that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedQuery {
    pub query: Query,
    pub frame: DataFrame,
}

/// Everything stored for one key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedEntry {
    pub queries: Vec<CachedQuery>,
    /// Resolved range of the request that produced the frames
    pub range: TimeRange,
}

/// Frames served from the cache around the paginated rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    /// Served before the fresh rows: ascending series and non-time-series results
    pub start: QueryResponse,
    /// Served after the fresh rows: descending series
    pub end: QueryResponse,
}

/// Result of a cache hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    pub cached_response: CachedResponse,
    /// Request for the rows the cache cannot provide
    pub paginating_request: QueryRequest,
}

impl CacheInfo {
    /// Whether any target still has to be fetched
    ///
    /// False when none of the cached queries is time-series; the cached start
    /// frames are then the complete response.
    pub fn needs_fetch(&self) -> bool {
        !self.paginating_request.targets.is_empty()
    }

    /// Combine cached frames with the response to [`CacheInfo::paginating_request`]
    ///
    /// Fresh rows are appended to the matching start frames, then the end frames are
    /// appended after them.
    pub fn assemble(self, fresh: QueryResponse) -> QueryResponse {
        let CachedResponse { start, end } = self.cached_response;
        let data = append_matching_frames(append_matching_frames(start.data, fresh.data), end.data);
        QueryResponse::new(data)
    }
}

/// Result of [`RelativeRangeCache::set`]
///
/// Writes never fail from the caller's point of view: a response that cannot be
/// cached is simply not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The response was stored
    Stored {
        /// Whether an entry for the same key was replaced
        replaced: bool,
    },
    /// The request range does not qualify for caching
    NotCacheable,
    /// The batch was rejected as a whole; any previous entry is left untouched
    Discarded(CacheWriteError),
}

impl WriteOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, WriteOutcome::Stored { .. })
    }
}

/// Statistics about cache performance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups that found a live entry
    pub hits: u64,
    /// Lookups that found nothing, including expired entries
    pub misses: u64,
    /// Entries removed to stay within `max_entries`
    pub evictions: u64,
    /// Entries removed because their TTL elapsed
    pub expirations: u64,
    /// Current number of entries
    pub entries: usize,
    /// Response batches rejected by `set`
    pub discarded_writes: u64,
    /// Hits whose cached range no longer covered the request start
    pub stale_lookups: u64,
}

impl CacheStats {
    /// Hit rate as a percentage (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={}, misses={}, evictions={}, expirations={}, entries={}, discarded_writes={}, stale_lookups={}, hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.evictions,
            self.expirations,
            self.entries,
            self.discarded_writes,
            self.stale_lookups,
            self.hit_rate()
        )
    }
}

/// Storage backend for cache entries
///
/// Backends are synchronous and owned by one cache; the cache is `Send` as long
/// as its backend is.
pub trait EntryStore: Send + fmt::Debug {
    /// Live entry for `key`, if any
    ///
    /// Backends with a TTL drop expired entries here and report a miss.
    fn get(&mut self, key: &CacheKey) -> Option<&CachedEntry>;

    /// Store `entry`, returning the entry it replaced
    fn insert(&mut self, key: CacheKey, entry: CachedEntry) -> Option<CachedEntry>;

    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn stats(&self) -> CacheStats;

    /// Backend name for logs
    fn name(&self) -> &'static str;
}
