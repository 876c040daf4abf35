// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Response caching for dashboard queries over ranges relative to now.
//!
//! A panel showing `now-6h` re-requests six hours of data on every refresh even
//! though only the last few minutes changed. [`RelativeRangeCache`] keeps the last
//! response per query set and raw range start, and on the next refresh returns the
//! rows that are still valid together with a narrow paginating request for the rest.
//!
//! # Overview
//!
//! - [`fingerprint`]: order-independent identity of a set of queries
//! - [`range`]: cacheability, overlap and paginating-range arithmetic
//! - [`trim`]: cutting cached frames down to the still-valid window
//! - [`paginate`]: the follow-up request for the uncached tail
//! - [`merge`]: appending fresh rows onto cached frames
//! - [`cache`]: the cache itself and its entry stores
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeDelta, Utc};
//! use relcache::{Query, QueryRequest, QueryResponse, QueryType, RelativeRangeCache, TimeRange};
//!
//! let mut cache = RelativeRangeCache::new();
//! let targets = vec![Query::new("A", QueryType::ListAssets)];
//!
//! let first = QueryRequest::new("1", TimeRange::relative("now-6h", "now", Utc::now())?, targets.clone());
//! cache.set(&first, &QueryResponse::default());
//!
//! let later = Utc::now() + TimeDelta::minutes(1);
//! let second = QueryRequest::new("2", TimeRange::relative("now-6h", "now", later)?, targets);
//! let info = cache.get(&second).expect("cache hit");
//!
//! // Asset listings are not time-series: nothing left to fetch
//! assert!(!info.needs_fetch());
//! # Ok::<(), relcache::RelCacheError>(())
//! ```

pub mod cache;
pub mod config;
pub mod errors;
pub mod fingerprint;
pub mod merge;
pub mod paginate;
pub mod range;
pub mod trim;
pub mod types;

mod tracing;

pub use cache::{
    CacheInfo, CacheKey, CacheStats, CachedEntry, CachedQuery, CachedResponse, EntryStore,
    MemoryStore, NoOpStore, RelativeRangeCache, WriteOutcome,
};
pub use config::{CacheConfig, CacheConfigBuilder};
pub use errors::{CacheWriteError, ConfigError, RelCacheError, TimeRangeError, TrimError};
pub use fingerprint::QueriesFingerprint;
pub use trim::TrimWindow;
pub use types::frame::{DataFrame, Field, FieldConfig, FieldType, FieldValues};
pub use types::query::{
    AssetFilter, DataSourceRef, Quality, Query, QueryType, Resolution, ResponseFormat,
    TimeOrdering,
};
pub use types::request::{QueryRequest, QueryResponse};
pub use types::time_range::{RawTime, RawTimeRange, TimeRange};
