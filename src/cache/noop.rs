//! Entry store that disables caching entirely

use super::{CacheKey, CacheStats, CachedEntry, EntryStore};

/// Stores nothing; every lookup misses
///
/// With this backend [`RelativeRangeCache::get`](crate::RelativeRangeCache::get)
/// always returns `None`, so every request is fetched in full.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStore;

impl EntryStore for NoOpStore {
    fn get(&mut self, _key: &CacheKey) -> Option<&CachedEntry> {
        None
    }

    fn insert(&mut self, _key: CacheKey, _entry: CachedEntry) -> Option<CachedEntry> {
        None
    }

    fn clear(&mut self) {}

    fn len(&self) -> usize {
        0
    }

    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }

    fn name(&self) -> &'static str {
        "NoOpStore"
    }
}
