// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory entry store with optional TTL and size limits

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use super::{
    types::{AccessSequence, TimestampMillis},
    CacheKey, CacheStats, CachedEntry, EntryStore,
};
use crate::config::CacheConfig;

/// Stored entry with access metadata
#[derive(Debug, Clone)]
struct Slot {
    entry: CachedEntry,
    created_at: TimestampMillis,
    /// When this entry was last read (for LRU eviction)
    last_accessed: TimestampMillis,
    /// Tie-breaker for entries touched within the same millisecond
    access_seq: AccessSequence,
}

impl Slot {
    fn new(entry: CachedEntry, access_seq: AccessSequence) -> Self {
        let now = TimestampMillis::now();
        Self {
            entry,
            created_at: now,
            last_accessed: now,
            access_seq,
        }
    }

    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| self.created_at.is_older_than(ttl))
    }

    fn touch(&mut self, access_seq: AccessSequence) {
        self.last_accessed = TimestampMillis::now();
        self.access_seq = access_seq;
    }
}

/// `HashMap`-backed entry store
///
/// Unbounded by default: every entry lives as long as the store. Optionally:
/// - `max_entries` evicts the least recently used entry before an insert would
///   exceed the limit
/// - `ttl` expires entries older than the TTL when they are next looked up
///
/// # Examples
///
/// ```rust
/// use relcache::MemoryStore;
/// use std::time::Duration;
///
/// let store = MemoryStore::new()
///     .with_max_entries(500)
///     .with_ttl(Duration::from_secs(86400));
/// ```
///
/// # Performance
///
/// - Get: O(1) average case
/// - Insert: O(1) without eviction, O(n) with eviction (finds LRU)
#[derive(Debug, Default)]
pub struct MemoryStore {
    max_entries: Option<usize>,
    ttl: Option<Duration>,
    slots: HashMap<CacheKey, Slot>,
    stats: CacheStats,
    next_seq: AccessSequence,
}

impl MemoryStore {
    /// Creates a store with no limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the eviction policy of `config`
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            max_entries: config.max_entries,
            ttl: config.ttl,
            ..Self::default()
        }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Evicts the least recently used entry; returns false when empty
    fn evict_lru(&mut self) -> bool {
        let lru_key = self
            .slots
            .iter()
            .min_by_key(|(_, slot)| (slot.last_accessed, slot.access_seq))
            .map(|(key, _)| key.clone());

        match lru_key {
            Some(key) => {
                debug!(key = %key, "Evicting LRU cache entry");
                self.slots.remove(&key);
                self.stats.evictions += 1;
                true
            }
            None => false,
        }
    }

    fn take_seq(&mut self) -> AccessSequence {
        let seq = self.next_seq;
        self.next_seq = seq.next();
        seq
    }
}

impl EntryStore for MemoryStore {
    fn get(&mut self, key: &CacheKey) -> Option<&CachedEntry> {
        let expired = match self.slots.get(key) {
            Some(slot) => slot.is_expired(self.ttl),
            None => {
                self.stats.misses += 1;
                debug!(key = %key, "Cache miss (memory)");
                return None;
            }
        };

        if expired {
            debug!(key = %key, "Cache entry expired");
            self.slots.remove(key);
            self.stats.expirations += 1;
            self.stats.misses += 1;
            self.stats.entries = self.slots.len();
            return None;
        }

        let seq = self.take_seq();
        self.stats.hits += 1;
        debug!(key = %key, "Cache hit (memory)");

        let slot = self.slots.get_mut(key)?;
        slot.touch(seq);
        Some(&slot.entry)
    }

    fn insert(&mut self, key: CacheKey, entry: CachedEntry) -> Option<CachedEntry> {
        let replaced = self.slots.remove(&key).map(|slot| slot.entry);

        if let Some(max_entries) = self.max_entries {
            while self.slots.len() >= max_entries {
                if !self.evict_lru() {
                    break;
                }
            }
        }

        debug!(key = %key, replaced = replaced.is_some(), "Inserting entry into memory store");
        let seq = self.take_seq();
        self.slots.insert(key, Slot::new(entry, seq));
        self.stats.entries = self.slots.len();

        replaced
    }

    fn clear(&mut self) {
        debug!(entries = self.slots.len(), "Clearing memory store");
        self.slots.clear();
        self.stats.entries = 0;
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    fn name(&self) -> &'static str {
        "MemoryStore"
    }
}
