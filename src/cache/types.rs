//! Strong types for cache entry metadata
//!
//! - [`TimestampMillis`]: wall-clock instant in epoch milliseconds, used for TTL and LRU
//! - [`AccessSequence`]: monotonic counter breaking LRU ties within one millisecond

use std::time::Duration;

use chrono::Utc;

/// Wall-clock instant in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimestampMillis(i64);

impl TimestampMillis {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    #[cfg(test)]
    pub(crate) fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Time elapsed since this instant; zero for instants in the future
    pub fn age_since_now(&self) -> Duration {
        let age = Utc::now().timestamp_millis().saturating_sub(self.0);
        Duration::from_millis(u64::try_from(age).unwrap_or(0))
    }

    pub fn is_older_than(&self, duration: Duration) -> bool {
        self.age_since_now() > duration
    }
}

impl Default for TimestampMillis {
    fn default() -> Self {
        Self::now()
    }
}

/// Monotonic access counter; lower values were touched earlier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct AccessSequence(u64);

impl AccessSequence {
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}
