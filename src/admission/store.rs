//! Process-wide rate counter store.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::time::{Duration, Instant};

use crate::admission::key::ClientKey;

/// Request count for one client within its current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateRecord {
    pub count: u32,
    pub window_reset_at: Instant,
}

impl RateRecord {
    /// A record for the first request of a new window.
    pub fn open(now: Instant, window: Duration) -> Self {
        Self {
            count: 1,
            window_reset_at: now + window,
        }
    }

    /// Expired once `now` is strictly past the reset instant.
    pub fn is_expired(&self, now: Instant) -> bool {
        now > self.window_reset_at
    }

    /// Whole seconds until the window resets, rounded up, at least 1.
    pub fn retry_after_secs(&self, now: Instant) -> u64 {
        let remaining = self.window_reset_at.saturating_duration_since(now);
        let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
        secs.max(1)
    }
}

/// Concurrent map of client key to its rate record.
///
/// Sharded: a mutation through [`RateStore::with_record`] holds the write lock
/// of the key's shard for its whole duration, so read-compare-increment is one
/// critical section per key.
#[derive(Debug, Default)]
pub struct RateStore {
    records: DashMap<ClientKey, RateRecord>,
}

impl RateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the record for `key` while holding its lock.
    ///
    /// `f` receives `None` when no record exists and returns the record to
    /// store (or `None` to leave the slot empty) together with its result.
    pub fn with_record<T>(
        &self,
        key: &ClientKey,
        f: impl FnOnce(Option<&mut RateRecord>) -> (Option<RateRecord>, T),
    ) -> T {
        match self.records.entry(key.clone()) {
            Entry::Occupied(mut slot) => {
                let (replacement, out) = f(Some(slot.get_mut()));
                if let Some(record) = replacement {
                    *slot.get_mut() = record;
                }
                out
            }
            Entry::Vacant(slot) => {
                let (created, out) = f(None);
                if let Some(record) = created {
                    slot.insert(record);
                }
                out
            }
        }
    }

    /// Copy of the current record for `key`, if any.
    pub fn get(&self, key: &ClientKey) -> Option<RateRecord> {
        self.records.get(key).map(|r| *r.value())
    }

    /// Delete every record expired at `now`. Returns how many were removed.
    pub fn remove_expired(&self, now: Instant) -> usize {
        let mut removed = 0;
        self.records.retain(|_, record| {
            let expired = record.is_expired(now);
            removed += usize::from(expired);
            !expired
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
