//! Fixed-window rate limiter.
//!
//! # Responsibilities
//! - Count submissions per client key within a fixed window
//! - Admit up to `max_requests` per window, reject the rest with a retry hint
//! - Evict expired records on demand (driven by the sweeper)
//!
//! # Design Decisions
//! - Fixed windows: a window opens on the first request and resets wholesale.
//!   Bursts straddling a boundary can reach 2x `max_requests`; this is a known
//!   limitation, not a defect.
//! - Settings are fixed at construction. Durations are capped at
//!   [`MAX_DURATION_SECS`] so `now + window` cannot overflow `Instant`
//! - No cross-process coordination: each process counts independently

use std::time::{Duration, Instant};

use crate::admission::key::ClientKey;
use crate::admission::store::{RateRecord, RateStore};
use crate::config::{RateLimitConfig, MAX_DURATION_SECS};

const MAX_DURATION: Duration = Duration::from_secs(MAX_DURATION_SECS);

/// Limiter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub window: Duration,
    pub max_requests: u32,
    pub sweep_interval: Duration,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(15 * 60),
            max_requests: 5,
            sweep_interval: Duration::from_secs(5 * 60),
        }
    }
}

impl From<&RateLimitConfig> for RateLimitSettings {
    fn from(config: &RateLimitConfig) -> Self {
        Self {
            window: Duration::from_secs(config.window_secs),
            max_requests: config.max_requests,
            sweep_interval: Duration::from_secs(config.sweep_interval_secs),
        }
    }
}

/// Outcome of a single rate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Admitted,
    Rejected { retry_after_secs: u64 },
}

/// Per-client fixed-window limiter over a shared [`RateStore`].
#[derive(Debug)]
pub struct RateLimiter {
    settings: RateLimitSettings,
    store: RateStore,
}

impl RateLimiter {
    pub fn new(settings: RateLimitSettings) -> Self {
        let settings = RateLimitSettings {
            window: settings.window.min(MAX_DURATION),
            sweep_interval: settings.sweep_interval.min(MAX_DURATION),
            ..settings
        };
        Self {
            settings,
            store: RateStore::new(),
        }
    }

    pub fn settings(&self) -> &RateLimitSettings {
        &self.settings
    }

    pub fn store(&self) -> &RateStore {
        &self.store
    }

    /// Check `key` against its window at `now`, counting the request if admitted.
    pub fn check_and_record(&self, key: &ClientKey, now: Instant) -> RateDecision {
        let window = self.settings.window;
        let max = self.settings.max_requests;

        self.store.with_record(key, |existing| match existing {
            Some(record) if !record.is_expired(now) => {
                if record.count < max {
                    record.count += 1;
                    (None, RateDecision::Admitted)
                } else {
                    let retry_after_secs = record.retry_after_secs(now);
                    (None, RateDecision::Rejected { retry_after_secs })
                }
            }
            _ => (Some(RateRecord::open(now, window)), RateDecision::Admitted),
        })
    }

    /// Remove every record whose window has passed. Returns the eviction count.
    pub fn sweep(&self, now: Instant) -> usize {
        self.store.remove_expired(now)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitSettings::default())
    }
}
