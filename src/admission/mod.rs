//! Admission control subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound submission (address, decoded payload, endpoint scope):
//!     → key.rs (derive ClientKey from address + scope)
//!     → honeypot.rs (decoy fields, field-count ceiling)
//!         rejected → Rejected(reason), no state touched
//!     → rate_limiter.rs (fixed-window counter in store.rs)
//!         rejected → Rejected(RATE_LIMITED, retry_after)
//!     → Admitted → form processor
//!
//! Background:
//!     sweeper.rs (periodic tick) → rate_limiter.sweep(now) → store.rs evicts expired
//! ```
//!
//! # Design Decisions
//! - Every path returns a decision value; nothing in here fails with an error
//! - Time is injected through `Clock` so window arithmetic is deterministic in tests
//! - Fixed windows, not sliding: a client can burst up to 2x the limit across
//!   a window boundary. Known and accepted for an abuse deterrent.
//! - State is process-local and lost on restart

pub mod clock;
pub mod honeypot;
pub mod key;
pub mod payload;
pub mod pipeline;
pub mod rate_limiter;
pub mod reason;
pub mod store;
pub mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use honeypot::{HoneypotFilter, HoneypotVerdict};
pub use key::ClientKey;
pub use payload::FormPayload;
pub use pipeline::{AdmissionPipeline, AdmissionRequest};
pub use rate_limiter::{RateDecision, RateLimitSettings, RateLimiter};
pub use reason::{AdmissionResult, RejectReason, Rejection};
pub use store::{RateRecord, RateStore};
pub use sweeper::SweepTask;
