//! Admission outcomes.
//!
//! Rejections are routine results of adversarial or excessive traffic, not
//! errors. The HTTP layer maps each reason to a status code and message.

use serde::Serialize;
use std::fmt;

/// Why a submission was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    HoneypotTriggered,
    TooManyFields,
    RateLimited,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::HoneypotTriggered => "HONEYPOT_TRIGGERED",
            RejectReason::TooManyFields => "TOO_MANY_FIELDS",
            RejectReason::RateLimited => "RATE_LIMITED",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejection with its retry hint (rate limiting only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    pub reason: RejectReason,
    pub retry_after_secs: Option<u64>,
}

impl Rejection {
    pub fn new(reason: RejectReason) -> Self {
        Self {
            reason,
            retry_after_secs: None,
        }
    }

    pub fn rate_limited(retry_after_secs: u64) -> Self {
        Self {
            reason: RejectReason::RateLimited,
            retry_after_secs: Some(retry_after_secs),
        }
    }

    /// HTTP status code the rejection maps to.
    pub fn status(&self) -> u16 {
        match self.reason {
            RejectReason::HoneypotTriggered | RejectReason::TooManyFields => 400,
            RejectReason::RateLimited => 429,
        }
    }
}

/// Result of running a submission through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionResult {
    Admitted,
    Rejected(Rejection),
}

impl AdmissionResult {
    pub fn is_admitted(&self) -> bool {
        matches!(self, AdmissionResult::Admitted)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            AdmissionResult::Admitted => None,
            AdmissionResult::Rejected(r) => Some(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_serialize_as_wire_tags() {
        let json = serde_json::to_string(&RejectReason::TooManyFields).unwrap();
        assert_eq!(json, "\"TOO_MANY_FIELDS\"");
        assert_eq!(RejectReason::HoneypotTriggered.to_string(), "HONEYPOT_TRIGGERED");
    }

    #[test]
    fn statuses_follow_reason() {
        assert_eq!(Rejection::new(RejectReason::HoneypotTriggered).status(), 400);
        assert_eq!(Rejection::new(RejectReason::TooManyFields).status(), 400);
        assert_eq!(Rejection::rate_limited(40).status(), 429);
        assert_eq!(Rejection::rate_limited(40).retry_after_secs, Some(40));
    }
}
