//! Admission pipeline: honeypot first, then the rate limiter.

use std::sync::Arc;
use std::time::Instant;

use crate::admission::clock::{Clock, SystemClock};
use crate::admission::honeypot::HoneypotFilter;
use crate::admission::key::ClientKey;
use crate::admission::payload::FormPayload;
use crate::admission::rate_limiter::{RateDecision, RateLimiter};
use crate::admission::reason::{AdmissionResult, RejectReason, Rejection};
use crate::observability::metrics;

/// What the pipeline needs to know about one inbound submission.
#[derive(Debug, Clone, Copy)]
pub struct AdmissionRequest<'a> {
    /// Client network address.
    pub client_address: &'a str,
    /// Path of the protected endpoint.
    pub endpoint: &'a str,
    /// Scope tag the endpoint's quota is counted under.
    pub scope: &'a str,
    /// Decoded body.
    pub payload: &'a FormPayload,
}

impl AdmissionRequest<'_> {
    pub fn client_key(&self) -> ClientKey {
        ClientKey::new(self.client_address, self.scope)
    }
}

/// Composition of the honeypot filter and the rate limiter.
///
/// Owns its limiter through an `Arc` so the sweeper can share the same store.
#[derive(Clone)]
pub struct AdmissionPipeline {
    honeypot: HoneypotFilter,
    limiter: Arc<RateLimiter>,
    clock: Arc<dyn Clock>,
}

impl AdmissionPipeline {
    pub fn new(honeypot: HoneypotFilter, limiter: Arc<RateLimiter>) -> Self {
        Self::with_clock(honeypot, limiter, Arc::new(SystemClock))
    }

    pub fn with_clock(
        honeypot: HoneypotFilter,
        limiter: Arc<RateLimiter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            honeypot,
            limiter,
            clock,
        }
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Decide on `request` at the clock's current time.
    pub fn admit(&self, request: &AdmissionRequest<'_>) -> AdmissionResult {
        self.admit_at(request, self.clock.now())
    }

    /// Decide on `request` as of `now`.
    pub fn admit_at(&self, request: &AdmissionRequest<'_>, now: Instant) -> AdmissionResult {
        let result = self.decide(request, now);
        metrics::record_decision(&result);
        result
    }

    fn decide(&self, request: &AdmissionRequest<'_>, now: Instant) -> AdmissionResult {
        let key = request.client_key();

        let verdict = self.honeypot.evaluate(request.payload);
        if !verdict.admitted {
            let reason = verdict.reason.unwrap_or(RejectReason::HoneypotTriggered);
            tracing::info!(
                client = %key,
                endpoint = request.endpoint,
                reason = %reason,
                "Submission rejected by honeypot filter"
            );
            return AdmissionResult::Rejected(Rejection::new(reason));
        }

        match self.limiter.check_and_record(&key, now) {
            RateDecision::Admitted => AdmissionResult::Admitted,
            RateDecision::Rejected { retry_after_secs } => {
                tracing::warn!(
                    client = %key,
                    endpoint = request.endpoint,
                    retry_after_secs,
                    "Rate limit exceeded"
                );
                AdmissionResult::Rejected(Rejection::rate_limited(retry_after_secs))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::clock::ManualClock;
    use crate::admission::rate_limiter::RateLimitSettings;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn payload(value: Value) -> FormPayload {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    fn pipeline(max_requests: u32, window_secs: u64) -> (AdmissionPipeline, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let limiter = Arc::new(RateLimiter::new(RateLimitSettings {
            window: Duration::from_secs(window_secs),
            max_requests,
            sweep_interval: Duration::from_secs(300),
        }));
        let pipeline =
            AdmissionPipeline::with_clock(HoneypotFilter::default(), limiter, clock.clone());
        (pipeline, clock)
    }

    fn request<'a>(address: &'a str, payload: &'a FormPayload) -> AdmissionRequest<'a> {
        AdmissionRequest {
            client_address: address,
            endpoint: "/api/contact",
            scope: "form-submit",
            payload,
        }
    }

    #[test]
    fn honeypot_rejection_consumes_no_quota() {
        let (pipeline, _clock) = pipeline(1, 60);
        let bot = payload(json!({ "name": "x", "website": "http://spam.example" }));
        let human = payload(json!({ "name": "Ada", "email": "ada@example.com" }));

        for _ in 0..3 {
            let result = pipeline.admit(&request("203.0.113.9", &bot));
            assert_eq!(
                result,
                AdmissionResult::Rejected(Rejection::new(RejectReason::HoneypotTriggered))
            );
        }
        assert!(pipeline.limiter().store().is_empty());

        assert!(pipeline.admit(&request("203.0.113.9", &human)).is_admitted());
    }

    #[test]
    fn field_bombing_rejected_before_limiter() {
        let (pipeline, _clock) = pipeline(5, 60);
        let wide: FormPayload = (0..30).map(|i| (format!("f{i}"), json!("v"))).collect();

        let result = pipeline.admit(&request("203.0.113.10", &wide));
        assert_eq!(
            result.rejection().map(|r| r.reason),
            Some(RejectReason::TooManyFields)
        );
        assert!(pipeline.limiter().store().is_empty());
    }

    #[test]
    fn rate_limit_rejection_carries_retry_hint() {
        let (pipeline, clock) = pipeline(2, 60);
        let body = payload(json!({ "email": "a@example.com" }));

        assert!(pipeline.admit(&request("client-a", &body)).is_admitted());
        clock.advance(Duration::from_secs(10));
        assert!(pipeline.admit(&request("client-a", &body)).is_admitted());
        clock.advance(Duration::from_secs(10));
        assert_eq!(
            pipeline.admit(&request("client-a", &body)),
            AdmissionResult::Rejected(Rejection::rate_limited(40))
        );

        clock.set(Duration::from_secs(61));
        assert!(pipeline.admit(&request("client-a", &body)).is_admitted());
        let key = ClientKey::new("client-a", "form-submit");
        assert_eq!(pipeline.limiter().store().get(&key).map(|r| r.count), Some(1));
    }

    #[test]
    fn scopes_have_separate_quotas() {
        let (pipeline, _clock) = pipeline(1, 60);
        let body = payload(json!({ "email": "a@example.com" }));
        let contact = request("198.51.100.5", &body);
        let newsletter = AdmissionRequest {
            scope: "newsletter",
            endpoint: "/api/subscribe",
            ..contact
        };

        assert!(pipeline.admit(&contact).is_admitted());
        assert!(pipeline.admit(&newsletter).is_admitted());
        assert!(!pipeline.admit(&contact).is_admitted());
    }
}
