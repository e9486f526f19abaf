//! Concurrent access to the rate store.

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use admission_gate::admission::{
    AdmissionPipeline, AdmissionRequest, ClientKey, FormPayload, HoneypotFilter, RateDecision,
    RateLimitSettings, RateLimiter,
};

fn reference_limiter() -> Arc<RateLimiter> {
    Arc::new(RateLimiter::new(RateLimitSettings {
        window: Duration::from_secs(15 * 60),
        max_requests: 5,
        sweep_interval: Duration::from_secs(5 * 60),
    }))
}

fn race(limiter: Arc<RateLimiter>, key: ClientKey, n: usize, now: Instant) -> (usize, usize) {
    let barrier = Arc::new(Barrier::new(n));
    let handles: Vec<_> = (0..n)
        .map(|_| {
            let limiter = limiter.clone();
            let barrier = barrier.clone();
            let key = key.clone();
            thread::spawn(move || {
                barrier.wait();
                limiter.check_and_record(&key, now)
            })
        })
        .collect();

    let decisions: Vec<RateDecision> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let admitted = decisions.iter().filter(|d| **d == RateDecision::Admitted).count();
    (admitted, decisions.len() - admitted)
}

#[test]
fn simultaneous_checks_admit_exactly_the_limit() {
    for n in [5, 6, 17, 64] {
        let limiter = reference_limiter();
        let key = ClientKey::new(format!("198.51.100.{n}"), "form-submit");
        let (admitted, rejected) = race(limiter.clone(), key.clone(), n, Instant::now());

        assert_eq!(admitted, 5, "n={n}");
        assert_eq!(rejected, n - 5, "n={n}");
        assert_eq!(limiter.store().get(&key).map(|r| r.count), Some(5));
    }
}

#[test]
fn distinct_clients_do_not_interfere() {
    let limiter = reference_limiter();
    let now = Instant::now();
    let barrier = Arc::new(Barrier::new(20));

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let limiter = limiter.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let key = ClientKey::new(format!("10.1.0.{}", i % 4), "form-submit");
                barrier.wait();
                (0..3)
                    .filter(|_| limiter.check_and_record(&key, now) == RateDecision::Admitted)
                    .count()
            })
        })
        .collect();

    let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    // 4 clients x 5 slots each.
    assert_eq!(admitted, 20);
    assert_eq!(limiter.store().len(), 4);
}

#[test]
fn sweep_races_with_requests() {
    let limiter = reference_limiter();
    let t0 = Instant::now();
    for i in 0..200 {
        let key = ClientKey::new(format!("10.2.{}.{}", i / 256, i % 256), "form-submit");
        limiter.check_and_record(&key, t0);
    }
    let later = t0 + Duration::from_secs(15 * 60 + 1);

    let sweeper = {
        let limiter = limiter.clone();
        thread::spawn(move || limiter.sweep(later))
    };
    let live_key = ClientKey::new("10.3.0.1", "form-submit");
    let (admitted, _) = race(limiter.clone(), live_key.clone(), 10, later);
    let evicted = sweeper.join().unwrap();

    assert_eq!(admitted, 5);
    assert_eq!(evicted, 200);
    assert_eq!(limiter.store().get(&live_key).map(|r| r.count), Some(5));
    assert_eq!(limiter.sweep(later), 0);
}

#[test]
fn pipeline_is_shareable_across_threads() {
    let pipeline = AdmissionPipeline::new(HoneypotFilter::default(), reference_limiter());
    let barrier = Arc::new(Barrier::new(12));

    let handles: Vec<_> = (0..12)
        .map(|_| {
            let pipeline = pipeline.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let payload = FormPayload::new();
                let request = AdmissionRequest {
                    client_address: "192.0.2.77",
                    endpoint: "/api/contact",
                    scope: "form-submit",
                    payload: &payload,
                };
                barrier.wait();
                pipeline.admit(&request).is_admitted()
            })
        })
        .collect();

    let admitted = handles.into_iter().map(|h| h.join().unwrap()).filter(|a| *a).count();
    assert_eq!(admitted, 5);
}
