//! Startup orchestration.
//!
//! # Responsibilities
//! - Own the validated configuration
//! - Build the rate store, limiter, honeypot filter and pipeline exactly once
//! - Hand out the sweep task bound to the same limiter
//!
//! # Design Decisions
//! - Fail fast: configuration errors surface before anything is built
//! - The limiter is shared by `Arc`; nothing lives in a static

use std::sync::Arc;

use crate::admission::{
    AdmissionPipeline, Clock, HoneypotFilter, RateLimitSettings, RateLimiter, SweepTask,
    SystemClock,
};
use crate::config::GateConfig;

/// Composition root for the admission layer.
#[derive(Clone)]
pub struct Gate {
    config: GateConfig,
    pipeline: AdmissionPipeline,
}

impl Gate {
    pub fn build(config: GateConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: GateConfig, clock: Arc<dyn Clock>) -> Self {
        let settings = RateLimitSettings::from(&config.rate_limit);
        let limiter = Arc::new(RateLimiter::new(settings));
        let honeypot = HoneypotFilter::from_config(&config.honeypot);

        tracing::info!(
            window_secs = settings.window.as_secs(),
            max_requests = settings.max_requests,
            sweep_interval_secs = settings.sweep_interval.as_secs(),
            max_fields = honeypot.max_fields(),
            "Admission pipeline built"
        );

        let pipeline = AdmissionPipeline::with_clock(honeypot, limiter, clock);
        Self { config, pipeline }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &AdmissionPipeline {
        &self.pipeline
    }

    /// Start sweeping this gate's store on its configured interval.
    pub fn start_sweeper(&self) -> SweepTask {
        SweepTask::start(
            self.pipeline.limiter().clone(),
            self.pipeline.clock().clone(),
            self.pipeline.limiter().settings().sweep_interval,
        )
    }
}
