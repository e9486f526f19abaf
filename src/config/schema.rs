//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the admission gate.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address, proxy trust).
    pub listener: ListenerConfig,

    /// Fixed-window rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Honeypot filter settings.
    pub honeypot: HoneypotConfig,

    /// Endpoints placed behind admission control.
    pub endpoints: Vec<EndpointConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request hardening.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            rate_limit: RateLimitConfig::default(),
            honeypot: HoneypotConfig::default(),
            endpoints: default_endpoints(),
            timeouts: TimeoutConfig::default(),
            security: SecurityConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

fn default_endpoints() -> Vec<EndpointConfig> {
    vec![
        EndpointConfig {
            path: "/api/contact".to_string(),
            scope: default_scope(),
        },
        EndpointConfig {
            path: "/api/hosts".to_string(),
            scope: default_scope(),
        },
    ]
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Number of reverse proxies in front of the gate that append to
    /// `X-Forwarded-For`. The client address is the entry this many hops from
    /// the right. 0 ignores the header and uses the TCP peer.
    pub trusted_proxy_hops: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            trusted_proxy_hops: 0,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Window length in seconds.
    pub window_secs: u64,

    /// Submissions admitted per client per window.
    pub max_requests: u32,

    /// How often expired records are swept, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 15 * 60,
            max_requests: 5,
            sweep_interval_secs: 5 * 60,
        }
    }
}

/// Honeypot filter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HoneypotConfig {
    /// Decoy field names. Filling any of them marks the submission as a bot.
    pub field_names: Vec<String>,

    /// Maximum number of distinct fields in a submission.
    pub max_fields: usize,
}

impl Default for HoneypotConfig {
    fn default() -> Self {
        Self {
            field_names: vec![
                "website".to_string(),
                "url".to_string(),
                "homepage".to_string(),
            ],
            max_fields: 25,
        }
    }
}

/// A POST endpoint protected by the admission pipeline.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointConfig {
    /// Route path (e.g., "/api/contact").
    pub path: String,

    /// Quota scope. Endpoints with the same scope share a client's quota.
    #[serde(default = "default_scope")]
    pub scope: String,
}

fn default_scope() -> String {
    "form-submit".to_string()
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
