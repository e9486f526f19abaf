//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (window > 0, limits > 0, durations at most a
//!   year, addresses parse)
//! - Detect duplicate endpoint paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::GateConfig;

/// Upper bound for any configured duration: one year.
pub const MAX_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} must be at most {max} seconds")]
    TooLong { field: &'static str, max: u64 },

    #[error("{field} is not a valid socket address: {value}")]
    BadAddress { field: &'static str, value: String },

    #[error("honeypot.field_names must not be empty")]
    NoHoneypotFields,

    #[error("honeypot.field_names contains a blank name")]
    BlankHoneypotField,

    #[error("endpoint path must start with '/': {0}")]
    BadEndpointPath(String),

    #[error("duplicate endpoint path: {0}")]
    DuplicateEndpoint(String),

    #[error("endpoint {0} has an empty scope")]
    EmptyScope(String),
}

pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let positives: [(&'static str, bool); 6] = [
        ("rate_limit.window_secs", config.rate_limit.window_secs > 0),
        ("rate_limit.max_requests", config.rate_limit.max_requests > 0),
        ("rate_limit.sweep_interval_secs", config.rate_limit.sweep_interval_secs > 0),
        ("honeypot.max_fields", config.honeypot.max_fields > 0),
        ("timeouts.request_secs", config.timeouts.request_secs > 0),
        ("security.max_body_size", config.security.max_body_size > 0),
    ];
    for (field, ok) in positives {
        if !ok {
            errors.push(ValidationError::NotPositive { field });
        }
    }

    let durations = [
        ("rate_limit.window_secs", config.rate_limit.window_secs),
        ("rate_limit.sweep_interval_secs", config.rate_limit.sweep_interval_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ];
    for (field, secs) in durations {
        if secs > MAX_DURATION_SECS {
            errors.push(ValidationError::TooLong {
                field,
                max: MAX_DURATION_SECS,
            });
        }
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.honeypot.field_names.is_empty() {
        errors.push(ValidationError::NoHoneypotFields);
    } else if config.honeypot.field_names.iter().any(|n| n.trim().is_empty()) {
        errors.push(ValidationError::BlankHoneypotField);
    }

    let mut seen = HashSet::new();
    for endpoint in &config.endpoints {
        if !endpoint.path.starts_with('/') {
            errors.push(ValidationError::BadEndpointPath(endpoint.path.clone()));
        }
        if !seen.insert(endpoint.path.as_str()) {
            errors.push(ValidationError::DuplicateEndpoint(endpoint.path.clone()));
        }
        if endpoint.scope.trim().is_empty() {
            errors.push(ValidationError::EmptyScope(endpoint.path.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::EndpointConfig;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&GateConfig::default()), Ok(()));
    }

    #[test]
    fn reports_every_problem() {
        let mut config = GateConfig::default();
        config.rate_limit.window_secs = 0;
        config.rate_limit.max_requests = 0;
        config.listener.bind_address = "not-an-address".into();
        config.honeypot.field_names.clear();
        config.endpoints.push(EndpointConfig {
            path: "/api/contact".into(),
            scope: " ".into(),
        });
        config.endpoints.push(EndpointConfig {
            path: "api/relative".into(),
            scope: "form-submit".into(),
        });

        let errors = validate_config(&config).unwrap_err();
        let not_positive = |field| ValidationError::NotPositive { field };
        assert!(errors.contains(&not_positive("rate_limit.window_secs")));
        assert!(errors.contains(&not_positive("rate_limit.max_requests")));
        assert!(errors.contains(&ValidationError::NoHoneypotFields));
        assert!(errors.contains(&ValidationError::DuplicateEndpoint("/api/contact".into())));
        assert!(errors.contains(&ValidationError::EmptyScope("/api/contact".into())));
        assert!(errors.contains(&ValidationError::BadEndpointPath("api/relative".into())));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::BadAddress { field: "listener.bind_address", .. }
        )));
        assert_eq!(errors.len(), 7);
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = GateConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn durations_beyond_a_year_are_rejected() {
        let mut config = GateConfig::default();
        config.rate_limit.window_secs = MAX_DURATION_SECS;
        assert!(validate_config(&config).is_ok());

        config.rate_limit.window_secs = u64::MAX;
        config.rate_limit.sweep_interval_secs = MAX_DURATION_SECS + 1;
        config.timeouts.request_secs = u64::MAX;
        let errors = validate_config(&config).unwrap_err();
        let too_long = |field| ValidationError::TooLong { field, max: MAX_DURATION_SECS };
        assert_eq!(
            errors,
            vec![
                too_long("rate_limit.window_secs"),
                too_long("rate_limit.sweep_interval_secs"),
                too_long("timeouts.request_secs"),
            ]
        );
    }
}
