//! Honeypot filter.
//!
//! # Responsibilities
//! - Reject payloads that fill a decoy field real visitors never see
//! - Reject payloads that exceed the field-count ceiling
//!
//! # Design Decisions
//! - Pure function of the payload: no shared state
//! - Decoy fields are checked before the field count
//! - Diagnostics carry field names only, never values

use std::collections::HashSet;

use crate::admission::payload::{self, FormPayload};
use crate::admission::reason::RejectReason;
use crate::config::HoneypotConfig;

/// Outcome of a honeypot evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoneypotVerdict {
    pub admitted: bool,
    pub reason: Option<RejectReason>,
}

impl HoneypotVerdict {
    pub fn admit() -> Self {
        Self {
            admitted: true,
            reason: None,
        }
    }

    pub fn reject(reason: RejectReason) -> Self {
        Self {
            admitted: false,
            reason: Some(reason),
        }
    }
}

/// Stateless bot-signature filter.
#[derive(Debug, Clone)]
pub struct HoneypotFilter {
    decoy_fields: HashSet<String>,
    max_fields: usize,
}

impl HoneypotFilter {
    pub fn new<I, S>(decoy_fields: I, max_fields: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            decoy_fields: decoy_fields.into_iter().map(Into::into).collect(),
            max_fields,
        }
    }

    pub fn from_config(config: &HoneypotConfig) -> Self {
        Self::new(config.field_names.iter().cloned(), config.max_fields)
    }

    pub fn max_fields(&self) -> usize {
        self.max_fields
    }

    pub fn evaluate(&self, payload: &FormPayload) -> HoneypotVerdict {
        let tripped = payload
            .iter()
            .any(|(name, value)| self.decoy_fields.contains(name) && payload::is_filled(value));
        if tripped {
            tracing::warn!(
                fields = ?payload::field_names(payload),
                "Honeypot field filled, rejecting submission"
            );
            return HoneypotVerdict::reject(RejectReason::HoneypotTriggered);
        }

        if payload.len() > self.max_fields {
            tracing::warn!(
                field_count = payload.len(),
                max_fields = self.max_fields,
                fields = ?payload::field_names(payload),
                "Too many fields, rejecting submission"
            );
            return HoneypotVerdict::reject(RejectReason::TooManyFields);
        }

        HoneypotVerdict::admit()
    }
}

impl Default for HoneypotFilter {
    fn default() -> Self {
        Self::from_config(&HoneypotConfig::default())
    }
}
