//! Form-processing seam.
//!
//! Admitted submissions are handed to a [`FormProcessor`]. Persistence and
//! notification live behind this trait; the gate only knows the payload.

use async_trait::async_trait;
use serde::Serialize;

use crate::admission::payload::{self, FormPayload};

/// An admitted submission.
#[derive(Debug, Clone)]
pub struct FormSubmission {
    pub endpoint: String,
    pub scope: String,
    pub client: String,
    pub payload: FormPayload,
}

/// Successful processing result, returned to the client as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessOutcome {
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// Business validation failed; the message is safe to show the client.
    #[error("{0}")]
    Invalid(String),

    /// Storage or notification backend is down.
    #[error("processor unavailable: {0}")]
    Unavailable(String),
}

/// Receives submissions that passed admission control.
#[async_trait]
pub trait FormProcessor: Send + Sync {
    async fn process(&self, submission: FormSubmission) -> Result<ProcessOutcome, ProcessError>;
}

/// Accepts everything and logs the shape of what it received.
#[derive(Debug, Default, Clone)]
pub struct LoggingProcessor;

#[async_trait]
impl FormProcessor for LoggingProcessor {
    async fn process(&self, submission: FormSubmission) -> Result<ProcessOutcome, ProcessError> {
        tracing::info!(
            endpoint = %submission.endpoint,
            client = %submission.client,
            fields = ?payload::field_names(&submission.payload),
            "Submission accepted"
        );
        Ok(ProcessOutcome {
            message: "Thank you! Your submission has been received.".to_string(),
        })
    }
}
