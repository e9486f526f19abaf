//! Response mapping.
//!
//! # Responsibilities
//! - Map admission rejections to status codes and JSON bodies
//! - Map form-processor results to client responses
//!
//! # Design Decisions
//! - Honeypot rejections get the same generic 400 as a malformed body, so
//!   bots learn nothing about which rule fired
//! - 429 responses carry `retryAfter` in the body and a `Retry-After` header

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::admission::{RejectReason, Rejection};
use crate::forms::{ProcessError, ProcessOutcome};

pub const INVALID_REQUEST: &str = "Invalid request";
pub const TOO_MANY_REQUESTS: &str = "Too many requests. Please try again later.";
pub const PAYLOAD_TOO_LARGE: &str = "Payload too large";
pub const UNAVAILABLE: &str = "Service temporarily unavailable";

/// JSON body of every response on a protected endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

fn message(status: StatusCode, text: impl Into<String>) -> Response {
    let body = MessageBody {
        message: text.into(),
        retry_after: None,
    };
    (status, Json(body)).into_response()
}

pub fn invalid_request() -> Response {
    message(StatusCode::BAD_REQUEST, INVALID_REQUEST)
}

pub fn payload_too_large() -> Response {
    message(StatusCode::PAYLOAD_TOO_LARGE, PAYLOAD_TOO_LARGE)
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self.reason {
            RejectReason::HoneypotTriggered | RejectReason::TooManyFields => invalid_request(),
            RejectReason::RateLimited => {
                let retry_after = self.retry_after_secs.unwrap_or(1);
                let body = MessageBody {
                    message: TOO_MANY_REQUESTS.to_string(),
                    retry_after: Some(retry_after),
                };
                let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
                response
            }
        }
    }
}

/// Response for the form processor's result.
pub fn processed(result: Result<ProcessOutcome, ProcessError>) -> Response {
    match result {
        Ok(outcome) => message(StatusCode::OK, outcome.message),
        Err(ProcessError::Invalid(reason)) => message(StatusCode::BAD_REQUEST, reason),
        Err(ProcessError::Unavailable(detail)) => {
            tracing::error!(detail = %detail, "Form processor unavailable");
            message(StatusCode::SERVICE_UNAVAILABLE, UNAVAILABLE)
        }
    }
}
