//! Admission control middleware for protected form endpoints.
//!
//! Buffers and decodes the body, runs it through the admission pipeline, and
//! either answers with the rejection or forwards the request with the admitted
//! [`FormSubmission`] attached as an extension.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header::CONTENT_TYPE, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::admission::{AdmissionPipeline, AdmissionRequest, AdmissionResult};
use crate::forms::FormSubmission;
use crate::http::body::decode_payload;
use crate::http::request::client_address;
use crate::http::response;
use crate::observability::metrics;

/// State for one protected endpoint.
#[derive(Clone)]
pub struct AdmissionState {
    pub pipeline: AdmissionPipeline,
    pub endpoint: Arc<str>,
    pub scope: Arc<str>,
    pub trusted_proxy_hops: usize,
    pub max_body_size: usize,
}

pub async fn admission_middleware(
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<AdmissionState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = client_address(request.headers(), peer, state.trusted_proxy_hops);
    let (mut parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(client = %client, error = %e, "Failed to buffer request body");
            metrics::record_response(&state.endpoint, 413);
            return response::payload_too_large();
        }
    };

    let content_type = parts.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let payload = match decode_payload(content_type, &bytes) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!(client = %client, error = %e, "Undecodable submission body");
            metrics::record_response(&state.endpoint, 400);
            return response::invalid_request();
        }
    };

    let admission = AdmissionRequest {
        client_address: &client,
        endpoint: &state.endpoint,
        scope: &state.scope,
        payload: &payload,
    };
    if let AdmissionResult::Rejected(rejection) = state.pipeline.admit(&admission) {
        metrics::record_response(&state.endpoint, rejection.status());
        return rejection.into_response();
    }

    parts.extensions.insert(FormSubmission {
        endpoint: state.endpoint.to_string(),
        scope: state.scope.to_string(),
        client,
        payload,
    });
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
