//! Request identification and client addressing.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Resolve the client network address used for rate-limit bucketing
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - `X-Forwarded-For` is read from the right, only as many hops as there
//!   are trusted proxies; a client can set the rest to anything

use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use std::net::{IpAddr, SocketAddr};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Issues UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Address to bucket this client under.
///
/// With `trusted_proxy_hops = n > 0`, each trusted proxy appended one entry to
/// `X-Forwarded-For`, so the client is the `n`th entry from the right (the
/// left-most one if the chain is shorter). Entries further left are whatever
/// the client sent and are never used. Falls back to the TCP peer when the
/// header is missing or the chosen entry is not an IP.
pub fn client_address(headers: &HeaderMap, peer: SocketAddr, trusted_proxy_hops: usize) -> String {
    if trusted_proxy_hops > 0 {
        let forwarded = headers
            .get(X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| {
                let hops: Vec<&str> = v.split(',').map(str::trim).collect();
                let index = hops.len().saturating_sub(trusted_proxy_hops);
                hops.get(index).and_then(|hop| hop.parse::<IpAddr>().ok())
            });
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }
    peer.ip().to_string()
}
