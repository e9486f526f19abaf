//! Form body decoding.
//!
//! Turns a raw request body into a [`FormPayload`] before admission control
//! sees it. JSON objects and urlencoded forms are accepted.

use serde_json::Value;

use crate::admission::payload::{self, FormPayload};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unsupported content type: {0:?}")]
    UnsupportedContentType(String),

    #[error("malformed JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON body must be an object")]
    NotAnObject,
}

/// Decode `body` according to its `Content-Type` header value.
pub fn decode_payload(content_type: Option<&str>, body: &[u8]) -> Result<FormPayload, DecodeError> {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|m| m.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if mime == "application/json" || mime.ends_with("+json") {
        return match serde_json::from_slice(body)? {
            Value::Object(map) => Ok(map),
            _ => Err(DecodeError::NotAnObject),
        };
    }

    if mime == "application/x-www-form-urlencoded" {
        let pairs =
            url::form_urlencoded::parse(body).map(|(k, v)| (k.into_owned(), v.into_owned()));
        return Ok(payload::from_pairs(pairs));
    }

    Err(DecodeError::UnsupportedContentType(mime))
}
