//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, limits)
//!     → middleware/admission.rs (buffer body → body.rs decode → admission pipeline)
//!         rejected → response.rs (400 / 429 / 413)
//!     → server.rs submit handler → form processor
//!     → response.rs (JSON message)
//! ```

pub mod body;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{client_address, UuidRequestId, X_FORWARDED_FOR, X_REQUEST_ID};
pub use server::HttpServer;
