//! Admission gate for lead-capture form submissions.
//!
//! Honeypot filtering plus per-client fixed-window rate limiting in front of
//! a form processor.

pub mod admission;
pub mod config;
pub mod forms;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use admission::{AdmissionPipeline, AdmissionResult, RejectReason};
pub use config::GateConfig;
pub use http::HttpServer;
pub use lifecycle::{Gate, Shutdown};
