//! Observability.
//!
//! Structured JSON logging only; the service exposes no metrics
//! surface.

pub mod logger;

pub use logger::{Logger, Severity};
