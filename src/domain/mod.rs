//! Domain model for incidents.
//!
//! The `Incident` record, its status lifecycle, and request payload
//! validation. No storage or transport concerns live here.

pub mod incident;
pub mod status;
pub mod validate;

pub use incident::{Incident, IncidentDraft};
pub use status::IncidentStatus;
pub use validate::{validate_draft, Violation};
