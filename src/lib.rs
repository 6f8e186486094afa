//! incidentd - A minimal incident-tracking CRUD service
//!
//! Three thin layers over one record type: an axum HTTP surface, a
//! business layer owning timestamps and the status-transition rule,
//! and a repository contract with SQLite and in-memory adapters.

pub mod cli;
pub mod domain;
pub mod http_server;
pub mod observability;
pub mod service;
pub mod store;
