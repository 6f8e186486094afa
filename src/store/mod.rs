//! Storage layer.
//!
//! The repository contract plus two adapters: SQLite for durable
//! operation and an in-memory table for tests and `serve --memory`.
//! Ordering and filtering are delegated to the backend; no adapter
//! holds derived data structures of its own.

pub mod errors;
pub mod memory;
pub mod sqlite;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::domain::{Incident, IncidentStatus};

/// Repository contract for incident rows.
///
/// Implementations guarantee primary-key uniqueness and that generated
/// ids are never reused, even after deletes.
pub trait IncidentRepository: Send + Sync {
    /// Persist a new row. The `id` field of the input is ignored; the
    /// generated id is returned.
    fn insert(&self, incident: &Incident) -> StoreResult<i64>;

    /// Fetch one row by primary key
    fn get(&self, id: i64) -> StoreResult<Option<Incident>>;

    /// All rows in storage order
    fn all(&self) -> StoreResult<Vec<Incident>>;

    /// At most `limit` rows, newest `created_at` first
    fn latest(&self, limit: usize) -> StoreResult<Vec<Incident>>;

    /// Rows with exactly the given status, in storage order
    fn by_status(&self, status: IncidentStatus) -> StoreResult<Vec<Incident>>;

    /// Replace the mutable columns of the row with the incident's id.
    /// Returns false when no such row exists. `created_at` is never
    /// written back.
    fn update(&self, incident: &Incident) -> StoreResult<bool>;

    /// Remove one row by primary key. Returns false when absent.
    fn delete(&self, id: i64) -> StoreResult<bool>;
}
