//! The incident record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::IncidentStatus;

/// A tracked incident.
///
/// This is both the persisted row shape and the wire representation
/// (camelCase field names, RFC 3339 timestamps, `closedAt` null unless
/// the incident is closed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Server-generated, immutable, never reused
    pub id: i64,
    pub name: String,
    pub description: String,
    pub status: IncidentStatus,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
    /// `Some` iff `status == Closed`
    pub closed_at: Option<DateTime<Utc>>,
}

/// Client-supplied fields for create and update.
///
/// Status is never client-supplied: creation forces `OPEN` and the only
/// way to move status is the dedicated transition operation.
#[derive(Debug, Clone, Deserialize)]
pub struct IncidentDraft {
    pub name: String,
    pub description: String,
}
