//! Incident status lifecycle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of an incident.
///
/// Serialized in SCREAMING_SNAKE_CASE on the wire and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentStatus {
    /// Newly created, not yet picked up
    Open,
    /// Under analysis or being worked
    InProgress,
    /// Fixed but not yet closed out
    Resolved,
    /// Fully closed; `closed_at` is set while here
    Closed,
}

impl IncidentStatus {
    /// Returns the wire/storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Open => "OPEN",
            IncidentStatus::InProgress => "IN_PROGRESS",
            IncidentStatus::Resolved => "RESOLVED",
            IncidentStatus::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for status strings that name no known status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for IncidentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(IncidentStatus::Open),
            "IN_PROGRESS" => Ok(IncidentStatus::InProgress),
            "RESOLVED" => Ok(IncidentStatus::Resolved),
            "CLOSED" => Ok(IncidentStatus::Closed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}
