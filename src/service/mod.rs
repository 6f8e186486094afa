//! Business layer.
//!
//! One operation per transport endpoint, each a single storage round
//! trip. Owns every timestamp: `created_at`/`updated_at` are stamped
//! here at insert/update time, never by the storage engine, and the
//! closing-timestamp rule lives in [`IncidentService::set_status`].

use chrono::Utc;
use thiserror::Error;

use crate::domain::{Incident, IncidentDraft, IncidentStatus};
use crate::observability::Logger;
use crate::store::{IncidentRepository, StoreError};

/// Cap for the latest-incidents listing, one page
pub const LATEST_LIMIT: usize = 20;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Business-layer failures
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No row with the given id; the id rides along for diagnostics
    #[error("Incident not found with id: {0}")]
    NotFound(i64),

    /// Storage failure, unrecoverable for this request
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Incident operations over a constructor-passed repository
pub struct IncidentService<R: IncidentRepository> {
    repo: R,
}

impl<R: IncidentRepository> IncidentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create an incident from a validated draft.
    ///
    /// New incidents always start `OPEN` with `created_at == updated_at`
    /// and no closing timestamp.
    pub fn create(&self, draft: IncidentDraft) -> ServiceResult<Incident> {
        let now = Utc::now();
        let mut incident = Incident {
            id: 0,
            name: draft.name,
            description: draft.description,
            status: IncidentStatus::Open,
            created_at: now,
            updated_at: now,
            closed_at: None,
        };

        incident.id = self.repo.insert(&incident)?;
        Logger::info(
            "INCIDENT_CREATED",
            &[("id", incident.id.to_string().as_str())],
        );
        Ok(incident)
    }

    pub fn get(&self, id: i64) -> ServiceResult<Incident> {
        self.load(id)
    }

    pub fn list_all(&self) -> ServiceResult<Vec<Incident>> {
        Ok(self.repo.all()?)
    }

    /// At most [`LATEST_LIMIT`] incidents, newest first, one page
    pub fn latest(&self) -> ServiceResult<Vec<Incident>> {
        Ok(self.repo.latest(LATEST_LIMIT)?)
    }

    /// Replace name and description; id and `created_at` are untouched
    pub fn update(&self, id: i64, draft: IncidentDraft) -> ServiceResult<Incident> {
        let mut incident = self.load(id)?;
        incident.name = draft.name;
        incident.description = draft.description;
        incident.updated_at = Utc::now();

        self.persist(&incident)?;
        Logger::info("INCIDENT_UPDATED", &[("id", id.to_string().as_str())]);
        Ok(incident)
    }

    /// Transition status.
    ///
    /// Moving to `CLOSED` stamps `closed_at`; moving anywhere else
    /// clears a previously set `closed_at` (reopening).
    pub fn set_status(&self, id: i64, status: IncidentStatus) -> ServiceResult<Incident> {
        let mut incident = self.load(id)?;
        let now = Utc::now();

        incident.status = status;
        if status == IncidentStatus::Closed {
            incident.closed_at = Some(now);
        } else if incident.closed_at.is_some() {
            incident.closed_at = None;
        }
        incident.updated_at = now;

        self.persist(&incident)?;
        Logger::info(
            "INCIDENT_STATUS_CHANGED",
            &[
                ("id", id.to_string().as_str()),
                ("status", status.as_str()),
            ],
        );
        Ok(incident)
    }

    pub fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.repo.delete(id)? {
            return Err(ServiceError::NotFound(id));
        }
        Logger::info("INCIDENT_DELETED", &[("id", id.to_string().as_str())]);
        Ok(())
    }

    pub fn find_by_status(&self, status: IncidentStatus) -> ServiceResult<Vec<Incident>> {
        Ok(self.repo.by_status(status)?)
    }

    fn load(&self, id: i64) -> ServiceResult<Incident> {
        self.repo.get(id)?.ok_or(ServiceError::NotFound(id))
    }

    fn persist(&self, incident: &Incident) -> ServiceResult<()> {
        // The row can vanish between load and write; report it as gone
        if !self.repo.update(incident)? {
            return Err(ServiceError::NotFound(incident.id));
        }
        Ok(())
    }
}
