//! Incident HTTP routes.
//!
//! One handler per endpoint; each validates shape, calls the business
//! layer once, and serializes the outcome. Responses are the bare
//! record (or array) in JSON; errors use the `{error, code}` envelope.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::domain::{validate_draft, Incident, IncidentDraft, IncidentStatus};
use crate::service::IncidentService;
use crate::store::IncidentRepository;

use super::errors::{ApiError, ApiResult};

/// Shared state type
type ServiceState<R> = Arc<IncidentService<R>>;

/// Build the incident router
pub fn incident_routes<R: IncidentRepository + 'static>(service: ServiceState<R>) -> Router {
    Router::new()
        .route("/incidents", post(create_handler))
        .route("/incidents", get(list_handler))
        .route("/incidents/latest", get(latest_handler))
        .route("/incidents/status/{status}", get(by_status_handler))
        .route("/incidents/{id}", get(get_handler))
        .route("/incidents/{id}", put(update_handler))
        .route("/incidents/{id}", delete(delete_handler))
        .route("/incidents/{id}/status", patch(status_handler))
        .with_state(service)
}

/// Status transition request body
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Parse a status string into the enum, rejecting unknowns as 400
fn parse_status(raw: &str) -> ApiResult<IncidentStatus> {
    IncidentStatus::from_str(raw).map_err(|_| ApiError::InvalidStatus(raw.to_string()))
}

/// Create incident handler
async fn create_handler<R: IncidentRepository + 'static>(
    State(service): State<ServiceState<R>>,
    Json(draft): Json<IncidentDraft>,
) -> ApiResult<(StatusCode, Json<Incident>)> {
    validate_draft(&draft).map_err(ApiError::Validation)?;

    let incident = service.create(draft)?;
    Ok((StatusCode::CREATED, Json(incident)))
}

/// Get single incident handler
async fn get_handler<R: IncidentRepository + 'static>(
    State(service): State<ServiceState<R>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Incident>> {
    let incident = service.get(id)?;
    Ok(Json(incident))
}

/// List all incidents handler
async fn list_handler<R: IncidentRepository + 'static>(
    State(service): State<ServiceState<R>>,
) -> ApiResult<Json<Vec<Incident>>> {
    let incidents = service.list_all()?;
    Ok(Json(incidents))
}

/// Latest incidents handler (at most 20, newest first)
async fn latest_handler<R: IncidentRepository + 'static>(
    State(service): State<ServiceState<R>>,
) -> ApiResult<Json<Vec<Incident>>> {
    let incidents = service.latest()?;
    Ok(Json(incidents))
}

/// Update incident handler
async fn update_handler<R: IncidentRepository + 'static>(
    State(service): State<ServiceState<R>>,
    Path(id): Path<i64>,
    Json(draft): Json<IncidentDraft>,
) -> ApiResult<Json<Incident>> {
    validate_draft(&draft).map_err(ApiError::Validation)?;

    let incident = service.update(id, draft)?;
    Ok(Json(incident))
}

/// Delete incident handler
async fn delete_handler<R: IncidentRepository + 'static>(
    State(service): State<ServiceState<R>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    service.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Status transition handler
async fn status_handler<R: IncidentRepository + 'static>(
    State(service): State<ServiceState<R>>,
    Path(id): Path<i64>,
    Json(body): Json<StatusUpdate>,
) -> ApiResult<Json<Incident>> {
    let status = parse_status(&body.status)?;

    let incident = service.set_status(id, status)?;
    Ok(Json(incident))
}

/// Filter by status handler
async fn by_status_handler<R: IncidentRepository + 'static>(
    State(service): State<ServiceState<R>>,
    Path(raw): Path<String>,
) -> ApiResult<Json<Vec<Incident>>> {
    let status = parse_status(&raw)?;

    let incidents = service.find_by_status(status)?;
    Ok(Json(incidents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_router_builds() {
        let service = Arc::new(IncidentService::new(MemoryStore::new()));
        let _router = incident_routes(service);
    }

    #[test]
    fn test_parse_status_rejects_unknown() {
        assert!(parse_status("OPEN").is_ok());
        let err = parse_status("BROKEN").unwrap_err();
        assert!(matches!(err, ApiError::InvalidStatus(_)));
    }
}
