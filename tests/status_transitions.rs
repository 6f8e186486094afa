//! Business-rule invariants for the incident lifecycle.
//!
//! Exercised at the service layer so timestamp semantics stay visible:
//! the service, not the storage engine, stamps every timestamp.

use incidentd::domain::{IncidentDraft, IncidentStatus};
use incidentd::service::{IncidentService, ServiceError, LATEST_LIMIT};
use incidentd::store::MemoryStore;

fn service() -> IncidentService<MemoryStore> {
    IncidentService::new(MemoryStore::new())
}

fn draft(name: &str) -> IncidentDraft {
    IncidentDraft {
        name: name.to_string(),
        description: "Database unreachable since 10:00".to_string(),
    }
}

#[test]
fn test_new_incident_invariants() {
    let service = service();
    let incident = service.create(draft("Server down")).unwrap();

    assert_eq!(incident.status, IncidentStatus::Open);
    assert_eq!(incident.created_at, incident.updated_at);
    assert!(incident.closed_at.is_none());
}

#[test]
fn test_closed_at_set_iff_closed() {
    let service = service();
    let id = service.create(draft("Server down")).unwrap().id;

    // Statuses other than CLOSED never stamp a closing time
    for status in [IncidentStatus::InProgress, IncidentStatus::Resolved] {
        let incident = service.set_status(id, status).unwrap();
        assert_eq!(incident.status, status);
        assert!(incident.closed_at.is_none());
    }

    let closed = service.set_status(id, IncidentStatus::Closed).unwrap();
    assert!(closed.closed_at.is_some());
    assert!(closed.updated_at >= closed.created_at);
    // The closing stamp is the same instant as the mutation stamp
    assert_eq!(closed.closed_at.unwrap(), closed.updated_at);

    // Any transition away from CLOSED clears the stamp
    let reopened = service.set_status(id, IncidentStatus::InProgress).unwrap();
    assert!(reopened.closed_at.is_none());
}

#[test]
fn test_reclosing_restamps() {
    let service = service();
    let id = service.create(draft("Server down")).unwrap().id;

    let first = service.set_status(id, IncidentStatus::Closed).unwrap();
    service.set_status(id, IncidentStatus::Open).unwrap();
    let second = service.set_status(id, IncidentStatus::Closed).unwrap();

    assert!(second.closed_at.unwrap() >= first.closed_at.unwrap());
}

#[test]
fn test_update_touches_only_draft_fields() {
    let service = service();
    let created = service.create(draft("Server down")).unwrap();

    let updated = service
        .update(created.id, draft("Server flapping"))
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.status, created.status);
    assert_eq!(updated.name, "Server flapping");
    assert!(updated.updated_at >= created.updated_at);
}

#[test]
fn test_status_operations_on_missing_id() {
    let service = service();

    let err = service.set_status(7, IncidentStatus::Closed).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(7)));

    let err = service.update(7, draft("Anything else")).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(7)));
}

#[test]
fn test_find_by_status_tracks_transitions() {
    let service = service();
    let a = service.create(draft("First incident")).unwrap().id;
    let b = service.create(draft("Second incident")).unwrap().id;

    service.set_status(a, IncidentStatus::Resolved).unwrap();

    let resolved = service.find_by_status(IncidentStatus::Resolved).unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].id, a);

    let open = service.find_by_status(IncidentStatus::Open).unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, b);
}

#[test]
fn test_latest_is_one_capped_page() {
    let service = service();
    for i in 0..(LATEST_LIMIT + 5) {
        service.create(draft(&format!("Incident number {}", i))).unwrap();
    }

    let latest = service.latest().unwrap();
    assert_eq!(latest.len(), LATEST_LIMIT);

    // Newest first
    for pair in latest.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
    assert_eq!(latest[0].id as usize, LATEST_LIMIT + 5);
}
