//! In-memory incident repository.
//!
//! Mirrors the SQLite adapter's contract, including id non-reuse: the
//! id counter only ever moves forward, so a deleted id is never handed
//! out again.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::domain::{Incident, IncidentStatus};

use super::errors::{StoreError, StoreResult};
use super::IncidentRepository;

/// Volatile table for tests and `serve --memory`
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

struct Inner {
    rows: BTreeMap<i64, Incident>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("table lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IncidentRepository for MemoryStore {
    fn insert(&self, incident: &Incident) -> StoreResult<i64> {
        let mut inner = self.lock()?;
        let id = inner.next_id;
        inner.next_id += 1;

        let mut row = incident.clone();
        row.id = id;
        inner.rows.insert(id, row);
        Ok(id)
    }

    fn get(&self, id: i64) -> StoreResult<Option<Incident>> {
        let inner = self.lock()?;
        Ok(inner.rows.get(&id).cloned())
    }

    fn all(&self) -> StoreResult<Vec<Incident>> {
        let inner = self.lock()?;
        Ok(inner.rows.values().cloned().collect())
    }

    fn latest(&self, limit: usize) -> StoreResult<Vec<Incident>> {
        let inner = self.lock()?;
        let mut rows: Vec<Incident> = inner.rows.values().cloned().collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        rows.truncate(limit);
        Ok(rows)
    }

    fn by_status(&self, status: IncidentStatus) -> StoreResult<Vec<Incident>> {
        let inner = self.lock()?;
        Ok(inner
            .rows
            .values()
            .filter(|row| row.status == status)
            .cloned()
            .collect())
    }

    fn update(&self, incident: &Incident) -> StoreResult<bool> {
        let mut inner = self.lock()?;
        match inner.rows.get_mut(&incident.id) {
            Some(row) => {
                // created_at is immutable; keep the stored value
                let created_at = row.created_at;
                *row = incident.clone();
                row.created_at = created_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut inner = self.lock()?;
        Ok(inner.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(name: &str) -> Incident {
        let now = Utc::now();
        Incident {
            id: 0,
            name: name.to_string(),
            description: "something broke badly".to_string(),
            status: IncidentStatus::Open,
            created_at: now,
            updated_at: now,
            closed_at: None,
        }
    }

    #[test]
    fn test_ids_are_never_reused() {
        let store = MemoryStore::new();
        let first = store.insert(&sample("first")).unwrap();
        let second = store.insert(&sample("second")).unwrap();
        assert!(second > first);

        assert!(store.delete(second).unwrap());
        let third = store.insert(&sample("third")).unwrap();
        assert!(third > second);
    }

    #[test]
    fn test_update_preserves_created_at() {
        let store = MemoryStore::new();
        let id = store.insert(&sample("first")).unwrap();
        let stored = store.get(id).unwrap().unwrap();

        let mut changed = stored.clone();
        changed.name = "renamed incident".to_string();
        changed.created_at = Utc::now();
        assert!(store.update(&changed).unwrap());

        let after = store.get(id).unwrap().unwrap();
        assert_eq!(after.name, "renamed incident");
        assert_eq!(after.created_at, stored.created_at);
    }

    #[test]
    fn test_update_absent_row_is_false() {
        let store = MemoryStore::new();
        let mut row = sample("ghost");
        row.id = 42;
        assert!(!store.update(&row).unwrap());
        assert!(!store.delete(42).unwrap());
    }
}
