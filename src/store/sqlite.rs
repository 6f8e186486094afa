//! SQLite-backed incident repository.
//!
//! One `incidents` table, primary key on `id` with AUTOINCREMENT so
//! deleted ids are never handed out again. Timestamps are stored as
//! fixed-width RFC 3339 TEXT (UTC, microsecond precision) so the
//! engine's lexicographic ordering matches chronological ordering.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};

use crate::domain::{Incident, IncidentStatus};

use super::errors::{StoreError, StoreResult};
use super::IncidentRepository;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS incidents (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      description TEXT NOT NULL,
      status TEXT NOT NULL,
      created_at TEXT NOT NULL,
      updated_at TEXT NOT NULL,
      closed_at TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_incidents_status ON incidents(status);
    CREATE INDEX IF NOT EXISTS idx_incidents_created_at ON incidents(created_at);
";

const COLUMNS: &str = "id, name, description, status, created_at, updated_at, closed_at";

/// SQLite adapter behind a connection mutex
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create the incidents table and its indexes if absent
    pub fn init_schema(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Backend("connection lock poisoned".to_string()))
    }
}

fn encode_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
}

/// Decode one row, distinguishing engine failures from corrupt content
fn decode_row(row: &Row<'_>) -> rusqlite::Result<StoreResult<Incident>> {
    let id: i64 = row.get(0)?;
    let status_raw: String = row.get(3)?;
    let created_raw: String = row.get(4)?;
    let updated_raw: String = row.get(5)?;
    let closed_raw: Option<String> = row.get(6)?;
    let name: String = row.get(1)?;
    let description: String = row.get(2)?;

    let corrupt = |reason: String| StoreError::Corrupt { id, reason };

    let decoded = (|| {
        let status: IncidentStatus = status_raw
            .parse()
            .map_err(|e| corrupt(format!("{}", e)))?;
        let created_at = parse_ts(&created_raw)
            .map_err(|e| corrupt(format!("bad created_at: {}", e)))?;
        let updated_at = parse_ts(&updated_raw)
            .map_err(|e| corrupt(format!("bad updated_at: {}", e)))?;
        let closed_at = match &closed_raw {
            Some(raw) => Some(
                parse_ts(raw).map_err(|e| corrupt(format!("bad closed_at: {}", e)))?,
            ),
            None => None,
        };
        Ok(Incident {
            id,
            name,
            description,
            status,
            created_at,
            updated_at,
            closed_at,
        })
    })();

    Ok(decoded)
}

fn collect_rows(
    conn: &Connection,
    sql: &str,
    args: &[&dyn rusqlite::ToSql],
) -> StoreResult<Vec<Incident>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(args, decode_row)?;

    let mut incidents = Vec::new();
    for row in rows {
        incidents.push(row??);
    }
    Ok(incidents)
}

impl IncidentRepository for SqliteStore {
    fn insert(&self, incident: &Incident) -> StoreResult<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO incidents (name, description, status, created_at, updated_at, closed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                incident.name,
                incident.description,
                incident.status.as_str(),
                encode_ts(incident.created_at),
                encode_ts(incident.updated_at),
                incident.closed_at.map(encode_ts),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get(&self, id: i64) -> StoreResult<Option<Incident>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM incidents WHERE id = ?1", COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id], decode_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row??)),
            None => Ok(None),
        }
    }

    fn all(&self) -> StoreResult<Vec<Incident>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM incidents ORDER BY id", COLUMNS);
        collect_rows(&conn, &sql, &[])
    }

    fn latest(&self, limit: usize) -> StoreResult<Vec<Incident>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM incidents ORDER BY created_at DESC, id DESC LIMIT ?1",
            COLUMNS
        );
        collect_rows(&conn, &sql, &[&(limit as i64)])
    }

    fn by_status(&self, status: IncidentStatus) -> StoreResult<Vec<Incident>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM incidents WHERE status = ?1 ORDER BY id",
            COLUMNS
        );
        collect_rows(&conn, &sql, &[&status.as_str()])
    }

    fn update(&self, incident: &Incident) -> StoreResult<bool> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE incidents
             SET name = ?1, description = ?2, status = ?3, updated_at = ?4, closed_at = ?5
             WHERE id = ?6",
            params![
                incident.name,
                incident.description,
                incident.status.as_str(),
                encode_ts(incident.updated_at),
                incident.closed_at.map(encode_ts),
                incident.id,
            ],
        )?;
        Ok(changed > 0)
    }

    fn delete(&self, id: i64) -> StoreResult<bool> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM incidents WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_encoding_is_fixed_width() {
        let ts: DateTime<Utc> = "2026-08-07T10:00:00Z".parse().unwrap();
        assert_eq!(encode_ts(ts), "2026-08-07T10:00:00.000000Z");

        let sub: DateTime<Utc> = "2026-08-07T10:00:00.123456Z".parse().unwrap();
        assert_eq!(encode_ts(sub), "2026-08-07T10:00:00.123456Z");
    }

    #[test]
    fn test_timestamp_round_trip() {
        let ts: DateTime<Utc> = "2026-08-07T10:00:00.123456Z".parse().unwrap();
        assert_eq!(parse_ts(&encode_ts(ts)).unwrap(), ts);
    }
}
