//! Relational backend: one `schedules` table, batches inside real
//! transactions.

use std::sync::Mutex;

use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::types::ScheduleEntry;
use crate::ScheduleStore;

const SELECT_COLS: &str = "id, name, date";

/// Initialise the schedules schema in `conn`.
///
/// Safe to call on every startup — uses `IF NOT EXISTS` throughout. Dates
/// are stored as ISO-8601 text so lexicographic order is calendar order.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schedules (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            name  TEXT NOT NULL UNIQUE,
            date  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_schedules_date ON schedules (date);",
    )?;
    Ok(())
}

/// SQLite-backed schedule store.
///
/// Wraps a single connection in a `Mutex`; requests serialize at the
/// connection. For this workload (one small table, short statements) a
/// Mutex is sufficient — contention shows up as latency, not errors.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file at `path` and run migrations.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl ScheduleStore for SqliteStore {
    fn list_all(&self) -> Result<Vec<ScheduleEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLS} FROM schedules ORDER BY date, id"
        ))?;
        let rows = stmt.query_map([], row_to_entry)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StoreError::from)
    }

    fn get(&self, id: i64) -> Result<Option<ScheduleEntry>> {
        let conn = self.conn.lock().unwrap();
        match conn.query_row(
            &format!("SELECT {SELECT_COLS} FROM schedules WHERE id = ?1"),
            [id],
            row_to_entry,
        ) {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    fn max_date(&self) -> Result<Option<NaiveDate>> {
        let conn = self.conn.lock().unwrap();
        let max: Option<String> =
            conn.query_row("SELECT MAX(date) FROM schedules", [], |row| row.get(0))?;
        Ok(max.map(|s| parse_iso_date(&s)).transpose()?)
    }

    fn insert(&self, name: &str, date: NaiveDate) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        match conn.execute(
            "INSERT INTO schedules (name, date) VALUES (?1, ?2)",
            rusqlite::params![name, date.to_string()],
        ) {
            Ok(_) => {
                let id = conn.last_insert_rowid();
                debug!(id, name, %date, "entry inserted");
                Ok(id)
            }
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateName {
                name: name.to_string(),
            }),
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    fn update_date(&self, id: i64, date: NaiveDate) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "UPDATE schedules SET date = ?1 WHERE id = ?2",
            rusqlite::params![date.to_string(), id],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }

    fn delete(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute("DELETE FROM schedules WHERE id = ?1", [id])?;
        if n == 0 {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }

    fn select_past_due(&self, today: NaiveDate) -> Result<Vec<ScheduleEntry>> {
        self.select_where("date < ?1", today)
    }

    fn select_after(&self, date: NaiveDate) -> Result<Vec<ScheduleEntry>> {
        self.select_where("date > ?1", date)
    }

    fn apply_batch(&self, updates: &[(i64, NaiveDate)], delete_id: Option<i64>) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        for &(id, date) in updates {
            let n = tx.execute(
                "UPDATE schedules SET date = ?1 WHERE id = ?2",
                rusqlite::params![date.to_string(), id],
            )?;
            if n == 0 {
                // Dropping the uncommitted transaction rolls everything back.
                return Err(StoreError::NotFound { id });
            }
        }
        if let Some(id) = delete_id {
            let n = tx.execute("DELETE FROM schedules WHERE id = ?1", [id])?;
            if n == 0 {
                return Err(StoreError::NotFound { id });
            }
        }
        tx.commit()?;
        debug!(
            updates = updates.len(),
            deleted = delete_id.is_some(),
            "batch committed"
        );
        Ok(())
    }
}

impl SqliteStore {
    fn select_where(&self, clause: &str, bound: NaiveDate) -> Result<Vec<ScheduleEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLS} FROM schedules WHERE {clause} ORDER BY date, id"
        ))?;
        let rows = stmt.query_map([bound.to_string()], row_to_entry)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StoreError::from)
    }
}

/// Map a SELECT row (column order from SELECT_COLS) to a ScheduleEntry.
fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScheduleEntry> {
    let date_str: String = row.get(2)?;
    let date = parse_iso_date(&date_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(ScheduleEntry {
        id: row.get(0)?,
        name: row.get(1)?,
        date,
    })
}

fn parse_iso_date(s: &str) -> std::result::Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
