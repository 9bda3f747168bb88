//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The session context and the dashboard call store methods; they
//! never execute SQL directly.

use crate::{
    auth::UserSession,
    error::DashResult,
    event::{DashboardEvent, EventLogEntry},
    types::Generation,
};
use rusqlite::{params, Connection, OptionalExtension};

pub struct DashStore {
    conn: Connection,
}

impl DashStore {
    /// Open (or create) the dashboard database at `path`.
    pub fn open(path: &str) -> DashResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: readers do not block the event log writer.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DashResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DashResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Session ────────────────────────────────────────────────

    pub fn save_session(&self, user: &UserSession) -> DashResult<()> {
        let json = serde_json::to_string(user)?;
        self.conn.execute(
            "INSERT INTO session (slot, user_json, signed_in_at) VALUES ('current', ?1, ?2)
             ON CONFLICT(slot) DO UPDATE SET user_json = excluded.user_json,
                                             signed_in_at = excluded.signed_in_at",
            params![json, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn load_session(&self) -> DashResult<Option<UserSession>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT user_json FROM session WHERE slot = 'current'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        match json {
            Some(j) => Ok(Some(serde_json::from_str(&j)?)),
            None => Ok(None),
        }
    }

    pub fn clear_session(&self) -> DashResult<()> {
        self.conn
            .execute("DELETE FROM session WHERE slot = 'current'", [])?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, generation: Generation, event: &DashboardEvent) -> DashResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (generation, event_type, payload, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                generation as i64,
                event.type_name(),
                serde_json::to_string(event)?,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn events_of_type(&self, event_type: &str) -> DashResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, generation, event_type, payload, created_at
             FROM event_log WHERE event_type = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![event_type], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn all_events(&self) -> DashResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, generation, event_type, payload, created_at
             FROM event_log ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map([], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, event_type: &str) -> DashResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE event_type = ?1",
            params![event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventLogEntry> {
    Ok(EventLogEntry {
        id: Some(row.get(0)?),
        generation: row.get::<_, i64>(1)? as u64,
        event_type: row.get(2)?,
        payload: row.get(3)?,
        created_at: row.get(4)?,
    })
}
