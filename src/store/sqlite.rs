use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{NotewatchError, Result};
use crate::domain::SourceState;
use crate::store::StateStore;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|e| NotewatchError::Other(format!("Migration failed: {}", e)))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            NotewatchError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }

    fn state_from_row(row: &Row<'_>) -> rusqlite::Result<SourceState> {
        Ok(SourceState {
            source_id: row.get(0)?,
            last_fingerprint: row.get(1)?,
            updated_at: row
                .get::<_, String>(2)
                .ok()
                .and_then(|s| Self::parse_datetime(&s))
                .unwrap_or_else(Utc::now),
        })
    }
}

impl StateStore for SqliteStore {
    fn get_state(&self, source_id: &str) -> Result<Option<SourceState>> {
        let conn = self.lock()?;

        let result = conn
            .query_row(
                "SELECT source_id, last_fingerprint, updated_at
                 FROM source_state WHERE source_id = ?1",
                params![source_id],
                Self::state_from_row,
            )
            .optional()?;

        Ok(result)
    }

    fn set_fingerprint(&self, source_id: &str, fingerprint: &str) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO source_state (source_id, last_fingerprint, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(source_id) DO UPDATE SET last_fingerprint = ?2, updated_at = ?3",
            params![source_id, fingerprint, Utc::now().to_rfc3339()],
        )?;

        Ok(())
    }

    fn clear(&self, source_id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM source_state WHERE source_id = ?1",
            params![source_id],
        )?;
        Ok(removed > 0)
    }

    fn all_states(&self) -> Result<Vec<SourceState>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT source_id, last_fingerprint, updated_at
             FROM source_state ORDER BY source_id",
        )?;

        let states = stmt
            .query_map([], Self::state_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_state_is_none() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get_state("claude").unwrap().is_none());
        assert!(store.get_fingerprint("claude").unwrap().is_none());
    }

    #[test]
    fn test_set_and_overwrite_fingerprint() {
        let store = SqliteStore::in_memory().unwrap();

        store.set_fingerprint("claude", "aaa").unwrap();
        assert_eq!(store.get_fingerprint("claude").unwrap(), Some("aaa".into()));

        store.set_fingerprint("claude", "bbb").unwrap();
        let state = store.get_state("claude").unwrap().unwrap();
        assert_eq!(state.source_id, "claude");
        assert_eq!(state.last_fingerprint, "bbb");
        assert_eq!(store.all_states().unwrap().len(), 1);
    }

    #[test]
    fn test_sources_are_independent() {
        let store = SqliteStore::in_memory().unwrap();
        store.set_fingerprint("gemini", "g1").unwrap();
        store.set_fingerprint("chatgpt", "c1").unwrap();

        let states = store.all_states().unwrap();
        let ids: Vec<_> = states.iter().map(|s| s.source_id.as_str()).collect();
        assert_eq!(ids, vec!["chatgpt", "gemini"]);
        assert_eq!(store.get_fingerprint("gemini").unwrap(), Some("g1".into()));
    }

    #[test]
    fn test_clear() {
        let store = SqliteStore::in_memory().unwrap();
        store.set_fingerprint("gemini", "g1").unwrap();

        assert!(store.clear("gemini").unwrap());
        assert!(!store.clear("gemini").unwrap());
        assert!(store.get_state("gemini").unwrap().is_none());
    }

    #[test]
    fn test_state_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notewatch.db");

        {
            let store = SqliteStore::new(&path).unwrap();
            store.set_fingerprint("claude", "abc").unwrap();
        }

        let store = SqliteStore::new(&path).unwrap();
        assert_eq!(store.get_fingerprint("claude").unwrap(), Some("abc".into()));
    }
}
