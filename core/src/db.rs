use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::state::RootState;
use crate::store::StateAdapter;

const STATE_KEY: &str = "root";

/// Stores the whole state document as JSON in a single key-value row.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = SqliteStore { conn };
        db.migrate()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = SqliteStore { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS app_state (
                    key TEXT PRIMARY KEY NOT NULL,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read '{key}'"))
    }

    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO app_state (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }
}

impl StateAdapter for SqliteStore {
    fn load_state(&mut self) -> Result<Option<RootState>> {
        let Some(raw) = self.get_value(STATE_KEY)? else {
            return Ok(None);
        };
        let state = serde_json::from_str(&raw).context("Stored state is not valid JSON")?;
        debug!("state loaded from database");
        Ok(Some(state))
    }

    fn save_state(&mut self, state: &RootState) -> Result<()> {
        let raw = serde_json::to_string(state).context("Failed to serialize state")?;
        self.set_value(STATE_KEY, &raw)?;
        debug!(bytes = raw.len(), "state saved to database");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::DateKey;
    use crate::engine::EngineConfig;
    use crate::service::DaybookService;

    #[test]
    fn test_migrate_sets_version() {
        let db = SqliteStore::open_in_memory().unwrap();
        let version: i64 = db
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn test_values_set_get_overwrite() {
        let db = SqliteStore::open_in_memory().unwrap();
        assert!(db.get_value("k").unwrap().is_none());

        db.set_value("k", "one").unwrap();
        db.set_value("k", "two").unwrap();
        db.set_value("other", "three").unwrap();
        assert_eq!(db.get_value("k").unwrap().as_deref(), Some("two"));
        assert_eq!(db.get_value("other").unwrap().as_deref(), Some("three"));
    }

    #[test]
    fn test_reset_overwrites_stored_document() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut svc = DaybookService::load(store, EngineConfig::default()).unwrap();
        let day = DateKey::from_ymd(2024, 6, 15).unwrap();
        svc.add_weigh_in(day, 80.5).unwrap();

        svc.reset().unwrap();
        let raw = svc.store().get_value(STATE_KEY).unwrap().unwrap();
        let stored: RootState = serde_json::from_str(&raw).unwrap();
        assert!(stored.weigh_ins.is_empty());
        assert!(stored.days.is_empty());
    }

    #[test]
    fn test_empty_database_is_first_run() {
        let mut db = SqliteStore::open_in_memory().unwrap();
        assert!(db.load_state().unwrap().is_none());
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daybook.db");

        let mut state = RootState::default();
        state.selected_date = DateKey::from_ymd(2024, 2, 29).unwrap();
        state.settings.weigh_in_weekday = 3;
        {
            let mut db = SqliteStore::open(&path).unwrap();
            db.save_state(&state).unwrap();
        }

        let mut db = SqliteStore::open(&path).unwrap();
        let loaded = db.load_state().unwrap().unwrap();
        assert_eq!(loaded.selected_date, state.selected_date);
        assert_eq!(loaded.settings.weigh_in_weekday, 3);
    }

    #[test]
    fn test_corrupt_row_is_error() {
        let mut db = SqliteStore::open_in_memory().unwrap();
        db.set_value(STATE_KEY, "not json").unwrap();
        assert!(db.load_state().is_err());
    }
}
