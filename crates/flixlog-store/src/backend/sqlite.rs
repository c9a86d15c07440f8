//! SQLite-backed key/value store.
//!
//! [`SqliteStore`] owns a [`rusqlite::Connection`] and guarantees that
//! migrations are run before any other operation. Every key maps to one row
//! of the `kv_entries` table holding the JSON-encoded value.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use super::KeyValueStore;
use crate::error::{Result, StoreError};
use crate::migrations;

/// Key/value store persisted in a single SQLite file.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the default application database.
    ///
    /// The database file is placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/flixlog/flixlog.db`
    /// - macOS:   `~/Library/Application Support/com.flixlog.flixlog/flixlog.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\flixlog\flixlog\data\flixlog.db`
    pub fn open_default() -> Result<Self> {
        Self::open_at(&Self::default_path()?)
    }

    /// Platform default database path, creating its directory.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs =
            ProjectDirs::from("com", "flixlog", "flixlog").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join("flixlog.db"))
    }

    /// Open (or create) a database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        tracing::info!(path = %path.display(), "opening database");

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Self::from_connection(conn)
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.lock().ok()?.path().map(PathBuf::from)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Backend(format!("Lock poisoned: {e}")))
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached("SELECT value FROM kv_entries WHERE key = ?1")?;

        let mut found = HashMap::new();
        for key in keys {
            let raw: Option<String> = stmt
                .query_row(params![key], |row| row.get(0))
                .optional()?;
            if let Some(raw) = raw {
                found.insert(key.to_string(), serde_json::from_str(&raw)?);
            }
        }
        Ok(found)
    }

    async fn set(&self, entries: HashMap<String, Value>) -> Result<()> {
        let mut conn = self.lock()?;
        let now = Utc::now().to_rfc3339();

        // One transaction so a multi-key write lands all-or-nothing.
        let tx = conn.transaction()?;
        for (key, value) in &entries {
            tx.execute(
                "INSERT OR REPLACE INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![key, serde_json::to_string(value)?, now],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        let conn = self.lock()?;
        for key in keys {
            conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        let store = SqliteStore::open_at(&path).expect("should open");
        assert!(store.path().is_some());
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        {
            let store = SqliteStore::open_at(&path).unwrap();
            store
                .set(HashMap::from([("friends".to_string(), json!(["f1", "f2"]))]))
                .await
                .unwrap();
        }

        let store = SqliteStore::open_at(&path).unwrap();
        let got = store.get(&["friends"]).await.unwrap();
        assert_eq!(got["friends"], json!(["f1", "f2"]));
    }

    #[tokio::test]
    async fn set_replaces_and_remove_deletes() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .set(HashMap::from([("k".to_string(), json!(1))]))
            .await
            .unwrap();
        store
            .set(HashMap::from([("k".to_string(), json!({"a": 2}))]))
            .await
            .unwrap();
        assert_eq!(store.get(&["k"]).await.unwrap()["k"], json!({"a": 2}));

        store.remove(&["k", "never-set"]).await.unwrap();
        assert!(store.get(&["k"]).await.unwrap().is_empty());
    }
}
