//! SQLite-backed token storage.
//!
//! A small key/value table in a database under the per-user data directory.
//! The token survives restarts until overwritten or cleared elsewhere.

use std::path::PathBuf;
use std::sync::Mutex;

use rusqlite::Connection;

use super::StoreError;
use crate::callback::TokenStore;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tokens (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM tokens WHERE key = ?")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }
}

impl TokenStore for SqliteStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let now = chrono::Utc::now().to_rfc3339();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO tokens (key, value, updated_at) VALUES (?, ?, ?)",
            rusqlite::params![key, value, now],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("tokens.db")).unwrap();

        store.set("accessToken", "abc123").unwrap();
        assert_eq!(store.get("accessToken").unwrap().as_deref(), Some("abc123"));
        assert_eq!(store.get("other").unwrap(), None);
    }

    #[test]
    fn set_overwrites_the_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("tokens.db")).unwrap();

        store.set("accessToken", "first").unwrap();
        store.set("accessToken", "second").unwrap();
        assert_eq!(store.get("accessToken").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn value_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.db");

        {
            let store = SqliteStore::open(path.clone()).unwrap();
            store.set("accessToken", "abc123").unwrap();
        }

        let store = SqliteStore::open(path).unwrap();
        assert_eq!(store.get("accessToken").unwrap().as_deref(), Some("abc123"));
    }
}
