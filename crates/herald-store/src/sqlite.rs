use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::Result;
use crate::store::PluginStore;

/// SQLite-backed [`PluginStore`].
///
/// Thread-safe: the connection lives behind a `Mutex`, so one store can be
/// shared across the registry and any number of evaluation passes.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and initialise the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(dir) = path.as_ref().parent() {
            std::fs::create_dir_all(dir)?;
        }
        let conn = Connection::open(path)?;
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a fresh in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl PluginStore for SqliteStore {
    fn get(&self, namespace: &str, account_id: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let blob = conn
            .query_row(
                "SELECT blob FROM plugin_data WHERE namespace = ?1 AND account_id = ?2",
                [namespace, account_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(blob)
    }

    fn set(&self, namespace: &str, account_id: &str, blob: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO plugin_data (namespace, account_id, blob, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (namespace, account_id)
             DO UPDATE SET blob = excluded.blob, updated_at = excluded.updated_at",
            rusqlite::params![namespace, account_id, blob, now],
        )?;
        debug!(namespace, account_id, bytes = blob.len(), "plugin data written");
        Ok(())
    }
}

/// Initialise the plugin-data schema in `conn` (idempotent).
fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS plugin_data (
            namespace   TEXT NOT NULL,
            account_id  TEXT NOT NULL,
            blob        TEXT NOT NULL,   -- opaque, owned by the plugin
            updated_at  TEXT NOT NULL,   -- ISO-8601
            PRIMARY KEY (namespace, account_id)
        ) STRICT;
        ",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_row_reads_as_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get("ns", "acct").unwrap().is_none());
    }

    #[test]
    fn upsert_round_trips() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("ns", "acct", "first").unwrap();
        store.set("ns", "acct", "second").unwrap();
        assert_eq!(store.get("ns", "acct").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn accounts_are_isolated() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("ns", "alice", "a").unwrap();
        store.set("ns", "bob", "b").unwrap();
        assert_eq!(store.get("ns", "alice").unwrap().as_deref(), Some("a"));
        assert_eq!(store.get("ns", "bob").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        init_db(&conn).unwrap();
    }
}
