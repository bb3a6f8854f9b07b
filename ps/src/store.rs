//! Core preference store implementation

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persisted per-user preference record
///
/// Created on first save for a user, fully overwritten on every subsequent
/// save. Deletion is an external concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    /// User identifier (primary key)
    pub user_id: String,
    /// Latest saved preferences text
    pub preferences: String,
    /// Latest saved hobbies text
    pub hobbies: String,
    /// Unix timestamp (seconds) of the last save
    pub updated_at: i64,
}

/// Keyed get/put contract for preference records
///
/// Implementations must guarantee per-key write serialization so the store
/// never observes a torn record, while unrelated keys proceed without
/// blocking each other.
pub trait PreferenceStore: Send + Sync {
    /// Load the record for a user, `Ok(None)` if none was ever saved
    fn load(&self, user_id: &str) -> Result<Option<PreferenceRecord>, StoreError>;

    /// Save a record for a user, overwriting any prior record in full
    fn save(&self, user_id: &str, preferences: &str, hobbies: &str) -> Result<(), StoreError>;
}

/// SQLite-backed preference store
///
/// Opens a short-lived connection per operation so the handle stays
/// `Send + Sync` without a global connection lock. Same-key saves serialize
/// through a per-user mutex; the upsert statement itself is atomic.
pub struct SqliteStore {
    db_path: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SqliteStore {
    /// Open or create a store in the given directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let db_path = dir.join(crate::DB_FILE);
        debug!(?db_path, "SqliteStore::open: called");

        let conn = Self::connect(&db_path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS preferences (
                user_id     TEXT PRIMARY KEY,
                preferences TEXT NOT NULL,
                hobbies     TEXT NOT NULL,
                updated_at  INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(Self {
            db_path,
            locks: Mutex::new(HashMap::new()),
        })
    }

    fn connect(db_path: &Path) -> Result<Connection, StoreError> {
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }

    /// Get the write lock for one user, creating it on first use
    fn key_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(user_id.to_string()).or_default().clone()
    }
}

impl PreferenceStore for SqliteStore {
    fn load(&self, user_id: &str) -> Result<Option<PreferenceRecord>, StoreError> {
        debug!(%user_id, "SqliteStore::load: called");
        let conn = Self::connect(&self.db_path)?;

        let record = conn
            .query_row(
                "SELECT user_id, preferences, hobbies, updated_at
                 FROM preferences WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(PreferenceRecord {
                        user_id: row.get(0)?,
                        preferences: row.get(1)?,
                        hobbies: row.get(2)?,
                        updated_at: row.get(3)?,
                    })
                },
            )
            .optional()?;

        debug!(%user_id, found = record.is_some(), "SqliteStore::load: done");
        Ok(record)
    }

    fn save(&self, user_id: &str, preferences: &str, hobbies: &str) -> Result<(), StoreError> {
        debug!(%user_id, "SqliteStore::save: called");
        let lock = self.key_lock(user_id);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let conn = Self::connect(&self.db_path)?;
        let updated_at = chrono::Utc::now().timestamp();

        conn.execute(
            "INSERT INTO preferences (user_id, preferences, hobbies, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                 preferences = excluded.preferences,
                 hobbies = excluded.hobbies,
                 updated_at = excluded.updated_at",
            params![user_id, preferences, hobbies, updated_at],
        )?;

        debug!(%user_id, "SqliteStore::save: done");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, SqliteStore) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = SqliteStore::open(dir.path()).expect("Failed to open store");
        (dir, store)
    }

    #[test]
    fn test_load_missing_user_returns_none() {
        let (_dir, store) = open_store();

        let record = store.load("nobody@example.com").expect("load should not fail");
        assert!(record.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, store) = open_store();

        store.save("a@b.com", "mid-range", "photography").expect("save failed");

        let record = store.load("a@b.com").expect("load failed").expect("record missing");
        assert_eq!(record.user_id, "a@b.com");
        assert_eq!(record.preferences, "mid-range");
        assert_eq!(record.hobbies, "photography");
        assert!(record.updated_at > 0);
    }

    #[test]
    fn test_overwrite_replaces_record_in_full() {
        let (_dir, store) = open_store();

        store.save("a@b.com", "luxury", "diving").expect("first save failed");
        store.save("a@b.com", "budget", "museums").expect("second save failed");

        let record = store.load("a@b.com").expect("load failed").expect("record missing");
        // Never a merge of the two payloads
        assert_eq!(record.preferences, "budget");
        assert_eq!(record.hobbies, "museums");
    }

    #[test]
    fn test_save_is_idempotent() {
        let (_dir, store) = open_store();

        store.save("a@b.com", "mid-range", "hiking").expect("first save failed");
        store.save("a@b.com", "mid-range", "hiking").expect("second save failed");

        let record = store.load("a@b.com").expect("load failed").expect("record missing");
        assert_eq!(record.preferences, "mid-range");
        assert_eq!(record.hobbies, "hiking");
    }

    #[test]
    fn test_users_do_not_collide() {
        let (_dir, store) = open_store();

        store.save("a@b.com", "luxury", "diving").expect("save a failed");
        store.save("c@d.com", "budget", "museums").expect("save c failed");

        let a = store.load("a@b.com").expect("load failed").expect("record missing");
        let c = store.load("c@d.com").expect("load failed").expect("record missing");
        assert_eq!(a.preferences, "luxury");
        assert_eq!(c.preferences, "budget");
    }

    #[test]
    fn test_concurrent_saves_leave_one_intact_payload() {
        let (_dir, store) = open_store();
        let store = Arc::new(store);

        let payloads = [("luxury", "diving"), ("budget", "museums")];
        let handles: Vec<_> = payloads
            .iter()
            .map(|&(prefs, hobbies)| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..20 {
                        store.save("a@b.com", prefs, hobbies).expect("save failed");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("writer thread panicked");
        }

        // Whichever save serialized last, the record is one payload, never torn
        let record = store.load("a@b.com").expect("load failed").expect("record missing");
        let pair = (record.preferences.as_str(), record.hobbies.as_str());
        assert!(payloads.contains(&pair), "torn record: {:?}", pair);
    }
}
