//! PrefStore - per-user travel preference persistence
//!
//! Stores one preference record per user identifier in a SQLite database.
//! Saves overwrite the whole record (last write wins, no field-level merge);
//! loading a never-saved user is an explicit "no record" result, not an error.
//!
//! The store is the only entity whose lifetime crosses pipeline runs, so it
//! is the one place that has to care about concurrency: saves for the same
//! user serialize through a per-key lock, saves for different users proceed
//! without contention.

mod store;

pub use store::{PreferenceRecord, PreferenceStore, SqliteStore, StoreError};

/// Database filename created inside the store directory
pub const DB_FILE: &str = "preferences.db";
