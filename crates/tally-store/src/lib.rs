//! Persistence for the tally time tracker.
//!
//! Durable key-value storage backed by `rusqlite`: a single
//! `state(key, value)` table holding two keyed records, the serialized
//! entry list (`timeEntries`) and the hourly rate (`hourlyRate`).
//!
//! # Guarantees
//!
//! The host saves after every ledger or rate mutation, each save runs in
//! one transaction, and last write wins. There is no versioning or
//! migration of the stored shape.
//!
//! Loading is lenient: a missing or unparseable record yields the empty
//! ledger and [`Rate::DEFAULT`] with a warning rather than an error, so
//! a corrupt store never prevents startup. Only underlying SQLite
//! failures surface as [`StoreError`].
//!
//! # Thread Safety
//!
//! [`Store`] wraps a `rusqlite::Connection`, which is `Send` but not
//! `Sync`; the host keeps it on its single event-loop thread.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use tally_core::{Rate, TimeEntry};

/// Key under which the serialized entry array is stored.
const KEY_ENTRIES: &str = "timeEntries";

/// Key under which the hourly rate is stored.
const KEY_RATE: &str = "hourlyRate";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to serialize state for writing.
    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable key-value store for ledger state.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens a store at the given path, creating it if necessary.
    ///
    /// The schema is initialized on first open.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Opens an in-memory store.
    ///
    /// Useful for testing. The store is destroyed when the connection
    /// closes.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Initializes the schema. Idempotent.
    fn init(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Writes the full ledger state in one transaction.
    pub fn save(&mut self, entries: &[TimeEntry], rate: Rate) -> Result<(), StoreError> {
        let entries_json = serde_json::to_string(entries).map_err(|source| {
            StoreError::Serialize {
                key: KEY_ENTRIES,
                source,
            }
        })?;
        let rate_json = serde_json::to_string(&rate).map_err(|source| StoreError::Serialize {
            key: KEY_RATE,
            source,
        })?;

        let tx = self.conn.transaction()?;
        {
            let mut stmt =
                tx.prepare("INSERT OR REPLACE INTO state (key, value) VALUES (?, ?)")?;
            stmt.execute(params![KEY_ENTRIES, entries_json])?;
            stmt.execute(params![KEY_RATE, rate_json])?;
        }
        tx.commit()?;
        tracing::debug!(entries = entries.len(), %rate, "state saved");
        Ok(())
    }

    /// Loads the persisted ledger state.
    ///
    /// Missing or corrupt records fall back to the empty entry list and
    /// [`Rate::DEFAULT`]; only database failures are errors.
    pub fn load(&self) -> Result<(Vec<TimeEntry>, Rate), StoreError> {
        let entries = match self.read_value(KEY_ENTRIES)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(error) => {
                    tracing::warn!(%error, "stored entries unreadable, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let rate = match self.read_value(KEY_RATE)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(rate) => rate,
                Err(error) => {
                    tracing::warn!(%error, "stored rate unreadable, using default");
                    Rate::DEFAULT
                }
            },
            None => Rate::DEFAULT,
        };

        Ok((entries, rate))
    }

    fn read_value(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM state WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }
}
