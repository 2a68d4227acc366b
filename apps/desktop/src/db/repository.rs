//! Repository pattern for database access.

use crate::db::error::DbError;
use crate::db::schema::{SCHEMA, SCHEMA_VERSION, SETTINGS_KEY, STATE_KEY};
use chrono::Utc;
use quiz_core::types::{QuizSettings, SessionSnapshot};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

/// Raw string storage keyed by name.
pub trait KeyValueRepository {
    fn get_value(&self, key: &str) -> Result<Option<String>>;
    fn set_value(&self, key: &str, value: &str) -> Result<()>;
}

/// Repository for quiz progress and settings.
///
/// Unreadable stored values load as `None` so a corrupt entry never blocks
/// startup.
pub trait ProgressRepository {
    fn load_state(&self) -> Result<Option<SessionSnapshot>>;
    fn save_state(&self, snapshot: &SessionSnapshot) -> Result<()>;
    fn load_settings(&self) -> Result<Option<QuizSettings>>;
    fn save_settings(&self, settings: &QuizSettings) -> Result<()>;
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(())
    }

    /// Highest schema version recorded in the database.
    pub fn schema_version(&self) -> Result<Option<i32>> {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .map_err(Into::into)
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get_value(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring unreadable stored value");
                Ok(None)
            }
        }
    }

    fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set_value(key, &raw)
    }
}

impl KeyValueRepository for SqliteRepository {
    fn get_value(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO storage (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }
}

impl ProgressRepository for SqliteRepository {
    fn load_state(&self) -> Result<Option<SessionSnapshot>> {
        self.load_json(STATE_KEY)
    }

    fn save_state(&self, snapshot: &SessionSnapshot) -> Result<()> {
        self.save_json(STATE_KEY, snapshot)
    }

    fn load_settings(&self) -> Result<Option<QuizSettings>> {
        self.load_json(SETTINGS_KEY)
    }

    fn save_settings(&self, settings: &QuizSettings) -> Result<()> {
        self.save_json(SETTINGS_KEY, settings)
    }
}
