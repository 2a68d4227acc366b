//! Application state.

use crate::db::{DbError, ProgressRepository, SqliteRepository};
use quiz_core::QuizSession;
use std::sync::{Arc, Mutex};

/// Global application state.
pub struct AppState {
    pub repository: Arc<Mutex<SqliteRepository>>,
    pub session: Mutex<QuizSession>,
}

impl AppState {
    pub fn new(repository: SqliteRepository) -> Self {
        Self {
            repository: Arc::new(Mutex::new(repository)),
            session: Mutex::new(QuizSession::new()),
        }
    }

    /// Build state from stored progress and settings, if any.
    pub fn restore(repository: SqliteRepository) -> Result<Self, DbError> {
        let snapshot = repository.load_state()?;
        let settings = repository.load_settings()?.unwrap_or_default();

        let mut session = QuizSession::new();
        match snapshot {
            Some(snapshot) => {
                tracing::info!(questions = snapshot.bank.len(), "restored quiz progress");
                session.restore(snapshot, settings);
            }
            None => session.set_settings(settings),
        }

        Ok(Self {
            repository: Arc::new(Mutex::new(repository)),
            session: Mutex::new(session),
        })
    }

    /// Whether the session has no questions yet.
    pub fn is_empty(&self) -> bool {
        self.session.lock().expect("session lock").bank().is_empty()
    }
}
