//! Commands exposed to the front end.

pub mod bank;
pub mod settings;
pub mod study;

pub use bank::{
    export_json, export_json_file, export_raw, import_json, import_json_file, import_raw,
    CommandError, ImportResult,
};
pub use settings::{get_settings, save_settings};
pub use study::{
    choose_option, get_view, next_question, press_key, previous_question, reset_progress,
    reshuffle, set_query, toggle_reveal, KeyResult, QuestionView,
};

use crate::db::ProgressRepository;
use crate::state::AppState;
use quiz_core::QuizSession;

/// Save session progress after a mutation.
fn persist(state: &AppState, session: &QuizSession) -> Result<(), CommandError> {
    let repo = state.repository.lock().expect("repository lock");
    repo.save_state(&session.snapshot()).map_err(Into::into)
}
