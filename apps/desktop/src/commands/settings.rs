//! Settings-related commands.

use crate::db::ProgressRepository;
use crate::state::AppState;
use quiz_core::QuizSettings;

use super::bank::CommandError;

/// Get the study settings.
pub async fn get_settings(state: &AppState) -> Result<QuizSettings, CommandError> {
    let session = state.session.lock().expect("session lock");
    Ok(session.settings())
}

/// Apply and store the study settings.
pub async fn save_settings(
    settings: QuizSettings,
    state: &AppState,
) -> Result<QuizSettings, CommandError> {
    let mut session = state.session.lock().expect("session lock");
    session.set_settings(settings);

    let repo = state.repository.lock().expect("repository lock");
    repo.save_settings(&settings)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::state;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn saved_settings_are_applied_and_stored() {
        let state = state();
        let settings = QuizSettings {
            only_wrong: true,
            compact: true,
            ..QuizSettings::default()
        };
        save_settings(settings, &state).await.unwrap();

        assert_eq!(get_settings(&state).await.unwrap(), settings);
        let stored = state.repository.lock().unwrap().load_settings().unwrap();
        assert_eq!(stored, Some(settings));
    }
}
