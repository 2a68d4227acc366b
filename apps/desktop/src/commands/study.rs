//! Study-related commands.

use crate::state::AppState;
use quiz_core::{
    AnswerOutcome, OptionKey, QuestionId, QuestionOption, QuizSession, QuizSettings, SessionStats,
    Shortcut,
};

use super::bank::CommandError;
use super::persist;

/// Everything the front end needs to draw the current question.
#[derive(Debug, Clone, serde::Serialize)]
pub struct QuestionView {
    pub id: Option<QuestionId>,
    pub text: Option<String>,
    /// Options in display order.
    pub options: Vec<QuestionOption>,
    pub selected: Option<OptionKey>,
    pub revealed: bool,
    /// Correct answer, only once revealed.
    pub answer: Option<OptionKey>,
    pub stats: SessionStats,
    pub settings: QuizSettings,
    pub query: String,
}

impl QuestionView {
    fn from_session(session: &QuizSession) -> Self {
        let current = session.current();
        Self {
            id: current.map(|q| q.id.clone()),
            text: current.map(|q| q.text.clone()),
            options: session.current_options().to_vec(),
            selected: session.selected(),
            revealed: session.revealed(),
            answer: current.filter(|_| session.revealed()).map(|q| q.answer),
            stats: session.stats(),
            settings: session.settings(),
            query: session.query().to_string(),
        }
    }
}

/// Result of a key press.
#[derive(Debug, Clone, serde::Serialize)]
pub struct KeyResult {
    pub outcome: Option<AnswerOutcome>,
    /// The front end should focus its search box.
    pub focus_search: bool,
    pub view: QuestionView,
}

/// Get the current question view.
pub async fn get_view(state: &AppState) -> Result<QuestionView, CommandError> {
    let session = state.session.lock().expect("session lock");
    Ok(QuestionView::from_session(&session))
}

/// Answer the current question.
pub async fn choose_option(
    key: OptionKey,
    state: &AppState,
) -> Result<Option<AnswerOutcome>, CommandError> {
    let mut session = state.session.lock().expect("session lock");
    let outcome = session.choose(key);
    if outcome.is_some() {
        persist(state, &session)?;
    }
    Ok(outcome)
}

/// Handle a keyboard shortcut; unknown keys are ignored.
pub async fn press_key(key: char, state: &AppState) -> Result<KeyResult, CommandError> {
    let mut session = state.session.lock().expect("session lock");
    let shortcut = Shortcut::from_key(key);

    let outcome = match shortcut {
        Some(shortcut) => session.press(shortcut),
        None => None,
    };
    if matches!(shortcut, Some(Shortcut::Choose(_) | Shortcut::Next)) {
        persist(state, &session)?;
    }

    Ok(KeyResult {
        outcome,
        focus_search: shortcut == Some(Shortcut::FocusSearch),
        view: QuestionView::from_session(&session),
    })
}

/// Go to the next question.
pub async fn next_question(state: &AppState) -> Result<QuestionView, CommandError> {
    mutate(state, true, QuizSession::next)
}

/// Go to the previous question.
pub async fn previous_question(state: &AppState) -> Result<QuestionView, CommandError> {
    mutate(state, true, QuizSession::prev)
}

/// Show or hide the correct answer.
pub async fn toggle_reveal(state: &AppState) -> Result<QuestionView, CommandError> {
    mutate(state, false, QuizSession::toggle_reveal)
}

/// Draw a new question order.
pub async fn reshuffle(state: &AppState) -> Result<QuestionView, CommandError> {
    mutate(state, true, QuizSession::reshuffle)
}

/// Clear score, streak and wrong answers.
pub async fn reset_progress(state: &AppState) -> Result<QuestionView, CommandError> {
    mutate(state, true, QuizSession::reset_progress)
}

/// Filter questions by free text.
pub async fn set_query(query: String, state: &AppState) -> Result<QuestionView, CommandError> {
    mutate(state, false, |session| session.set_query(query))
}

fn mutate(
    state: &AppState,
    save: bool,
    f: impl FnOnce(&mut QuizSession),
) -> Result<QuestionView, CommandError> {
    let mut session = state.session.lock().expect("session lock");
    f(&mut *session);
    if save {
        persist(state, &session)?;
    }
    Ok(QuestionView::from_session(&session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::import_raw;
    use crate::commands::test_support::{state, RAW_BANK};
    use crate::db::ProgressRepository;
    use pretty_assertions::assert_eq;

    async fn loaded() -> AppState {
        let state = state();
        import_raw(RAW_BANK.to_string(), false, &state).await.unwrap();
        state
    }

    #[tokio::test]
    async fn view_of_empty_session() {
        let state = state();
        let view = get_view(&state).await.unwrap();
        assert_eq!(view.text, None);
        assert!(view.options.is_empty());
        assert_eq!(view.stats.total, 0);
    }

    #[tokio::test]
    async fn answer_is_hidden_until_revealed() {
        let state = loaded().await;
        let view = get_view(&state).await.unwrap();
        assert_eq!(view.text.as_deref(), Some("1) Glycolysis produces"));
        assert_eq!(view.answer, None);

        let view = toggle_reveal(&state).await.unwrap();
        assert_eq!(view.answer, Some(OptionKey::A));
    }

    #[tokio::test]
    async fn choosing_updates_and_persists_score() {
        let state = loaded().await;
        let outcome = choose_option(OptionKey::A, &state).await.unwrap().unwrap();
        assert!(outcome.correct);

        let view = get_view(&state).await.unwrap();
        assert_eq!(view.selected, Some(OptionKey::A));
        assert!(view.revealed);
        assert_eq!(view.stats.accuracy_pct, 100);

        let stored = state.repository.lock().unwrap().load_state().unwrap().unwrap();
        assert_eq!((stored.score, stored.attempts, stored.streak), (1, 1, 1));
    }

    #[tokio::test]
    async fn navigation_persists_index() {
        let state = loaded().await;
        let view = next_question(&state).await.unwrap();
        assert_eq!(view.stats.position, 2);
        assert_eq!(view.text.as_deref(), Some("2) The urea cycle removes"));

        let stored = state.repository.lock().unwrap().load_state().unwrap().unwrap();
        assert_eq!(stored.index, 1);

        let view = previous_question(&state).await.unwrap();
        assert_eq!(view.stats.position, 1);
    }

    #[tokio::test]
    async fn number_keys_choose_displayed_options() {
        let state = loaded().await;
        let result = press_key('2', &state).await.unwrap();
        let outcome = result.outcome.unwrap();
        assert_eq!(outcome.chosen, OptionKey::B);
        assert!(!outcome.correct);
        assert_eq!(result.view.stats.streak, 0);
    }

    #[tokio::test]
    async fn other_keys_map_to_actions() {
        let state = loaded().await;
        assert!(press_key('f', &state).await.unwrap().focus_search);
        assert!(press_key('r', &state).await.unwrap().view.revealed);
        assert_eq!(press_key('n', &state).await.unwrap().view.stats.position, 2);
        assert!(press_key('x', &state).await.unwrap().outcome.is_none());
    }

    #[tokio::test]
    async fn query_narrows_visible_questions() {
        let state = loaded().await;
        let view = set_query("NITROGEN".to_string(), &state).await.unwrap();
        assert_eq!(view.stats.visible, 1);
        assert_eq!(view.text.as_deref(), Some("2) The urea cycle removes"));
    }

    #[tokio::test]
    async fn reset_clears_progress() {
        let state = loaded().await;
        choose_option(OptionKey::B, &state).await.unwrap();
        let view = reset_progress(&state).await.unwrap();
        assert_eq!((view.stats.score, view.stats.attempts), (0, 0));

        let view = reshuffle(&state).await.unwrap();
        assert_eq!(view.stats.position, 1);
    }
}
