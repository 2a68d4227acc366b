//! Bank import and export commands.

use crate::state::AppState;
use quiz_core::bank::{self, EXPORT_FILE_NAME};
use quiz_core::{parser, ParseOptions, QuestionRecord, RawExport};
use std::path::{Path, PathBuf};

#[derive(Debug, serde::Serialize)]
pub struct ImportResult {
    pub imported: usize,
    /// Raw blocks dropped as malformed.
    pub rejected: usize,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CommandError {
    pub message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<crate::db::DbError> for CommandError {
    fn from(e: crate::db::DbError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<quiz_core::BankError> for CommandError {
    fn from(e: quiz_core::BankError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<std::io::Error> for CommandError {
    fn from(e: std::io::Error) -> Self {
        Self { message: e.to_string() }
    }
}

/// Replace the bank with parsed raw text.
///
/// Fails without touching the current bank when no question is detected.
pub async fn import_raw(
    raw: String,
    strict_answers: bool,
    state: &AppState,
) -> Result<ImportResult, CommandError> {
    let report = parser::parse_with_report(&raw, ParseOptions { strict_answers });
    if report.questions.is_empty() {
        return Err(CommandError::new(
            "no questions detected; check the text has A) options and an ANSWER: line",
        ));
    }

    let result = ImportResult {
        imported: report.questions.len(),
        rejected: report.rejected.len(),
    };
    replace_bank(state, report.questions)?;
    tracing::info!(imported = result.imported, rejected = result.rejected, "imported raw bank");
    Ok(result)
}

/// Replace the bank with a JSON array of questions.
pub async fn import_json(content: String, state: &AppState) -> Result<ImportResult, CommandError> {
    let questions = bank::from_json(&content)?;
    let result = ImportResult {
        imported: questions.len(),
        rejected: 0,
    };
    replace_bank(state, questions)?;
    tracing::info!(imported = result.imported, "imported JSON bank");
    Ok(result)
}

/// Replace the bank with the contents of a JSON file.
pub async fn import_json_file(
    file_path: String,
    state: &AppState,
) -> Result<ImportResult, CommandError> {
    let content = tokio::fs::read_to_string(&file_path).await?;
    import_json(content, state).await
}

/// Current bank as pretty-printed JSON.
pub async fn export_json(state: &AppState) -> Result<String, CommandError> {
    let session = state.session.lock().expect("session lock");
    bank::to_json(session.bank()).map_err(Into::into)
}

/// Write the current bank into `dir_path` under the standard export name.
pub async fn export_json_file(
    dir_path: String,
    state: &AppState,
) -> Result<PathBuf, CommandError> {
    let json = export_json(state).await?;
    let path = Path::new(&dir_path).join(EXPORT_FILE_NAME);
    tokio::fs::write(&path, json).await?;
    tracing::info!(path = %path.display(), "exported bank");
    Ok(path)
}

/// Current bank in the raw text convention.
///
/// Questions the raw format cannot hold are listed in `skipped`; the JSON
/// export keeps them.
pub async fn export_raw(state: &AppState) -> Result<RawExport, CommandError> {
    let session = state.session.lock().expect("session lock");
    let export = parser::to_raw(session.bank());
    if !export.skipped.is_empty() {
        tracing::warn!(skipped = export.skipped.len(), "raw export left out questions");
    }
    Ok(export)
}

fn replace_bank(state: &AppState, questions: Vec<QuestionRecord>) -> Result<(), CommandError> {
    let mut session = state.session.lock().expect("session lock");
    session.replace_bank(questions);
    super::persist(state, &session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{state, RAW_BANK};
    use crate::db::ProgressRepository;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn import_raw_replaces_bank_and_persists() {
        let state = state();
        let result = import_raw(RAW_BANK.to_string(), false, &state).await.unwrap();
        assert_eq!((result.imported, result.rejected), (2, 1));

        let stored = state.repository.lock().unwrap().load_state().unwrap().unwrap();
        assert_eq!(stored.bank.len(), 2);
        assert_eq!(stored.index, 0);
    }

    #[tokio::test]
    async fn empty_raw_import_keeps_existing_bank() {
        let state = state();
        import_raw(RAW_BANK.to_string(), false, &state).await.unwrap();

        let err = import_raw("nothing useful".to_string(), false, &state)
            .await
            .unwrap_err();
        assert!(err.message.starts_with("no questions detected"));
        assert_eq!(state.session.lock().unwrap().bank().len(), 2);
    }

    #[tokio::test]
    async fn strict_raw_import_drops_unknown_answers() {
        let state = state();
        let raw = format!("{}\n\nStem\nA) x\nB) y\nANSWER: E", RAW_BANK);
        let result = import_raw(raw, true, &state).await.unwrap();
        assert_eq!((result.imported, result.rejected), (2, 2));
    }

    #[tokio::test]
    async fn invalid_json_import_keeps_existing_bank() {
        let state = state();
        import_raw(RAW_BANK.to_string(), false, &state).await.unwrap();

        let err = import_json(r#"{"id": 1}"#.to_string(), &state)
            .await
            .unwrap_err();
        assert_eq!(err.message, "bank must be a JSON array of questions");
        assert_eq!(state.session.lock().unwrap().bank().len(), 2);
    }

    #[tokio::test]
    async fn json_export_reimports() {
        let state = state();
        import_raw(RAW_BANK.to_string(), false, &state).await.unwrap();
        let json = export_json(&state).await.unwrap();

        let other = crate::commands::test_support::state();
        let result = import_json(json, &other).await.unwrap();
        assert_eq!(result.imported, 2);
        assert_eq!(
            other.session.lock().unwrap().bank(),
            state.session.lock().unwrap().bank()
        );
    }

    #[tokio::test]
    async fn json_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let state = state();
        import_raw(RAW_BANK.to_string(), false, &state).await.unwrap();

        let path = export_json_file(dir.path().to_string_lossy().to_string(), &state)
            .await
            .unwrap();
        assert!(path.ends_with(EXPORT_FILE_NAME));

        let other = crate::commands::test_support::state();
        let result = import_json_file(path.to_string_lossy().to_string(), &other)
            .await
            .unwrap();
        assert_eq!(result.imported, 2);
    }

    #[tokio::test]
    async fn missing_json_file_is_an_error() {
        let state = state();
        assert!(import_json_file("/nonexistent/bank.json".to_string(), &state)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn raw_export_lists_blocks() {
        let state = state();
        import_raw(RAW_BANK.to_string(), false, &state).await.unwrap();
        let export = export_raw(&state).await.unwrap();
        assert_eq!(
            export.text,
            "1) Glycolysis produces\nA) Pyruvate\nB) Urea\nANSWER: A\n\n2) The urea cycle removes\nA) Carbon\nB) Nitrogen\nANSWER: B"
        );
        assert!(export.skipped.is_empty());
    }

    #[tokio::test]
    async fn raw_export_reports_unwritable_questions() {
        let state = state();
        let json = r#"[
            {"id": 1, "text": "Kept", "options": [{"key": "A", "text": "x"}, {"key": "B", "text": "y"}], "answer": "A"},
            {"id": 2, "text": "Split", "options": [{"key": "A", "text": "x\nANSWER: B"}, {"key": "B", "text": "y"}], "answer": "A"}
        ]"#;
        import_json(json.to_string(), &state).await.unwrap();

        let export = export_raw(&state).await.unwrap();
        assert_eq!(export.skipped, vec![quiz_core::QuestionId::from(2_i64)]);

        let other = crate::commands::test_support::state();
        let result = import_raw(export.text, false, &other).await.unwrap();
        assert_eq!((result.imported, result.rejected), (1, 0));
    }
}
