//! Best-effort loading of the initial question bank.

use crate::config::BankSource;
use quiz_core::{bank, QuestionRecord};

/// Fetch and validate the initial bank.
///
/// Any failure (missing file, HTTP error, bad JSON) is logged and yields
/// `None`; startup continues with an empty bank.
pub async fn load_initial_bank(source: &BankSource) -> Option<Vec<QuestionRecord>> {
    let content = match read_source(source).await {
        Ok(content) => content,
        Err(e) => {
            tracing::info!(?source, error = %e, "no initial bank loaded");
            return None;
        }
    };

    match bank::from_json(&content) {
        Ok(questions) => {
            tracing::info!(?source, count = questions.len(), "loaded initial bank");
            Some(questions)
        }
        Err(e) => {
            tracing::warn!(?source, error = %e, "initial bank is invalid");
            None
        }
    }
}

async fn read_source(source: &BankSource) -> anyhow::Result<String> {
    match source {
        BankSource::Url(url) => {
            let response = reqwest::get(url).await?.error_for_status()?;
            Ok(response.text().await?)
        }
        BankSource::Path(path) => Ok(tokio::fs::read_to_string(path).await?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn loads_bank_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 1, "text": "Stem", "options": [{{"key": "A", "text": "x"}}, {{"key": "B", "text": "y"}}], "answer": "A"}}]"#
        )
        .unwrap();

        let questions = load_initial_bank(&BankSource::Path(file.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(questions.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let source = BankSource::Path(dir.path().join("missing.json"));
        assert!(load_initial_bank(&source).await.is_none());
    }

    #[tokio::test]
    async fn invalid_bank_yields_none() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"not": "an array"}}"#).unwrap();
        let source = BankSource::Path(file.path().to_path_buf());
        assert!(load_initial_bank(&source).await.is_none());
    }
}
