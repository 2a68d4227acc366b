pub mod commands;
pub mod config;
pub mod db;
pub mod loader;
pub mod state;

use config::AppConfig;
use db::{ProgressRepository, SqliteRepository};
use state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
pub fn init_tracing(filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Read configuration, set up logging and restore state.
///
/// The returned state is handed to the front end, which drives it through
/// [`commands`].
pub async fn run() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();
    init_tracing(&config.log_filter);
    bootstrap(&config).await
}

/// Open storage, restore progress and load the initial bank when empty.
pub async fn bootstrap(config: &AppConfig) -> anyhow::Result<AppState> {
    tokio::fs::create_dir_all(&config.data_dir).await?;

    let db_path = config.db_path();
    tracing::info!(path = %db_path.display(), "opening database");
    let repository = SqliteRepository::open(&db_path)?;
    let version = repository.schema_version()?;
    tracing::debug!(?version, "database schema ready");
    let app_state = AppState::restore(repository)?;

    if app_state.is_empty() {
        if let Some(questions) = loader::load_initial_bank(&config.bank_source).await {
            let mut session = app_state.session.lock().expect("session lock");
            session.replace_bank(questions);
            let repo = app_state.repository.lock().expect("repository lock");
            repo.save_state(&session.snapshot())?;
        }
    }

    Ok(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BankSource;
    use std::io::Write;

    const BANK: &str = r#"[{"id": 1, "text": "Stem", "options": [{"key": "A", "text": "x"}, {"key": "B", "text": "y"}], "answer": "B"}]"#;

    fn config(dir: &tempfile::TempDir, bank: BankSource) -> AppConfig {
        AppConfig {
            data_dir: dir.path().join("data"),
            bank_source: bank,
            log_filter: "info".into(),
        }
    }

    #[tokio::test]
    async fn bootstrap_loads_initial_bank_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BANK.as_bytes()).unwrap();
        let config = config(&dir, BankSource::Path(file.path().to_path_buf()));

        let state = bootstrap(&config).await.unwrap();
        assert_eq!(state.session.lock().unwrap().bank().len(), 1);
        commands::choose_option(quiz_core::OptionKey::B, &state)
            .await
            .unwrap();
        drop(state);

        let reopened = bootstrap(&config).await.unwrap();
        let stats = reopened.session.lock().unwrap().stats();
        assert_eq!((stats.total, stats.score), (1, 1));
    }

    #[tokio::test]
    async fn bootstrap_without_bank_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir, BankSource::Path(dir.path().join("missing.json")));

        let state = bootstrap(&config).await.unwrap();
        assert!(state.is_empty());
        let repo = state.repository.lock().unwrap();
        assert!(repo.load_state().unwrap().is_none());
    }
}
