//! Runtime configuration read from the environment.

use std::path::PathBuf;

/// Bank loaded on first start when no progress is stored.
pub const DEFAULT_BANK: &str = "questions.json";

const DATA_DIR_NAME: &str = "biochem-quiz";
const DB_FILE_NAME: &str = "quiz.db";

/// Where the initial question bank comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankSource {
    Url(String),
    Path(PathBuf),
}

impl BankSource {
    /// Classify a location: http(s) URLs are fetched, anything else is a file.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::Path(PathBuf::from(location))
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub bank_source: BankSource,
    pub log_filter: String,
}

impl AppConfig {
    /// Build configuration from `QUIZ_DATA_DIR`, `QUIZ_BANK` and `RUST_LOG`.
    ///
    /// A `.env` file is honoured when present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let data_dir = std::env::var("QUIZ_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());
        let bank = std::env::var("QUIZ_BANK").unwrap_or_else(|_| DEFAULT_BANK.to_string());
        let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

        Self {
            data_dir,
            bank_source: BankSource::parse(&bank),
            log_filter,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}

fn default_data_dir() -> PathBuf {
    // Use app data directory for production, fallback to current dir
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}
