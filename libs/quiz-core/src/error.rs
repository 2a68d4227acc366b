//! Error types for quiz-core.

use crate::types::OptionKey;
use thiserror::Error;

/// Result type alias using BankError.
pub type Result<T> = std::result::Result<T, BankError>;

/// Errors that can occur while importing or exporting a JSON bank.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("bank must be a JSON array of questions")]
    NotAnArray,

    #[error("bank contains no questions")]
    Empty,

    #[error("invalid question at index {index}: {message}")]
    InvalidQuestion { index: usize, message: String },
}

/// Why a raw block was left out of the parsed bank.
///
/// Rejections never fail a parse; they are only reported alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockRejection {
    #[error("no options found")]
    NoOptions,

    #[error("expected at least 2 options, found {found}")]
    TooFewOptions { found: usize },

    #[error("empty question text")]
    EmptyStem,

    #[error("answer {answer} does not match any option")]
    AnswerNotInOptions { answer: OptionKey },
}
