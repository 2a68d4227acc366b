//! Core quiz library shared by the desktop host.
//!
//! Provides:
//! - Raw text parser for pasted question banks (`A)`..`F)` options, `ANSWER:` lines)
//! - JSON bank import and export
//! - Quiz session logic (order, filtering, score, streak, wrong answers)
//! - Shared types (QuestionRecord, OptionKey, QuizSettings, etc.)

pub mod bank;
pub mod error;
pub mod parser;
pub mod search;
pub mod session;
pub mod types;

pub use error::{BankError, BlockRejection, Result};
pub use parser::{
    parse, parse_with_report, to_raw, ParseOptions, ParseReport, RawExport, RejectedBlock,
};
pub use search::matches_query;
pub use session::{AnswerOutcome, QuizSession, SessionStats, Shortcut};
pub use types::{
    OptionKey, QuestionId, QuestionOption, QuestionRecord, QuizSettings, SessionSnapshot,
};
