//! JSON question bank format.
//!
//! A bank is a JSON array of question records:
//!
//! ```json
//! [
//!   {
//!     "id": 1,
//!     "text": "Which enzyme catalyses the first step of glycolysis?",
//!     "options": [{"key": "A", "text": "Hexokinase"}, {"key": "B", "text": "Aldolase"}],
//!     "answer": "A"
//!   }
//! ]
//! ```
//!
//! Imports are all-or-nothing: one malformed element rejects the whole bank.

use crate::error::{BankError, Result};
use crate::types::QuestionRecord;
use serde_json::Value;

/// File name offered when exporting a bank.
pub const EXPORT_FILE_NAME: &str = "biochem-questions.json";

/// Minimum options a question needs to be playable.
pub const MIN_OPTIONS: usize = 2;

/// Parse and validate a JSON bank.
pub fn from_json(content: &str) -> Result<Vec<QuestionRecord>> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(items) = value else {
        return Err(BankError::NotAnArray);
    };
    if items.is_empty() {
        return Err(BankError::Empty);
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let record: QuestionRecord =
                serde_json::from_value(item).map_err(|e| BankError::InvalidQuestion {
                    index,
                    message: e.to_string(),
                })?;
            validate(&record).map_err(|message| BankError::InvalidQuestion { index, message })?;
            Ok(record)
        })
        .collect()
}

/// Serialize a bank as pretty-printed JSON.
pub fn to_json(questions: &[QuestionRecord]) -> Result<String> {
    serde_json::to_string_pretty(questions).map_err(Into::into)
}

fn validate(record: &QuestionRecord) -> std::result::Result<(), String> {
    if record.text.trim().is_empty() {
        return Err("question text is empty".to_string());
    }
    if record.options.len() < MIN_OPTIONS {
        return Err(format!(
            "expected at least {} options, found {}",
            MIN_OPTIONS,
            record.options.len()
        ));
    }
    if let Some(option) = record.options.iter().find(|o| o.text.trim().is_empty()) {
        return Err(format!("option {} has no text", option.key));
    }
    Ok(())
}
