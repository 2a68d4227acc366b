//! Free-text search over questions.

use crate::types::QuestionRecord;

/// Normalize a search query (trim and lowercase).
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Whether a question's stem or any option contains the query.
///
/// Matching is case-insensitive; an empty query matches everything.
pub fn matches_query(record: &QuestionRecord, query: &str) -> bool {
    let needle = normalize_query(query);
    needle.is_empty() || haystack(record).contains(&needle)
}

/// Lowercased searchable text of a question.
fn haystack(record: &QuestionRecord) -> String {
    std::iter::once(record.text.as_str())
        .chain(record.options.iter().map(|o| o.text.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OptionKey, QuestionOption};

    fn record() -> QuestionRecord {
        QuestionRecord {
            id: "1".into(),
            text: "Which step of Glycolysis uses ATP?".into(),
            options: vec![
                QuestionOption::new(OptionKey::A, "Hexokinase"),
                QuestionOption::new(OptionKey::B, "Urea cycle"),
            ],
            answer: OptionKey::A,
        }
    }

    #[test]
    fn empty_query_matches() {
        assert!(matches_query(&record(), ""));
        assert!(matches_query(&record(), "   "));
    }

    #[test]
    fn matches_stem_case_insensitively() {
        assert!(matches_query(&record(), "glycolysis"));
        assert!(matches_query(&record(), "  GLYCOLYSIS "));
    }

    #[test]
    fn matches_option_text() {
        assert!(matches_query(&record(), "urea"));
        assert!(!matches_query(&record(), "fatty acids"));
    }
}
