//! Core types for the quiz application.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Option label drawn from the fixed alphabet `A..F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl OptionKey {
    /// Parse an uppercase label character.
    pub fn parse(c: char) -> Option<Self> {
        match c {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            'E' => Some(Self::E),
            'F' => Some(Self::F),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::F => 'F',
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Question identifier.
///
/// JSON banks may carry any numeric id, fractional or large ones included;
/// ids inferred from raw text are digit strings and generated ids are UUID
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(serde_json::Number),
    Text(String),
}

/// Numbers sort before text; numbers compare by their JSON text.
impl Ord for QuestionId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.to_string().cmp(&b.to_string()),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for QuestionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl QuestionId {
    /// Fresh unique identifier for records without one.
    pub fn generate() -> Self {
        Self::Text(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for QuestionId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// One labeled candidate answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub key: OptionKey,
    pub text: String,
}

impl QuestionOption {
    pub fn new(key: OptionKey, text: impl Into<String>) -> Self {
        Self {
            key,
            text: text.into(),
        }
    }
}

/// A multiple-choice question as stored in a bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<QuestionOption>,
    pub answer: OptionKey,
}

impl QuestionRecord {
    /// Whether the answer label matches one of the options present.
    pub fn answer_in_options(&self) -> bool {
        self.options.iter().any(|o| o.key == self.answer)
    }
}

/// User-facing study settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    /// Only show questions answered wrong.
    #[serde(rename = "onlyWrong", default)]
    pub only_wrong: bool,
    /// Walk the shuffled order instead of bank order.
    #[serde(rename = "noRepeat", default = "default_true")]
    pub no_repeat: bool,
    /// Shuffle options of each displayed question.
    #[serde(rename = "shuffleOpts", default = "default_true")]
    pub shuffle_options: bool,
    #[serde(default)]
    pub compact: bool,
}

fn default_true() -> bool {
    true
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            only_wrong: false,
            no_repeat: true,
            shuffle_options: true,
            compact: false,
        }
    }
}

/// Serializable progress snapshot persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default)]
    pub bank: Vec<QuestionRecord>,
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub order: Vec<usize>,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub wrong_ids: Vec<QuestionId>,
}
