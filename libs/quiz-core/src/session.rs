//! Quiz session: presentation order, answers, score and streak.

use crate::search::matches_query;
use crate::types::{
    OptionKey, QuestionId, QuestionOption, QuestionRecord, QuizSettings, SessionSnapshot,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Outcome of answering the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub chosen: OptionKey,
    pub answer: OptionKey,
    pub correct: bool,
    pub streak: u32,
}

/// Progress figures shown alongside the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// 1-based position within the visible questions.
    pub position: usize,
    pub visible: usize,
    pub total: usize,
    pub score: u32,
    pub attempts: u32,
    pub streak: u32,
    /// Rounded percentage of correct attempts.
    pub accuracy_pct: u32,
}

/// Keyboard shortcuts understood by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Choose the Nth displayed option (0-based).
    Choose(usize),
    Next,
    ToggleReveal,
    /// Focus the search box; handled by the host.
    FocusSearch,
}

impl Shortcut {
    /// Map a key press to a shortcut.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            c @ '1'..='6' => Some(Self::Choose(c as usize - '1' as usize)),
            'n' => Some(Self::Next),
            'r' => Some(Self::ToggleReveal),
            'f' => Some(Self::FocusSearch),
            _ => None,
        }
    }
}

/// Options as displayed for one bank position.
#[derive(Debug, Clone)]
struct DisplayedQuestion {
    position: usize,
    shuffled: bool,
    options: Vec<QuestionOption>,
}

/// State of one learner working through a bank.
#[derive(Debug)]
pub struct QuizSession {
    bank: Vec<QuestionRecord>,
    order: Vec<usize>,
    index: usize,
    score: u32,
    attempts: u32,
    streak: u32,
    wrong_ids: BTreeSet<QuestionId>,
    settings: QuizSettings,
    query: String,
    selected: Option<OptionKey>,
    revealed: bool,
    displayed: Option<DisplayedQuestion>,
    rng: StdRng,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    /// Empty session seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Empty session using the given random source.
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            bank: Vec::new(),
            order: Vec::new(),
            index: 0,
            score: 0,
            attempts: 0,
            streak: 0,
            wrong_ids: BTreeSet::new(),
            settings: QuizSettings::default(),
            query: String::new(),
            selected: None,
            revealed: false,
            displayed: None,
            rng,
        }
    }

    pub fn bank(&self) -> &[QuestionRecord] {
        &self.bank
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected(&self) -> Option<OptionKey> {
        self.selected
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_wrong(&self, id: &QuestionId) -> bool {
        self.wrong_ids.contains(id)
    }

    /// Replace the bank and start over from a fresh random order.
    ///
    /// Score, attempts, streak and wrong answers are kept.
    pub fn replace_bank(&mut self, bank: Vec<QuestionRecord>) {
        self.order = shuffled_indices(bank.len(), &mut self.rng);
        self.bank = bank;
        self.index = 0;
        self.clear_selection();
        self.displayed = None;
        self.sync_options();
    }

    /// Bank positions currently eligible for display, in presentation order.
    pub fn visible_order(&self) -> Vec<usize> {
        let base: Vec<usize> = if self.settings.no_repeat {
            self.order.clone()
        } else {
            (0..self.bank.len()).collect()
        };

        base.into_iter()
            .filter(|&i| i < self.bank.len())
            .filter(|&i| !self.settings.only_wrong || self.wrong_ids.contains(&self.bank[i].id))
            .filter(|&i| matches_query(&self.bank[i], &self.query))
            .collect()
    }

    /// Cursor clamped to the visible list.
    fn cursor(&self, visible: usize) -> usize {
        self.index.min(visible.saturating_sub(1))
    }

    /// Bank position of the displayed question.
    ///
    /// Falls back to the first question when nothing is visible.
    fn current_position(&self) -> Option<usize> {
        if self.bank.is_empty() {
            return None;
        }
        let visible = self.visible_order();
        Some(visible.get(self.cursor(visible.len())).copied().unwrap_or(0))
    }

    pub fn current(&self) -> Option<&QuestionRecord> {
        self.current_position().map(|p| &self.bank[p])
    }

    /// Options of the current question in display order.
    pub fn current_options(&self) -> &[QuestionOption] {
        self.displayed
            .as_ref()
            .map(|d| d.options.as_slice())
            .unwrap_or(&[])
    }

    /// Answer the current question.
    pub fn choose(&mut self, key: OptionKey) -> Option<AnswerOutcome> {
        let current = self.current()?;
        let id = current.id.clone();
        let answer = current.answer;
        let correct = key == answer;

        self.selected = Some(key);
        self.attempts += 1;
        self.revealed = true;

        if correct {
            self.score += 1;
            self.streak += 1;
            self.wrong_ids.remove(&id);
        } else {
            self.streak = 0;
            self.wrong_ids.insert(id);
        }
        tracing::debug!(%key, %answer, correct, streak = self.streak, "answered");

        self.sync_options();
        Some(AnswerOutcome {
            chosen: key,
            answer,
            correct,
            streak: self.streak,
        })
    }

    /// Move to the next visible question, wrapping to the first.
    pub fn next(&mut self) {
        let visible = self.visible_order().len();
        self.index = if self.index + 1 >= visible {
            0
        } else {
            self.index + 1
        };
        self.clear_selection();
        self.sync_options();
    }

    /// Move to the previous visible question, wrapping to the last.
    pub fn prev(&mut self) {
        let visible = self.visible_order().len();
        self.index = match visible {
            0 => 0,
            n => (self.index % n + n - 1) % n,
        };
        self.clear_selection();
        self.sync_options();
    }

    pub fn toggle_reveal(&mut self) {
        self.revealed = !self.revealed;
    }

    /// Draw a new presentation order and go back to the start.
    pub fn reshuffle(&mut self) {
        self.order = shuffled_indices(self.bank.len(), &mut self.rng);
        self.index = 0;
        self.clear_selection();
        self.sync_options();
    }

    /// Clear score, streak and wrong answers.
    pub fn reset_progress(&mut self) {
        self.score = 0;
        self.attempts = 0;
        self.streak = 0;
        self.wrong_ids.clear();
        self.index = 0;
        self.clear_selection();
        self.sync_options();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.sync_options();
    }

    pub fn set_settings(&mut self, settings: QuizSettings) {
        self.settings = settings;
        self.sync_options();
    }

    /// Apply a keyboard shortcut.
    ///
    /// Returns the answer outcome when the shortcut chose an option.
    pub fn press(&mut self, shortcut: Shortcut) -> Option<AnswerOutcome> {
        match shortcut {
            Shortcut::Choose(n) => {
                let key = self.current_options().get(n)?.key;
                self.choose(key)
            }
            Shortcut::Next => {
                self.next();
                None
            }
            Shortcut::ToggleReveal => {
                self.toggle_reveal();
                None
            }
            Shortcut::FocusSearch => None,
        }
    }

    pub fn stats(&self) -> SessionStats {
        let visible = self.visible_order().len();
        SessionStats {
            position: self.cursor(visible) + 1,
            visible,
            total: self.bank.len(),
            score: self.score,
            attempts: self.attempts,
            streak: self.streak,
            accuracy_pct: accuracy_pct(self.score, self.attempts),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            bank: self.bank.clone(),
            index: self.index,
            order: self.order.clone(),
            score: self.score,
            attempts: self.attempts,
            streak: self.streak,
            wrong_ids: self.wrong_ids.iter().cloned().collect(),
        }
    }

    /// Restore persisted progress.
    ///
    /// An order that is not a permutation of the bank is redrawn.
    pub fn restore(&mut self, snapshot: SessionSnapshot, settings: QuizSettings) {
        self.order = if is_permutation(&snapshot.order, snapshot.bank.len()) {
            snapshot.order
        } else {
            tracing::warn!("stored order does not match bank, reshuffling");
            shuffled_indices(snapshot.bank.len(), &mut self.rng)
        };
        self.bank = snapshot.bank;
        self.index = snapshot.index;
        self.score = snapshot.score;
        self.attempts = snapshot.attempts;
        self.streak = snapshot.streak;
        self.wrong_ids = snapshot.wrong_ids.into_iter().collect();
        self.settings = settings;
        self.clear_selection();
        self.displayed = None;
        self.sync_options();
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.revealed = false;
    }

    /// Recompute displayed options when the current question changed.
    fn sync_options(&mut self) {
        let Some(position) = self.current_position() else {
            self.displayed = None;
            return;
        };
        let shuffled = self.settings.shuffle_options;
        if matches!(&self.displayed, Some(d) if d.position == position && d.shuffled == shuffled) {
            return;
        }

        let mut options = self.bank[position].options.clone();
        if shuffled {
            options.shuffle(&mut self.rng);
        }
        self.displayed = Some(DisplayedQuestion {
            position,
            shuffled,
            options,
        });
    }
}

/// Random permutation of `0..len`.
pub fn shuffled_indices(len: usize, rng: &mut StdRng) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(rng);
    indices
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    let mut seen = vec![false; len];
    order.len() == len
        && order
            .iter()
            .all(|&i| i < len && !std::mem::replace(&mut seen[i], true))
}

fn accuracy_pct(score: u32, attempts: u32) -> u32 {
    if attempts == 0 {
        return 0;
    }
    (f64::from(score) / f64::from(attempts) * 100.0).round() as u32
}
