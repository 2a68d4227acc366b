//! Raw text parser for pasted question banks.
//!
//! # Format
//! ```text
//! 12) Which enzyme catalyses the first step of glycolysis?
//! A) Hexokinase
//! B) Aldolase
//! C) Enolase
//! ANSWER: A
//!
//! What is the end product of glycolysis 13
//! A) Pyruvate
//! B) Citrate
//! ANSWER: A
//! ```
//!
//! Each block runs up to an `ANSWER: <letter>` line. Options are lines
//! starting with `A)`..`F)`; anything before the first option is the stem.
//! A 1-4 digit run at the end (preferred) or start of the stem becomes the
//! question id, otherwise a fresh id is generated.
//!
//! Parsing is total: malformed blocks are dropped, never reported as errors.
//! [`parse_with_report`] additionally lists what was dropped and why.

use crate::error::BlockRejection;
use crate::types::{OptionKey, QuestionId, QuestionOption, QuestionRecord};
use serde::Serialize;

/// Longest digit run used as an inferred id.
const MAX_ID_DIGITS: usize = 4;

const ANSWER_KEYWORD: &str = "ANSWER:";

/// Parse raw text into question records, in source order.
pub fn parse(raw: &str) -> Vec<QuestionRecord> {
    parse_with_report(raw, ParseOptions::default()).questions
}

/// Parser switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Drop blocks whose answer letter is not one of their option keys.
    pub strict_answers: bool,
}

/// Accepted records plus the blocks that were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub questions: Vec<QuestionRecord>,
    pub rejected: Vec<RejectedBlock>,
}

/// A block excluded from the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedBlock {
    /// 1-based input line the block text starts on.
    pub line: usize,
    /// Trimmed block text, without its answer line.
    pub body: String,
    pub reason: BlockRejection,
}

/// Parse raw text, keeping a record of every dropped block.
pub fn parse_with_report(raw: &str, options: ParseOptions) -> ParseReport {
    let cleaned = raw.replace('\r', "");
    let lines: Vec<&str> = cleaned.split('\n').collect();

    let mut report = ParseReport::default();
    let mut scanner = Scanner::new(&lines);

    while let Some(block) = scanner.next_block() {
        let line = block.line;
        let body = block.body();
        match build_record(&body, block.answer, options) {
            Ok(record) => report.questions.push(record),
            Err(reason) => {
                tracing::debug!(line, %reason, "dropped raw block");
                report.rejected.push(RejectedBlock { line, body, reason });
            }
        }
    }

    report
}

/// A bank rendered in the raw text convention.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawExport {
    pub text: String,
    /// Records left out because the raw convention cannot express them,
    /// such as option text containing an `ANSWER:` line.
    pub skipped: Vec<QuestionId>,
}

/// Render a bank back into the raw text convention.
///
/// Every record written to `text` re-parses to the same stem, options and
/// answer. Ids are not preserved.
pub fn to_raw(questions: &[QuestionRecord]) -> RawExport {
    let mut blocks = Vec::with_capacity(questions.len());
    let mut skipped = Vec::new();

    for record in questions {
        let block = render_block(record);
        if reparses_as(&block, record) {
            blocks.push(block);
        } else {
            tracing::debug!(id = %record.id, "question cannot be written as raw text");
            skipped.push(record.id.clone());
        }
    }

    RawExport {
        text: blocks.join("\n\n"),
        skipped,
    }
}

fn render_block(record: &QuestionRecord) -> String {
    // The parser drops one leading `?`, so a stem that keeps one needs two.
    let stem = if record.text.starts_with('?') {
        format!("?{}", record.text)
    } else {
        record.text.clone()
    };
    let mut lines = vec![stem];
    lines.extend(record.options.iter().map(|o| format!("{}) {}", o.key, o.text)));
    lines.push(format!("{} {}", ANSWER_KEYWORD, record.answer));
    lines.join("\n")
}

fn reparses_as(block: &str, record: &QuestionRecord) -> bool {
    let report = parse_with_report(block, ParseOptions::default());
    report.rejected.is_empty()
        && matches!(report.questions.as_slice(), [only]
            if only.text == record.text && only.options == record.options && only.answer == record.answer)
}

/// Whitespace as pasted text editors produce it: a byte order mark counts,
/// NEL does not.
fn is_blank(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

fn trim(s: &str) -> &str {
    s.trim_matches(is_blank)
}

fn trim_start(s: &str) -> &str {
    s.trim_start_matches(is_blank)
}

/// Block text up to (not including) its answer line.
struct RawBlock<'a> {
    line: usize,
    lines: &'a [&'a str],
    answer: OptionKey,
}

impl RawBlock<'_> {
    fn body(&self) -> String {
        trim(&self.lines.join("\n")).to_string()
    }
}

/// Splits cleaned input lines into blocks, left to right.
struct Scanner<'a> {
    lines: &'a [&'a str],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(lines: &'a [&'a str]) -> Self {
        Self { lines, pos: 0 }
    }

    /// Next block ending at the first valid answer line, if any.
    fn next_block(&mut self) -> Option<RawBlock<'a>> {
        let all = self.lines;
        let start = self.pos;

        for i in start..all.len() {
            if let Some((answer, consumed)) = answer_line(&all[i..]) {
                self.pos = i + consumed;
                let lines = &all[start..i];
                let first_text = lines
                    .iter()
                    .position(|l| !trim(l).is_empty())
                    .unwrap_or(0);
                return Some(RawBlock {
                    line: start + first_text + 1,
                    lines,
                    answer,
                });
            }
        }

        self.pos = all.len();
        None
    }
}

/// Match an answer line at the head of `lines`.
///
/// Returns the answer and how many lines the marker spans. The letter may
/// sit on a later line when only whitespace separates it from `ANSWER:`.
fn answer_line(lines: &[&str]) -> Option<(OptionKey, usize)> {
    let rest = trim(trim_start(lines.first()?).strip_prefix(ANSWER_KEYWORD)?);
    if !rest.is_empty() {
        return single_label(rest).map(|key| (key, 1));
    }

    for (offset, line) in lines.iter().enumerate().skip(1) {
        let trimmed = trim(line);
        if !trimmed.is_empty() {
            return single_label(trimmed).map(|key| (key, offset + 1));
        }
    }
    None
}

fn single_label(s: &str) -> Option<OptionKey> {
    let mut chars = s.chars();
    let key = OptionKey::parse(chars.next()?)?;
    chars.next().is_none().then_some(key)
}

/// Option marker such as `  B) text`, returning the key and text after `)`.
fn option_marker(line: &str) -> Option<(OptionKey, &str)> {
    let trimmed = trim_start(line);
    let mut chars = trimmed.chars();
    let key = OptionKey::parse(chars.next()?)?;
    let rest = chars.as_str().strip_prefix(')')?;
    Some((key, rest))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Stem,
    Options,
}

/// Option text as it appears in the block, before trimming.
struct OptionSegment<'a> {
    key: OptionKey,
    /// Marker line and continuation lines.
    lines: Vec<&'a str>,
}

impl OptionSegment<'_> {
    /// Text after the marker, including continuation lines.
    fn text(&self) -> String {
        let mut parts = self.lines.clone();
        if let Some((_, rest)) = parts.first().copied().and_then(option_marker) {
            parts[0] = rest;
        }
        trim(&parts.join("\n")).to_string()
    }

    fn verbatim(&self) -> String {
        trim(&self.lines.join("\n")).to_string()
    }
}

fn build_record(
    body: &str,
    answer: OptionKey,
    options: ParseOptions,
) -> Result<QuestionRecord, BlockRejection> {
    let (stem, segments) = split_block(body);
    let choices = collect_options(segments);

    let id = infer_id(&stem);
    let text = strip_stray_question_mark(&stem);

    if text.is_empty() {
        return Err(BlockRejection::EmptyStem);
    }
    match choices.len() {
        0 => return Err(BlockRejection::NoOptions),
        1 => return Err(BlockRejection::TooFewOptions { found: 1 }),
        _ => {}
    }

    let record = QuestionRecord {
        id: id.map(QuestionId::from).unwrap_or_else(QuestionId::generate),
        text,
        options: choices,
        answer,
    };
    if options.strict_answers && !record.answer_in_options() {
        return Err(BlockRejection::AnswerNotInOptions { answer });
    }
    Ok(record)
}

/// Split a trimmed block into its stem and raw option segments.
///
/// The first line never starts the option section.
fn split_block(body: &str) -> (String, Vec<OptionSegment<'_>>) {
    let mut section = Section::Stem;
    let mut stem_lines = Vec::new();
    let mut segments: Vec<OptionSegment> = Vec::new();

    for (idx, line) in body.split('\n').enumerate() {
        let marker = if idx > 0 { option_marker(line) } else { None };

        match (section, marker) {
            (_, Some((key, _))) => {
                section = Section::Options;
                segments.push(OptionSegment {
                    key,
                    lines: vec![line],
                });
            }
            (Section::Stem, None) => stem_lines.push(line),
            (Section::Options, None) => {
                if let Some(current) = segments.last_mut() {
                    current.lines.push(line);
                }
            }
        }
    }

    (trim(&stem_lines.join("\n")).to_string(), segments)
}

/// Turn segments into options, in encounter order.
///
/// An option with no text takes the following marker line verbatim as its
/// text, consuming that option; a trailing empty option is dropped.
fn collect_options(segments: Vec<OptionSegment<'_>>) -> Vec<QuestionOption> {
    let mut options = Vec::with_capacity(segments.len());
    let mut segments = segments.into_iter();

    while let Some(segment) = segments.next() {
        let text = segment.text();
        if !text.is_empty() {
            options.push(QuestionOption::new(segment.key, text));
            continue;
        }
        match segments.next() {
            Some(absorbed) => options.push(QuestionOption::new(segment.key, absorbed.verbatim())),
            None => break,
        }
    }

    options
}

/// Id from a trailing digit run, else a leading one.
fn infer_id(stem: &str) -> Option<&str> {
    trailing_digits(stem).or_else(|| leading_digits(stem))
}

fn trailing_digits(stem: &str) -> Option<&str> {
    let trimmed = stem.trim_end_matches(is_blank);
    let run = trimmed.bytes().rev().take_while(u8::is_ascii_digit).count();
    if run == 0 {
        return None;
    }
    let take = run.min(MAX_ID_DIGITS);
    Some(&trimmed[trimmed.len() - take..])
}

fn leading_digits(stem: &str) -> Option<&str> {
    let run = stem.bytes().take_while(u8::is_ascii_digit).count();
    (run > 0).then(|| &stem[..run.min(MAX_ID_DIGITS)])
}

/// Drop a single leading `?` left behind by copy-paste, then trim.
fn strip_stray_question_mark(stem: &str) -> String {
    trim(stem.strip_prefix('?').unwrap_or(stem)).to_string()
}
