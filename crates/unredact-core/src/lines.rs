//! Grouping of words into visual text lines.
//!
//! Words are sorted by `(top, x0)` and swept once. The first word of a line
//! fixes the line's reference `top`; every following word whose `top` lies
//! within [`LINE_TOLERANCE`] of that reference joins the line, otherwise it
//! opens a new one. The reference is never updated, so a slow drift of tops is
//! absorbed only while each word stays within the tolerance of the line's seed.
//!
//! Each line is then reduced to a [`LineRecord`]: its words sorted by `x0` and
//! joined with single spaces, anchored at the first word's `x0`/`top`.

use crate::words::Word;

/// Maximum `|top - reference|` for a word to join the open line (inclusive).
pub const LINE_TOLERANCE: f64 = 3.0;

/// Size used for a record whose first word has no font size.
pub const DEFAULT_FONT_SIZE: f64 = 10.0;

/// Words judged to share one visual line, in grouping order.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// `top` of the word that opened the line.
    pub reference_top: f64,
    pub words: Vec<Word>,
}

impl Line {
    fn seeded(word: Word) -> Self {
        Self {
            reference_top: word.top(),
            words: vec![word],
        }
    }

    fn accepts(&self, word: &Word) -> bool {
        (word.top() - self.reference_top).abs() <= LINE_TOLERANCE
    }

    /// Reduce the line to a record, or `None` when its joined text is blank.
    ///
    /// Words are ordered left to right first, so the anchor is the leftmost word.
    pub fn to_record(&self) -> Option<LineRecord> {
        let mut words: Vec<&Word> = self.words.iter().collect();
        words.sort_by(|a, b| a.x0().total_cmp(&b.x0()));

        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if text.trim().is_empty() {
            return None;
        }

        let first = words.first()?;
        Some(LineRecord {
            text,
            x0: first.x0(),
            top: first.top(),
            size: first.size.unwrap_or(DEFAULT_FONT_SIZE),
        })
    }
}

/// One renderable line: joined text, anchor and font size.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineRecord {
    pub text: String,
    pub x0: f64,
    pub top: f64,
    pub size: f64,
}

impl LineRecord {
    pub fn new(text: impl Into<String>, x0: f64, top: f64, size: f64) -> Self {
        Self {
            text: text.into(),
            x0,
            top,
            size,
        }
    }
}

/// Group words into lines in a single pass over the `(top, x0)` ordering.
///
/// Lines come out in the order they were opened.
pub fn group_lines(words: &[Word]) -> Vec<Line> {
    let mut ordered: Vec<&Word> = words.iter().collect();
    ordered.sort_by(|a, b| a.top().total_cmp(&b.top()).then(a.x0().total_cmp(&b.x0())));

    let mut lines: Vec<Line> = Vec::new();
    for word in ordered {
        match lines.last_mut() {
            Some(line) if line.accepts(word) => line.words.push(word.clone()),
            _ => lines.push(Line::seeded(word.clone())),
        }
    }
    lines
}

/// Group `words` and reduce every non-blank line to a [`LineRecord`].
pub fn line_records(words: &[Word]) -> Vec<LineRecord> {
    group_lines(words)
        .iter()
        .filter_map(Line::to_record)
        .collect()
}
