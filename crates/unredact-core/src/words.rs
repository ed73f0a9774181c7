use crate::geometry::BBox;
use crate::text::Char;

/// Two sizes closer than this count as the same font size.
const SIZE_EPSILON: f64 = 1e-6;

/// Options for word extraction.
#[derive(Debug, Clone)]
pub struct WordOptions {
    /// Maximum horizontal gap between characters of one word.
    pub x_tolerance: f64,
    /// Maximum vertical offset between characters of one word.
    pub y_tolerance: f64,
    /// Keep blank characters inside words instead of splitting on them.
    pub keep_blank_chars: bool,
    /// Keep content stream order instead of sorting by (top, x0).
    pub use_text_flow: bool,
    /// Start a new word when the font size changes.
    pub split_on_size: bool,
    /// Expand Latin ligatures (U+FB00–U+FB06) into their letters.
    pub expand_ligatures: bool,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
            keep_blank_chars: false,
            use_text_flow: false,
            split_on_size: true,
            expand_ligatures: true,
        }
    }
}

/// A word extracted from a PDF page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Word {
    pub text: String,
    /// Union of the constituent character boxes.
    pub bbox: BBox,
    /// Font size of the first character, when the word has characters.
    pub size: Option<f64>,
    pub chars: Vec<Char>,
}

impl Word {
    /// Build a word directly from its text and geometry, without characters.
    pub fn new(text: impl Into<String>, bbox: BBox, size: Option<f64>) -> Self {
        Self {
            text: text.into(),
            bbox,
            size,
            chars: Vec::new(),
        }
    }

    pub fn x0(&self) -> f64 {
        self.bbox.x0
    }

    pub fn top(&self) -> f64 {
        self.bbox.top
    }
}

/// Groups characters into words by spatial proximity.
pub struct WordExtractor;

impl WordExtractor {
    /// Extract words from `chars`.
    ///
    /// Unless `use_text_flow` is set, characters are first clustered into rows
    /// whose tops chain within `y_tolerance`, and each row is read by `x0`. A
    /// new word begins at a blank character (unless `keep_blank_chars`), when
    /// the horizontal gap to the previous character exceeds `x_tolerance`, when
    /// the tops differ by more than `y_tolerance`, or, with `split_on_size`,
    /// when the font size changes.
    pub fn extract(chars: &[Char], options: &WordOptions) -> Vec<Word> {
        let ordered: Vec<&Char> = if options.use_text_flow {
            chars.iter().collect()
        } else {
            Self::reading_order(chars, options.y_tolerance)
        };

        let mut words = Vec::new();
        let mut current: Vec<Char> = Vec::new();

        for ch in ordered {
            if ch.is_blank() && !options.keep_blank_chars {
                Self::flush(&mut current, &mut words, options);
                continue;
            }
            if let Some(last) = current.last() {
                if Self::begins_new_word(last, ch, options) {
                    Self::flush(&mut current, &mut words, options);
                }
            }
            current.push(ch.clone());
        }
        Self::flush(&mut current, &mut words, options);

        words
    }

    /// Rows by top, then left to right within each row.
    fn reading_order(chars: &[Char], y_tolerance: f64) -> Vec<&Char> {
        let mut by_top: Vec<&Char> = chars.iter().collect();
        by_top.sort_by(|a, b| a.bbox.top.total_cmp(&b.bbox.top));

        let mut rows: Vec<Vec<&Char>> = Vec::new();
        let mut last_top = f64::NEG_INFINITY;
        for ch in by_top {
            match rows.last_mut() {
                Some(row) if ch.bbox.top - last_top <= y_tolerance => row.push(ch),
                _ => rows.push(vec![ch]),
            }
            last_top = ch.bbox.top;
        }

        rows.into_iter()
            .flat_map(|mut row| {
                row.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
                row
            })
            .collect()
    }

    fn flush(current: &mut Vec<Char>, words: &mut Vec<Word>, options: &WordOptions) {
        if let Some(word) = Self::make_word(current, options.expand_ligatures) {
            words.push(word);
        }
        current.clear();
    }

    /// Gap between the x-intervals of two chars; 0 when they touch or overlap.
    fn begins_new_word(last: &Char, current: &Char, options: &WordOptions) -> bool {
        let x_gap =
            (last.bbox.x0.max(current.bbox.x0) - last.bbox.x1.min(current.bbox.x1)).max(0.0);
        let y_diff = (current.bbox.top - last.bbox.top).abs();
        let size_changed =
            options.split_on_size && (current.size - last.size).abs() > SIZE_EPSILON;
        x_gap > options.x_tolerance || y_diff > options.y_tolerance || size_changed
    }

    fn make_word(chars: &[Char], expand_ligatures: bool) -> Option<Word> {
        let first = chars.first()?;
        let raw: String = chars.iter().map(|c| c.text.as_str()).collect();
        let text = if expand_ligatures {
            expand_ligatures_in_text(&raw)
        } else {
            raw
        };
        let bbox = chars
            .iter()
            .skip(1)
            .fold(first.bbox, |acc, c| acc.union(&c.bbox));
        Some(Word {
            text,
            bbox,
            size: Some(first.size),
            chars: chars.to_vec(),
        })
    }
}

fn expand_ligatures_in_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{FB00}' => out.push_str("ff"),
            '\u{FB01}' => out.push_str("fi"),
            '\u{FB02}' => out.push_str("fl"),
            '\u{FB03}' => out.push_str("ffi"),
            '\u{FB04}' => out.push_str("ffl"),
            '\u{FB05}' => out.push_str("\u{017F}t"),
            '\u{FB06}' => out.push_str("st"),
            _ => out.push(ch),
        }
    }
    out
}
