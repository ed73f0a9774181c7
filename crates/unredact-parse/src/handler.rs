//! Callbacks from the content stream interpreter.
//!
//! The interpreter reports every shown glyph as a [`CharEvent`] and every
//! recoverable problem as an [`ExtractWarning`] through a [`ContentHandler`].

use unredact_core::{Ctm, ExtractWarning};

/// A glyph shown by `Tj`, `TJ`, `'` or `"`.
///
/// Carries everything needed to place the glyph on the page: the font size and
/// text state parameters, the text matrix and CTM in force when the glyph was
/// shown, and the font's vertical metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct CharEvent {
    /// Character code as it appeared in the string operand.
    pub char_code: u32,
    /// Decoded text, when the font gives a mapping.
    pub unicode: Option<String>,
    pub font_name: String,
    /// Font size from `Tf`, in text space units.
    pub font_size: f64,
    pub text_matrix: Ctm,
    pub ctm: Ctm,
    /// Glyph width in glyph space (1/1000 text space units).
    pub displacement: f64,
    pub char_spacing: f64,
    pub word_spacing: f64,
    /// Horizontal scaling as a fraction (`Tz 100` is 1.0).
    pub h_scaling: f64,
    pub rise: f64,
    /// Font ascent in glyph space.
    pub ascent: f64,
    /// Font descent in glyph space (negative below the baseline).
    pub descent: f64,
}

/// Receiver for interpreter output. Every method defaults to a no-op.
pub trait ContentHandler {
    fn on_char(&mut self, _event: CharEvent) {}

    fn on_warning(&mut self, _warning: ExtractWarning) {}
}
