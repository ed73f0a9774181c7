//! Text state: the parameters set by text state operators and the matrices of
//! the current text object.
//!
//! [`TextParams`] (`Tc`, `Tw`, `Tz`, `TL`, `Tf`, `Ts`) belongs to the graphics
//! state and is saved and restored by `q`/`Q`. [`TextObject`] holds the text
//! matrix and text line matrix, which live only between `BT` and `ET`.

use unredact_core::Ctm;

/// Text state parameters that are part of the graphics state.
#[derive(Debug, Clone, PartialEq)]
pub struct TextParams {
    /// `Tc`: extra space after every glyph, unscaled text space units.
    pub char_spacing: f64,
    /// `Tw`: extra space after single-byte code 32.
    pub word_spacing: f64,
    /// `Tz`: horizontal scaling in percent.
    pub h_scaling: f64,
    /// `TL`: distance between baselines for `T*`, `'` and `"`.
    pub leading: f64,
    /// Font resource name from `Tf`.
    pub font_name: String,
    pub font_size: f64,
    /// `Ts`: baseline shift.
    pub rise: f64,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 100.0,
            leading: 0.0,
            font_name: String::new(),
            font_size: 0.0,
            rise: 0.0,
        }
    }
}

impl TextParams {
    /// Horizontal scaling as a fraction (1.0 at `Tz 100`).
    pub fn h_scale(&self) -> f64 {
        self.h_scaling / 100.0
    }

    /// Horizontal advance after a glyph of width `w0` (glyph space).
    ///
    /// `tx = ((w0 / 1000) × Tfs + Tc + Tw) × Th`, with `Tw` only for spaces.
    pub fn glyph_advance(&self, w0: f64, is_space: bool) -> f64 {
        let word = if is_space { self.word_spacing } else { 0.0 };
        ((w0 / 1000.0) * self.font_size + self.char_spacing + word) * self.h_scale()
    }

    /// Horizontal shift for a number inside a `TJ` array.
    pub fn tj_adjustment(&self, amount: f64) -> f64 {
        -(amount / 1000.0) * self.font_size * self.h_scale()
    }
}

/// The matrices of the text object opened by `BT`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextObject {
    text_matrix: Ctm,
    line_matrix: Ctm,
}

impl TextObject {
    /// `BT`: both matrices start at identity.
    pub fn begin() -> Self {
        Self::default()
    }

    pub fn text_matrix(&self) -> Ctm {
        self.text_matrix
    }

    pub fn line_matrix(&self) -> Ctm {
        self.line_matrix
    }

    /// `Tm`: replace both matrices.
    pub fn set_matrix(&mut self, m: Ctm) {
        self.text_matrix = m;
        self.line_matrix = m;
    }

    /// `Td`: start a new line offset by `(tx, ty)` from the current line start.
    pub fn move_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Ctm::translation(tx, ty).concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// `T*`: start the next line `leading` below.
    pub fn next_line(&mut self, leading: f64) {
        self.move_line(0.0, -leading);
    }

    /// Move the text matrix `tx` along the baseline.
    pub fn advance(&mut self, tx: f64) {
        self.text_matrix = Ctm::translation(tx, 0.0).concat(&self.text_matrix);
    }
}
