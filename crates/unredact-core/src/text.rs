use crate::geometry::BBox;

/// A single glyph extracted from a PDF page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Char {
    /// Unicode text of the glyph (may be more than one scalar for ligatures).
    pub text: String,
    /// Bounding box in top-left origin page coordinates.
    pub bbox: BBox,
    /// Font resource name or base font name.
    pub fontname: String,
    /// Rendered font size in points (font size scaled by the text rendering matrix).
    pub size: f64,
    /// Whether the glyph is drawn without rotation or shear.
    pub upright: bool,
    /// Raw character code from the content stream.
    pub char_code: u32,
}

impl Char {
    /// True for whitespace-only glyphs, which separate words.
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}
