//! One extracted page: its displayed size, glyphs and warnings.

use unredact_core::{
    Char, ExtractWarning, LayoutMode, LineRecord, PagePlan, Word, WordExtractor, WordOptions,
    line_records,
};
use unredact_parse::{LopdfPage, PageGeometry};

/// A page of a [`Pdf`](crate::Pdf) with its characters placed in top-left
/// display space.
#[derive(Debug, Clone)]
pub struct Page {
    index: usize,
    geometry: PageGeometry,
    chars: Vec<Char>,
    warnings: Vec<ExtractWarning>,
    source: LopdfPage,
}

impl Page {
    pub(crate) fn new(
        source: LopdfPage,
        geometry: PageGeometry,
        chars: Vec<Char>,
        warnings: Vec<ExtractWarning>,
    ) -> Self {
        Self {
            index: source.index,
            geometry,
            chars,
            warnings,
            source,
        }
    }

    /// 0-based page index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Displayed width in points, after CropBox and rotation.
    pub fn width(&self) -> f64 {
        self.geometry.width()
    }

    /// Displayed height in points, after CropBox and rotation.
    pub fn height(&self) -> f64 {
        self.geometry.height()
    }

    pub fn rotation(&self) -> i32 {
        self.geometry.rotation()
    }

    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    /// Non-fatal problems met while interpreting this page.
    pub fn warnings(&self) -> &[ExtractWarning] {
        &self.warnings
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub(crate) fn source(&self) -> &LopdfPage {
        &self.source
    }

    pub fn extract_words(&self, options: &WordOptions) -> Vec<Word> {
        WordExtractor::extract(&self.chars, options)
    }

    /// The page's words grouped into renderable lines, top to bottom.
    pub fn line_records(&self, options: &WordOptions) -> Vec<LineRecord> {
        line_records(&self.extract_words(options))
    }

    /// Plan the composite output page for this page.
    pub fn plan(&self, mode: LayoutMode, options: &WordOptions) -> PagePlan {
        PagePlan::new(
            mode,
            self.width(),
            self.height(),
            &self.line_records(options),
        )
    }
}
