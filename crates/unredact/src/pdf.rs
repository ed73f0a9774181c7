//! Top-level document type: open once, extract pages, write the composite.

use std::path::Path;

use unredact_core::{Char, ExtractOptions, ExtractWarning, LayoutMode, PdfError, WordOptions};
use unredact_parse::{
    CharEvent, ContentHandler, LopdfBackend, LopdfDocument, PageCompositor, PageGeometry,
    PdfBackend, char_from_event,
};

use crate::Page;

/// Iterator over the pages of a [`Pdf`], extracting each on demand.
pub struct PagesIter<'a> {
    pdf: &'a Pdf,
    current: usize,
    count: usize,
}

impl Iterator for PagesIter<'_> {
    type Item = Result<Page, PdfError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.count {
            return None;
        }
        let page = self.pdf.page(self.current);
        self.current += 1;
        Some(page)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PagesIter<'_> {}

/// Collects interpreter output for one page.
#[derive(Default)]
struct PageCollector {
    chars: Vec<CharEvent>,
    warnings: Vec<ExtractWarning>,
}

impl ContentHandler for PageCollector {
    fn on_char(&mut self, event: CharEvent) {
        self.chars.push(event);
    }

    fn on_warning(&mut self, warning: ExtractWarning) {
        self.warnings.push(warning);
    }
}

/// A parsed PDF.
///
/// The same parsed document feeds both text extraction and the composite
/// writer, so each source file is read and parsed once.
///
/// ```ignore
/// let pdf = Pdf::open_file("report.pdf", None)?;
/// for page in pdf.pages_iter() {
///     for line in page?.line_records(&WordOptions::default()) {
///         println!("{}", line.text);
///     }
/// }
/// ```
pub struct Pdf {
    doc: LopdfDocument,
    options: ExtractOptions,
}

impl std::fmt::Debug for Pdf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pdf")
            .field("doc", &self.doc)
            .field("options", &self.options)
            .finish()
    }
}

impl Pdf {
    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::IoError`] if the file cannot be read, otherwise
    /// the same errors as [`Pdf::open`].
    pub fn open_file(
        path: impl AsRef<Path>,
        options: Option<ExtractOptions>,
    ) -> Result<Self, PdfError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| PdfError::IoError(format!("{}: {e}", path.display())))?;
        Self::open(&bytes, options)
    }

    /// Parse PDF bytes. `None` uses [`ExtractOptions::default`].
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::ResourceLimitExceeded`] for inputs over
    /// `max_input_bytes`, [`PdfError::PasswordRequired`] for encrypted
    /// documents and [`PdfError::ParseError`] for anything unreadable.
    pub fn open(bytes: &[u8], options: Option<ExtractOptions>) -> Result<Self, PdfError> {
        let options = options.unwrap_or_default();
        options.check_input_size(bytes.len())?;
        let doc = LopdfBackend::open(bytes)?;
        tracing::debug!(pages = LopdfBackend::page_count(&doc), "opened PDF");
        Ok(Self { doc, options })
    }

    pub fn page_count(&self) -> usize {
        LopdfBackend::page_count(&self.doc)
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract page `index` (0-based).
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the index is out of range, the page boxes are
    /// malformed or the content stream cannot be decoded.
    pub fn page(&self, index: usize) -> Result<Page, PdfError> {
        let source = LopdfBackend::get_page(&self.doc, index)?;
        let geometry = PageGeometry::new(
            LopdfBackend::page_media_box(&self.doc, &source)?,
            LopdfBackend::page_crop_box(&self.doc, &source)?,
            LopdfBackend::page_rotate(&self.doc, &source)?,
        );

        let mut collector = PageCollector::default();
        LopdfBackend::interpret_page(&self.doc, &source, &mut collector, &self.options)?;

        let mut chars: Vec<Char> = collector
            .chars
            .iter()
            .map(|event| char_from_event(event, &geometry))
            .collect();
        self.options.unicode_norm.apply(&mut chars);
        for warning in &collector.warnings {
            tracing::warn!(page = index, "{warning}");
        }

        Ok(Page::new(source, geometry, chars, collector.warnings))
    }

    pub fn pages_iter(&self) -> PagesIter<'_> {
        PagesIter {
            pdf: self,
            current: 0,
            count: self.page_count(),
        }
    }

    /// Build the composite document: one output page per source page, laid
    /// out according to `mode`. Returns the compositor ready to save.
    ///
    /// # Errors
    ///
    /// Returns the first page's extraction or import error; no partial
    /// document is produced.
    pub fn compose(
        &self,
        mode: LayoutMode,
        word_options: &WordOptions,
    ) -> Result<PageCompositor<'_>, PdfError> {
        let mut compositor = PageCompositor::new(&self.doc);
        for page in self.pages_iter() {
            let page = page?;
            let plan = page.plan(mode, word_options);
            tracing::debug!(
                page = page.index(),
                lines = plan.placements.len(),
                width = plan.width,
                "composing page"
            );
            compositor.add_page(page.source(), page.geometry(), &plan)?;
        }
        Ok(compositor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_input_is_rejected_before_parsing() {
        let options = ExtractOptions {
            max_input_bytes: Some(4),
            ..ExtractOptions::default()
        };
        let err = Pdf::open(b"%PDF-1.5 and more", Some(options)).unwrap_err();
        assert!(matches!(err, PdfError::ResourceLimitExceeded { .. }));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = Pdf::open(b"not a pdf", None).unwrap_err();
        assert!(matches!(err, PdfError::ParseError(_)), "got {err:?}");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Pdf::open_file("/nonexistent/definitely/missing.pdf", None).unwrap_err();
        assert!(matches!(err, PdfError::IoError(_)));
    }
}
