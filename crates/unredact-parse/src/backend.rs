//! PDF parsing backend trait.
//!
//! [`PdfBackend`] abstracts the operations the extractor needs from a PDF
//! library: opening a document, reaching its pages, reading page boxes and
//! rotation, and interpreting page content into [`ContentHandler`] callbacks.

use unredact_core::{BBox, ExtractOptions, PdfError};

use crate::handler::ContentHandler;

/// Operations a PDF library must provide for text extraction.
///
/// Page boxes are returned as raw PDF rectangles packed into a [`BBox`]:
/// `x0` = left, `top` = lower y, `x1` = right, `bottom` = upper y.
///
/// ```ignore
/// let doc = MyBackend::open(pdf_bytes)?;
/// let page = MyBackend::get_page(&doc, 0)?;
/// let media_box = MyBackend::page_media_box(&doc, &page)?;
/// MyBackend::interpret_page(&doc, &page, &mut handler, &options)?;
/// ```
pub trait PdfBackend {
    type Document;
    type Page;
    type Error: std::error::Error + Into<PdfError>;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a readable PDF, or the document
    /// is encrypted.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    fn page_count(doc: &Self::Document) -> usize;

    /// Access a page by 0-based index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error>;

    /// The page's `/MediaBox`, inherited from the page tree if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if no MediaBox is found or it is malformed.
    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<BBox, Self::Error>;

    /// The page's `/CropBox`, or `None` when it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the CropBox is present but malformed.
    fn page_crop_box(doc: &Self::Document, page: &Self::Page) -> Result<Option<BBox>, Self::Error>;

    /// The page's `/Rotate` value, 0 when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an integer.
    fn page_rotate(doc: &Self::Document, page: &Self::Page) -> Result<i32, Self::Error>;

    /// Interpret the page's content streams, reporting glyphs and warnings to
    /// `handler`.
    ///
    /// # Errors
    ///
    /// Returns an error if a content stream cannot be decoded.
    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
        options: &ExtractOptions,
    ) -> Result<(), Self::Error>;
}
