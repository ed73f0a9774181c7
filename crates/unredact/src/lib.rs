//! unredact: recover text left under PDF redaction boxes.
//!
//! Many "redacted" PDFs only paint black rectangles over text that is still
//! present in the content stream. This crate extracts that text, groups it
//! into lines and writes a new PDF where each page is shown either next to a
//! copy of its recovered text ([`LayoutMode::SideBySide`]) or with the text
//! drawn over it in white ([`LayoutMode::OverlayWhite`]).
//!
//! # Processing files
//!
//! ```no_run
//! use unredact::{LayoutMode, process_pdf};
//!
//! let written = process_pdf("report.pdf", "out", LayoutMode::SideBySide)?;
//! println!("wrote {}", written.display());
//! # Ok::<(), unredact::PdfError>(())
//! ```
//!
//! Batches go through [`FileQueue`] and [`process_batch`], which keep going
//! when a single file fails and report every outcome.
//!
//! # Inspecting text
//!
//! ```no_run
//! use unredact::{Pdf, WordOptions};
//!
//! let pdf = Pdf::open_file("report.pdf", None)?;
//! for page in pdf.pages_iter() {
//!     for line in page?.line_records(&WordOptions::default()) {
//!         println!("{:>7.1} {}", line.top, line.text);
//!     }
//! }
//! # Ok::<(), unredact::PdfError>(())
//! ```

pub mod batch;
pub mod engine;
mod page;
mod pdf;
pub mod scan;

pub use batch::{
    ActivityLog, BatchConfig, BatchError, BatchReport, FileOutcome, FileQueue, TimestampedLog,
    process_batch,
};
pub use engine::{OUTPUT_PREFIX, ProcessOptions, output_path_for, process_pdf, process_pdf_with};
pub use page::Page;
pub use pdf::{PagesIter, Pdf};
pub use scan::{collect_pdfs, is_pdf, list_pdfs};

pub use unredact_core::{
    BBox, Char, Ctm, DEFAULT_FONT_SIZE, ExtractOptions, ExtractWarning, ExtractWarningCode,
    LINE_TOLERANCE, LayoutMode, Line, LineRecord, PagePlan, ParseModeError, PdfError, Point,
    TextColor, TextPlacement, UnicodeNorm, Word, WordExtractor, WordOptions, group_lines,
    line_records,
};
pub use unredact_parse::{PageCompositor, PageGeometry};

pub use unredact_core;
pub use unredact_parse;
