//! Backend-independent data types and algorithms for unredact.
//!
//! This crate provides the geometry, character, word and line types used to
//! recover text hidden under redaction boxes, and the page planning that
//! describes a composite output page. It has no PDF library dependency.

pub mod error;
pub mod geometry;
pub mod layout;
pub mod lines;
pub mod text;
pub mod unicode_norm;
pub mod words;

pub use error::{ExtractOptions, ExtractWarning, ExtractWarningCode, PdfError};
pub use geometry::{BBox, Ctm, Point};
pub use layout::{LayoutMode, PagePlan, ParseModeError, TextColor, TextPlacement};
pub use lines::{DEFAULT_FONT_SIZE, LINE_TOLERANCE, Line, LineRecord, group_lines, line_records};
pub use text::Char;
pub use unicode_norm::UnicodeNorm;
pub use words::{Word, WordExtractor, WordOptions};
