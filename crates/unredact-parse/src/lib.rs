//! unredact-parse: PDF reading, content stream interpretation and composite
//! page writing on top of `lopdf`.
//!
//! Reading goes through the [`PdfBackend`] trait and reports glyphs to a
//! [`ContentHandler`]; [`char_from_event`] places them on the page.
//! [`PageCompositor`] writes the output document from the same parsed source.

pub mod backend;
pub mod char_extraction;
pub mod cmap;
pub mod compose;
pub mod encoding;
pub mod error;
pub mod fonts;
pub mod handler;
pub mod interpreter;
pub mod interpreter_state;
pub mod lopdf_backend;
pub mod page_geometry;
pub mod standard_fonts;
pub mod text_state;

pub use backend::PdfBackend;
pub use char_extraction::char_from_event;
pub use compose::PageCompositor;
pub use error::BackendError;
pub use handler::{CharEvent, ContentHandler};
pub use lopdf_backend::{LopdfBackend, LopdfDocument, LopdfPage};
pub use page_geometry::PageGeometry;
pub use unredact_core;
