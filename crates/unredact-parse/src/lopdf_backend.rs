//! [`PdfBackend`] on top of [lopdf](https://crates.io/crates/lopdf).
//!
//! The same parsed [`lopdf::Document`] serves both extraction and
//! compositing: [`LopdfDocument::inner`] hands it to
//! [`PageCompositor`](crate::compose::PageCompositor).

use std::sync::LazyLock;

use lopdf::{Dictionary, Document, Object, ObjectId};
use unredact_core::{BBox, ExtractOptions, PdfError};

use crate::backend::PdfBackend;
use crate::error::BackendError;
use crate::handler::ContentHandler;
use crate::interpreter;

/// Page trees deeper than this are treated as cyclic.
const MAX_TREE_DEPTH: usize = 64;

static EMPTY_RESOURCES: LazyLock<Dictionary> = LazyLock::new(Dictionary::new);

/// A parsed PDF with its page order resolved.
pub struct LopdfDocument {
    inner: Document,
    page_ids: Vec<ObjectId>,
}

impl LopdfDocument {
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    pub fn page_ids(&self) -> &[ObjectId] {
        &self.page_ids
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("pages", &self.page_ids.len())
            .field("version", &self.inner.version)
            .finish_non_exhaustive()
    }
}

/// One page of a [`LopdfDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LopdfPage {
    pub object_id: ObjectId,
    /// 0-based position in document order.
    pub index: usize,
}

/// The lopdf backend.
///
/// ```ignore
/// let doc = LopdfBackend::open(&bytes)?;
/// let page = LopdfBackend::get_page(&doc, 0)?;
/// let media_box = LopdfBackend::page_media_box(&doc, &page)?;
/// ```
pub struct LopdfBackend;

/// Follow an indirect reference, returning `obj` itself when it is direct or
/// the target is missing.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Read an `Integer` or `Real` as `f64`.
pub(crate) fn object_to_f64(obj: &Object) -> Result<f64, BackendError> {
    match obj {
        Object::Integer(n) => Ok(*n as f64),
        Object::Real(r) => Ok(f64::from(*r)),
        other => Err(BackendError::Parse(format!("expected a number, found {other:?}"))),
    }
}

fn page_dict(doc: &Document, id: ObjectId) -> Result<&Dictionary, BackendError> {
    doc.get_object(id)
        .and_then(Object::as_dict)
        .map_err(|e| BackendError::Parse(format!("page object {} {}: {e}", id.0, id.1)))
}

/// Look `key` up on the page, then on its ancestors through `/Parent`.
pub(crate) fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut node = page_dict(doc, page_id)?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Ok(Some(resolve(doc, value)));
        }
        let Ok(parent) = node.get(b"Parent") else {
            return Ok(None);
        };
        let parent = parent
            .as_reference()
            .map_err(|e| BackendError::Parse(format!("bad /Parent entry: {e}")))?;
        node = page_dict(doc, parent)?;
    }
    Err(BackendError::Parse(format!(
        "page tree deeper than {MAX_TREE_DEPTH} levels"
    )))
}

/// A `[llx lly urx ury]` rectangle packed into a [`BBox`].
pub(crate) fn bbox_from_array(doc: &Document, items: &[Object]) -> Result<BBox, BackendError> {
    let [a, b, c, d] = items else {
        return Err(BackendError::Parse(format!(
            "rectangle needs 4 numbers, found {}",
            items.len()
        )));
    };
    let n = |o: &Object| object_to_f64(resolve(doc, o));
    Ok(BBox::new(n(a)?, n(b)?, n(c)?, n(d)?))
}

/// The stream's bytes with its `/Filter` chain undone.
///
/// Encoded bytes are never handed back in place of decoded ones: a filter
/// that cannot be undone is a parse error. lopdf reports a corrupt Flate
/// body as empty output, so non-empty input that decodes to nothing is
/// treated the same way.
pub(crate) fn decoded_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if !stream.dict.has(b"Filter") {
        return Ok(stream.content.clone());
    }
    let decoded = stream
        .decompressed_content()
        .map_err(|e| BackendError::Parse(format!("cannot decode stream: {e}")))?;
    if decoded.is_empty() && !stream.content.is_empty() {
        return Err(BackendError::Parse(
            "cannot decode stream: filter produced no data".into(),
        ));
    }
    Ok(decoded)
}

/// The decoded bytes of every stream in the page's `/Contents`, joined by
/// whitespace. A page without `/Contents` yields no bytes.
pub(crate) fn page_content_bytes(
    doc: &Document,
    page_id: ObjectId,
) -> Result<Vec<u8>, BackendError> {
    let page = page_dict(doc, page_id)?;
    let Ok(contents) = page.get(b"Contents") else {
        return Ok(Vec::new());
    };
    let parts: Vec<&Object> = match resolve(doc, contents) {
        Object::Array(items) => items.iter().map(|o| resolve(doc, o)).collect(),
        single => vec![single],
    };
    let mut bytes = Vec::new();
    for part in parts {
        let stream = part
            .as_stream()
            .map_err(|e| BackendError::Parse(format!("/Contents entry is not a stream: {e}")))?;
        if !bytes.is_empty() {
            bytes.push(b'\n');
        }
        bytes.extend(decoded_stream(stream)?);
    }
    Ok(bytes)
}

/// The page's `/Resources`, inherited if needed, or an empty dictionary.
pub(crate) fn page_resources(
    doc: &Document,
    page_id: ObjectId,
) -> Result<&Dictionary, BackendError> {
    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => obj
            .as_dict()
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".into())),
        None => Ok(&EMPTY_RESOURCES),
    }
}

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Page = LopdfPage;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("not a readable PDF: {e}")))?;
        if inner.is_encrypted() {
            return Err(BackendError::Core(PdfError::PasswordRequired));
        }
        let page_ids = inner.get_pages().into_values().collect();
        Ok(LopdfDocument { inner, page_ids })
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error> {
        let object_id = doc.page_ids.get(index).copied().ok_or_else(|| {
            BackendError::Parse(format!(
                "page index {index} out of range (0..{})",
                doc.page_ids.len()
            ))
        })?;
        Ok(LopdfPage { object_id, index })
    }

    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<BBox, Self::Error> {
        let obj = resolve_inherited(&doc.inner, page.object_id, b"MediaBox")?
            .ok_or_else(|| BackendError::Parse(format!("page {} has no /MediaBox", page.index)))?;
        let items = obj
            .as_array()
            .map_err(|_| BackendError::Parse("/MediaBox is not an array".into()))?;
        bbox_from_array(&doc.inner, items)
    }

    fn page_crop_box(doc: &Self::Document, page: &Self::Page) -> Result<Option<BBox>, Self::Error> {
        match resolve_inherited(&doc.inner, page.object_id, b"CropBox")? {
            Some(obj) => {
                let items = obj
                    .as_array()
                    .map_err(|_| BackendError::Parse("/CropBox is not an array".into()))?;
                bbox_from_array(&doc.inner, items).map(Some)
            }
            None => Ok(None),
        }
    }

    fn page_rotate(doc: &Self::Document, page: &Self::Page) -> Result<i32, Self::Error> {
        match resolve_inherited(&doc.inner, page.object_id, b"Rotate")? {
            Some(obj) => {
                let value = obj
                    .as_i64()
                    .map_err(|_| BackendError::Parse("/Rotate is not an integer".into()))?;
                i32::try_from(value)
                    .map_err(|_| BackendError::Parse(format!("/Rotate {value} out of range")))
            }
            None => Ok(0),
        }
    }

    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
        options: &ExtractOptions,
    ) -> Result<(), Self::Error> {
        let content = page_content_bytes(&doc.inner, page.object_id)?;
        let resources = page_resources(&doc.inner, page.object_id)?;
        interpreter::interpret_content(&doc.inner, &content, resources, handler, options, page.index)
    }
}
