//! Composite output document writer.
//!
//! Each output page redraws one source page as a Form XObject and stamps the
//! recovered text on top of or beside it, following a [`PagePlan`].

use std::collections::HashMap;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use unredact_core::{PagePlan, TextPlacement};

use crate::encoding::encode_win_ansi;
use crate::error::BackendError;
use crate::lopdf_backend::{
    LopdfDocument, LopdfPage, bbox_from_array, page_content_bytes, resolve_inherited,
};
use crate::page_geometry::PageGeometry;

/// Resource name of the redrawn source page.
const SOURCE_XOBJECT: &str = "Src";
/// Resource name of the text layer font.
const TEXT_FONT: &str = "UHelv";

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// WinAnsi bytes for `text`; characters outside WinAnsi become `?`.
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| encode_win_ansi(c).unwrap_or(b'?'))
        .collect()
}

/// Operators drawing one line of text with its baseline at `(x, y)`, user space.
fn text_operations(plan: &PagePlan, placement: &TextPlacement) -> Vec<Operation> {
    let (x, y) = plan.baseline_in_user_space(placement);
    let color = plan.color;
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![Object::Name(TEXT_FONT.as_bytes().to_vec()), real(placement.size)],
        ),
        Operation::new("rg", vec![real(color.r), real(color.g), real(color.b)]),
        Operation::new("Td", vec![real(x), real(y)]),
        Operation::new(
            "Tj",
            vec![Object::String(encode_text(&placement.text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

/// The content stream of a composite page: the clipped source page, then the
/// text layer.
pub fn page_operations(plan: &PagePlan) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "re",
            vec![
                real(0.0),
                real(0.0),
                real(plan.source_width),
                real(plan.source_height),
            ],
        ),
        Operation::new("W", vec![]),
        Operation::new("n", vec![]),
        Operation::new("Do", vec![Object::Name(SOURCE_XOBJECT.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ];
    for placement in &plan.placements {
        ops.extend(text_operations(plan, placement));
    }
    ops
}

/// Builds an output document page by page from one source document.
///
/// ```ignore
/// let mut compositor = PageCompositor::new(&source);
/// compositor.add_page(&page, &geometry, &plan)?;
/// compositor.save("UNREDACTED_report.pdf")?;
/// ```
pub struct PageCompositor<'a> {
    source: &'a Document,
    output: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    kids: Vec<ObjectId>,
    /// Source object id to output object id, shared by all pages.
    copied: HashMap<ObjectId, ObjectId>,
}

impl std::fmt::Debug for PageCompositor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageCompositor")
            .field("pages", &self.kids.len())
            .field("copied_objects", &self.copied.len())
            .finish_non_exhaustive()
    }
}

impl<'a> PageCompositor<'a> {
    pub fn new(source: &'a LopdfDocument) -> Self {
        let mut output = Document::with_version("1.5");
        let pages_id = output.new_object_id();
        let font_id = output.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        Self {
            source: source.inner(),
            output,
            pages_id,
            font_id,
            kids: Vec::new(),
            copied: HashMap::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Copy `obj` and everything it references into the output document.
    ///
    /// `/Parent` links are not followed so a resource never drags the source
    /// page tree along.
    fn import(&mut self, obj: &Object) -> Object {
        match obj {
            Object::Reference(id) => Object::Reference(self.import_reference(*id)),
            Object::Array(items) => Object::Array(items.iter().map(|o| self.import(o)).collect()),
            Object::Dictionary(dict) => Object::Dictionary(self.import_dict(dict)),
            Object::Stream(stream) => {
                let mut copy = Stream::new(self.import_dict(&stream.dict), stream.content.clone());
                copy.allows_compression = stream.allows_compression;
                Object::Stream(copy)
            }
            other => other.clone(),
        }
    }

    fn import_dict(&mut self, dict: &Dictionary) -> Dictionary {
        let mut copy = Dictionary::new();
        for (key, value) in dict.iter() {
            if key.as_slice() == b"Parent" {
                continue;
            }
            copy.set(key.clone(), self.import(value));
        }
        copy
    }

    fn import_reference(&mut self, id: ObjectId) -> ObjectId {
        if let Some(new_id) = self.copied.get(&id) {
            return *new_id;
        }
        let new_id = self.output.new_object_id();
        // registered before recursing so reference cycles terminate
        self.copied.insert(id, new_id);
        let source = self.source;
        let copy = match source.get_object(id) {
            Ok(obj) => self.import(obj),
            Err(_) => Object::Null,
        };
        self.output.objects.insert(new_id, copy);
        new_id
    }

    /// The source page as a Form XObject drawn in display space.
    fn source_form(
        &mut self,
        page: &LopdfPage,
        geometry: &PageGeometry,
    ) -> Result<ObjectId, BackendError> {
        let media_box = resolve_inherited(self.source, page.object_id, b"MediaBox")?
            .and_then(|o| o.as_array().ok())
            .ok_or_else(|| BackendError::Parse(format!("page {} has no /MediaBox", page.index)))?;
        let media = bbox_from_array(self.source, media_box)?;
        let resources = match resolve_inherited(self.source, page.object_id, b"Resources")? {
            Some(obj) => self.import(obj),
            None => Object::Dictionary(Dictionary::new()),
        };
        let content = page_content_bytes(self.source, page.object_id)?;

        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => vec![real(media.x0), real(media.top), real(media.x1), real(media.bottom)],
            "Matrix" => geometry
                .display_matrix()
                .to_array()
                .iter()
                .map(|v| real(*v))
                .collect::<Vec<_>>(),
            "Resources" => resources,
        };
        Ok(self.output.add_object(Stream::new(dict, content)))
    }

    /// Append one composite page.
    ///
    /// # Errors
    ///
    /// Returns an error if the source page's boxes or content cannot be read.
    pub fn add_page(
        &mut self,
        page: &LopdfPage,
        geometry: &PageGeometry,
        plan: &PagePlan,
    ) -> Result<(), BackendError> {
        let form_id = self.source_form(page, geometry)?;
        let content = Content {
            operations: page_operations(plan),
        }
        .encode()
        .map_err(|e| BackendError::Write(format!("cannot encode page content: {e}")))?;
        let content_id = self.output.add_object(Stream::new(dictionary! {}, content));

        let page_id = self.output.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![real(0.0), real(0.0), real(plan.width), real(plan.height)],
            "Resources" => dictionary! {
                "Font" => dictionary! { TEXT_FONT => self.font_id },
                "XObject" => dictionary! { SOURCE_XOBJECT => form_id },
            },
            "Contents" => content_id,
        });
        self.kids.push(page_id);
        Ok(())
    }

    /// Close the page tree and return the finished document.
    pub fn finish(mut self) -> Document {
        let kids: Vec<Object> = self.kids.iter().map(|id| Object::Reference(*id)).collect();
        let count = kids.len() as i64;
        self.output.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.output.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let info_id = self.output.add_object(dictionary! {
            "Producer" => Object::string_literal("unredact"),
        });
        self.output.trailer.set("Root", catalog_id);
        self.output.trailer.set("Info", info_id);
        self.output.compress();
        self.output
    }

    /// Serialize the finished document.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Write`] if serialization fails.
    pub fn to_bytes(self) -> Result<Vec<u8>, BackendError> {
        let mut doc = self.finish();
        let mut buf = Vec::new();
        doc.save_to(&mut buf)
            .map_err(|e| BackendError::Write(e.to_string()))?;
        Ok(buf)
    }

    /// Serialize the finished document to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Write`] if serialization fails, or
    /// [`BackendError::Io`] if the file cannot be written.
    pub fn save(self, path: impl AsRef<Path>) -> Result<(), BackendError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
