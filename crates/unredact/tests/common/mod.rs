//! Fixture PDFs built with lopdf, and helpers for reading composite output.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

/// One source page: size, rotation and Helvetica text runs.
#[derive(Debug, Clone)]
pub struct FixturePage {
    width: i64,
    height: i64,
    rotate: i64,
    content: String,
    filter: Option<&'static str>,
}

impl FixturePage {
    pub fn new(width: i64, height: i64) -> Self {
        Self {
            width,
            height,
            rotate: 0,
            content: String::new(),
            filter: None,
        }
    }

    pub fn rotate(mut self, degrees: i64) -> Self {
        self.rotate = degrees;
        self
    }

    /// Draw `text` with its baseline starting at `(x, y)` in PDF user space.
    ///
    /// Helvetica without a descriptor has an ascent of 750, so the glyph top
    /// lands at `height - (y + 0.75 * size)`.
    pub fn text(mut self, x: f64, y: f64, size: f64, text: &str) -> Self {
        self.content.push_str(&format!(
            "BT /F1 {size} Tf 1 0 0 1 {x} {y} Tm ({text}) Tj ET\n"
        ));
        self
    }

    /// Label the content stream with `/Filter filter` without encoding it.
    pub fn mislabel_filter(mut self, filter: &'static str) -> Self {
        self.filter = Some(filter);
        self
    }

    /// A black box, as a redaction tool would paint it.
    pub fn black_box(mut self, x: f64, y: f64, w: f64, h: f64) -> Self {
        self.content.push_str(&format!("0 0 0 rg {x} {y} {w} {h} re f\n"));
        self
    }
}

pub fn pdf_bytes(pages: &[FixturePage]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids = Vec::new();
    for page in pages {
        let content = page.content.clone().into_bytes();
        let mut stream_dict = dictionary! {};
        if let Some(filter) = page.filter {
            stream_dict.set("Filter", filter);
        }
        let content_id = doc.add_object(Stream::new(stream_dict, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(page.width),
                Object::Integer(page.height),
            ],
            "Rotate" => page.rotate,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

pub fn write_pdf(dir: &Path, name: &str, pages: &[FixturePage]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, pdf_bytes(pages)).unwrap();
    path
}

/// The page with the classic redaction scenario: two words on one line,
/// half a point apart vertically, under a black box.
pub fn redacted_page() -> FixturePage {
    FixturePage::new(300, 400)
        .text(50.0, 291.0, 12.0, "REDACTED")
        .text(140.0, 290.5, 12.0, "SECRET")
        .black_box(45.0, 285.0, 160.0, 20.0)
}

pub fn load(path: &Path) -> Document {
    Document::load(path).unwrap()
}

pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

pub fn media_box(doc: &Document, page: ObjectId) -> Vec<f64> {
    let dict = doc.get_object(page).and_then(Object::as_dict).unwrap();
    numbers(dict.get(b"MediaBox").and_then(Object::as_array).unwrap())
}

pub fn operations(doc: &Document, page: ObjectId) -> Vec<Operation> {
    let bytes = doc.get_page_content(page).unwrap();
    Content::decode(&bytes).unwrap().operations
}

pub fn numbers(operands: &[Object]) -> Vec<f64> {
    operands
        .iter()
        .map(|o| match o {
            Object::Real(r) => f64::from(*r),
            Object::Integer(i) => *i as f64,
            _ => f64::NAN,
        })
        .collect()
}

/// `(text, x, y)` for every `Td … Tj` pair in the page content.
pub fn placements(doc: &Document, page: ObjectId) -> Vec<(String, f64, f64)> {
    let ops = operations(doc, page);
    let mut out = Vec::new();
    let mut anchor = (f64::NAN, f64::NAN);
    for op in &ops {
        match op.operator.as_str() {
            "Td" => {
                let n = numbers(&op.operands);
                anchor = (n[0], n[1]);
            }
            "Tj" => {
                let text = match &op.operands[0] {
                    Object::String(bytes, _) => String::from_utf8_lossy(bytes).into_owned(),
                    other => format!("{other:?}"),
                };
                out.push((text, anchor.0, anchor.1));
            }
            _ => {}
        }
    }
    out
}
