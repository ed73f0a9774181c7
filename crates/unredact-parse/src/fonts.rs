//! Font loading: glyph widths, vertical metrics and text decoding.
//!
//! Simple fonts (Type1, TrueType, Type3) use one byte per code, `/Widths`
//! from `/FirstChar`, and an optional `/Encoding`. Type0 fonts use two-byte
//! codes and take widths from the descendant font's `/W` and `/DW`. Both kinds
//! prefer a `/ToUnicode` CMap for decoding.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object};

use crate::cmap::{ToUnicodeCMap, range_within_limit};
use crate::encoding::SimpleEncoding;
use crate::lopdf_backend::{decoded_stream, object_to_f64, resolve};
use crate::standard_fonts;

/// Descent used when a font gives no descriptor (glyph space).
pub const DEFAULT_DESCENT: f64 = -250.0;

/// Width used when nothing better is known (glyph space).
pub const DEFAULT_WIDTH: f64 = 600.0;

/// Default `/DW` for CID fonts.
const DEFAULT_CID_WIDTH: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
enum Widths {
    Simple { first_char: u32, widths: Vec<f64> },
    Cid { default: f64, widths: HashMap<u32, f64> },
}

/// A font resource ready for text interpretation.
#[derive(Debug, Clone)]
pub struct LoadedFont {
    /// `/BaseFont`, or the resource name when absent.
    pub name: String,
    widths: Widths,
    missing_width: f64,
    descent: f64,
    to_unicode: Option<ToUnicodeCMap>,
    encoding: Option<SimpleEncoding>,
    code_bytes: usize,
}

impl LoadedFont {
    /// Metrics for a `Tf` that names no loadable font.
    pub fn fallback(name: &str) -> Self {
        Self {
            name: name.to_string(),
            widths: Widths::Simple {
                first_char: 0,
                widths: Vec::new(),
            },
            missing_width: DEFAULT_WIDTH,
            descent: DEFAULT_DESCENT,
            to_unicode: None,
            encoding: None,
            code_bytes: 1,
        }
    }

    /// Load a font dictionary. `resource_name` is used when `/BaseFont` is missing.
    pub fn load(doc: &Document, font: &Dictionary, resource_name: &str) -> Self {
        let name = font
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .unwrap_or_else(|| resource_name.to_string());

        let to_unicode = font
            .get(b"ToUnicode")
            .ok()
            .and_then(|o| resolve(doc, o).as_stream().ok())
            .and_then(|s| decoded_stream(s).ok())
            .and_then(|bytes| ToUnicodeCMap::parse(&bytes).ok());

        let is_type0 =
            font.get(b"Subtype").and_then(|o| o.as_name()).ok() == Some(b"Type0".as_slice());
        if is_type0 {
            let descendant = font
                .get(b"DescendantFonts")
                .ok()
                .and_then(|o| resolve(doc, o).as_array().ok())
                .and_then(|arr| arr.first())
                .and_then(|o| resolve(doc, o).as_dict().ok());
            let (default, widths, descent) = match descendant {
                Some(cid) => {
                    let default = cid
                        .get(b"DW")
                        .ok()
                        .and_then(|o| object_to_f64(resolve(doc, o)).ok())
                        .unwrap_or(DEFAULT_CID_WIDTH);
                    let widths = cid
                        .get(b"W")
                        .ok()
                        .and_then(|o| resolve(doc, o).as_array().ok())
                        .map(|arr| parse_w_array(doc, arr))
                        .unwrap_or_default();
                    (default, widths, descriptor_descent(doc, cid))
                }
                None => (DEFAULT_CID_WIDTH, HashMap::new(), None),
            };
            let code_bytes = to_unicode
                .as_ref()
                .and_then(ToUnicodeCMap::code_bytes)
                .unwrap_or(2);
            return Self {
                name,
                widths: Widths::Cid { default, widths },
                missing_width: default,
                descent: descent.unwrap_or(DEFAULT_DESCENT),
                to_unicode,
                encoding: None,
                code_bytes,
            };
        }

        let first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(|o| resolve(doc, o).as_i64().ok())
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0);
        let widths = font
            .get(b"Widths")
            .ok()
            .and_then(|o| resolve(doc, o).as_array().ok())
            .map(|arr| {
                arr.iter()
                    .map(|w| object_to_f64(resolve(doc, w)).unwrap_or(0.0))
                    .collect()
            })
            .unwrap_or_default();
        let missing_width = descriptor(doc, font)
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(|o| object_to_f64(resolve(doc, o)).ok())
            .unwrap_or(DEFAULT_WIDTH);

        Self {
            encoding: SimpleEncoding::from_font(doc, font),
            widths: Widths::Simple { first_char, widths },
            missing_width,
            descent: descriptor_descent(doc, font).unwrap_or(DEFAULT_DESCENT),
            to_unicode,
            code_bytes: 1,
            name,
        }
    }

    /// Split a string operand into character codes.
    pub fn codes(&self, bytes: &[u8]) -> Vec<u32> {
        bytes
            .chunks(self.code_bytes.max(1))
            .map(|chunk| chunk.iter().fold(0u32, |acc, b| acc << 8 | u32::from(*b)))
            .collect()
    }

    pub fn is_single_byte(&self) -> bool {
        self.code_bytes == 1
    }

    /// Glyph width of `code` in glyph space.
    pub fn width(&self, code: u32) -> f64 {
        match &self.widths {
            Widths::Simple { first_char, widths } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize).copied())
                .or_else(|| standard_fonts::width(&self.name, code))
                .unwrap_or(self.missing_width),
            Widths::Cid { default, widths } => widths.get(&code).copied().unwrap_or(*default),
        }
    }

    pub fn descent(&self) -> f64 {
        self.descent
    }

    /// Top of the glyph box above the baseline: one em above the descent.
    pub fn ascent(&self) -> f64 {
        1000.0 + self.descent
    }

    /// Decode `code` through the ToUnicode map, then the font encoding.
    pub fn decode(&self, code: u32) -> Option<String> {
        if let Some(text) = self.to_unicode.as_ref().and_then(|m| m.lookup(code)) {
            return Some(text.to_string());
        }
        let byte = u8::try_from(code).ok()?;
        self.encoding
            .as_ref()
            .and_then(|e| e.decode(byte))
            .map(String::from)
    }
}

fn descriptor<'a>(doc: &'a Document, font: &'a Dictionary) -> Option<&'a Dictionary> {
    font.get(b"FontDescriptor")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
}

fn descriptor_descent(doc: &Document, font: &Dictionary) -> Option<f64> {
    descriptor(doc, font)
        .and_then(|d| d.get(b"Descent").ok())
        .and_then(|o| object_to_f64(resolve(doc, o)).ok())
}

/// Parse a CID font `/W` array: `c [w1 w2 ...]` or `c_first c_last w`.
fn parse_w_array(doc: &Document, items: &[Object]) -> HashMap<u32, f64> {
    let mut widths = HashMap::new();
    let number = |o: &Object| object_to_f64(resolve(doc, o)).ok();
    let mut i = 0;
    while i < items.len() {
        let Some(start) = number(&items[i]) else {
            break;
        };
        let start = start as u32;
        match items.get(i + 1).map(|o| resolve(doc, o)) {
            Some(Object::Array(run)) => {
                for (offset, w) in run.iter().enumerate() {
                    let code = u32::try_from(offset)
                        .ok()
                        .and_then(|offset| start.checked_add(offset));
                    if let (Some(code), Some(w)) = (code, number(w)) {
                        widths.insert(code, w);
                    }
                }
                i += 2;
            }
            Some(end) => {
                let (Some(end), Some(w)) = (number(end), items.get(i + 2).and_then(number)) else {
                    break;
                };
                let end = end as u32;
                if range_within_limit(start, end) {
                    for code in start..=end {
                        widths.insert(code, w);
                    }
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(start, end, "/W range too large, skipped");
                }
                i += 3;
            }
            None => break,
        }
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Stream, dictionary};

    #[test]
    fn fallback_metrics() {
        let font = LoadedFont::fallback("F9");
        assert_eq!(font.name, "F9");
        assert_eq!(font.width(65), DEFAULT_WIDTH);
        assert_eq!(font.ascent(), 750.0);
        assert_eq!(font.descent(), -250.0);
        assert_eq!(font.decode(65), None);
        assert!(font.is_single_byte());
    }

    #[test]
    fn simple_font_widths_and_descriptor() {
        let mut doc = Document::with_version("1.5");
        let fd = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "Descent" => -200,
            "MissingWidth" => 333,
        });
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => "Custom",
            "FirstChar" => 65,
            "Widths" => vec![Object::Integer(500), Object::Real(612.5)],
            "FontDescriptor" => fd,
        };
        let font = LoadedFont::load(&doc, &font, "F1");
        assert_eq!(font.name, "Custom");
        assert_eq!(font.width(65), 500.0);
        assert_eq!(font.width(66), 612.5);
        assert_eq!(font.width(67), 333.0);
        assert_eq!(font.width(10), 333.0);
        assert_eq!(font.descent(), -200.0);
        assert_eq!(font.ascent(), 800.0);
    }

    #[test]
    fn standard_font_without_widths() {
        let doc = Document::with_version("1.5");
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        };
        let font = LoadedFont::load(&doc, &font, "F1");
        assert_eq!(font.width(u32::from(b'A')), 667.0);
        assert_eq!(font.width(0xE9), DEFAULT_WIDTH);
        assert_eq!(font.decode(u32::from(b'A')), None);
    }

    #[test]
    fn simple_font_decodes_through_encoding() {
        let doc = Document::with_version("1.5");
        let font = dictionary! {
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        };
        let font = LoadedFont::load(&doc, &font, "F1");
        assert_eq!(font.decode(0x92).as_deref(), Some("\u{2019}"));
        assert_eq!(font.codes(b"AB"), vec![65, 66]);
    }

    #[test]
    fn type0_font_uses_two_byte_codes_and_w_array() {
        let mut doc = Document::with_version("1.5");
        let cmap = b"1 begincodespacerange <0000> <FFFF> endcodespacerange\n\
            2 beginbfchar <0001> <0048> <0002> <0069> endbfchar";
        let to_unicode = doc.add_object(Stream::new(dictionary! {}, cmap.to_vec()));
        let cid = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "DW" => 800,
            "W" => vec![
                Object::Integer(1),
                Object::Array(vec![Object::Integer(722), Object::Integer(278)]),
                Object::Integer(10),
                Object::Integer(12),
                Object::Integer(500),
            ],
        });
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => "ABCDEF+Arial",
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(cid)],
            "ToUnicode" => to_unicode,
        };
        let font = LoadedFont::load(&doc, &font, "F2");
        assert!(!font.is_single_byte());
        assert_eq!(font.codes(&[0, 1, 0, 2]), vec![1, 2]);
        assert_eq!(font.decode(1).as_deref(), Some("H"));
        assert_eq!(font.decode(2).as_deref(), Some("i"));
        assert_eq!(font.width(1), 722.0);
        assert_eq!(font.width(2), 278.0);
        assert_eq!(font.width(11), 500.0);
        assert_eq!(font.width(99), 800.0);
    }

    #[test]
    fn oversized_w_range_is_skipped() {
        let doc = Document::with_version("1.5");
        let items = vec![
            Object::Integer(0),
            Object::Integer(4_294_967_295),
            Object::Integer(500),
            Object::Integer(5),
            Object::Integer(6),
            Object::Integer(250),
        ];
        let widths = parse_w_array(&doc, &items);
        assert_eq!(widths.len(), 2);
        assert_eq!(widths.get(&5), Some(&250.0));
        assert_eq!(widths.get(&0), None);
    }
}
