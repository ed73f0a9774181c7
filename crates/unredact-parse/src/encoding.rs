//! Single-byte encodings for simple fonts.
//!
//! Resolves `/Encoding` (a base encoding name, or a dictionary with
//! `/BaseEncoding` and `/Differences`) into a 256-entry code to char table.
//! The same WinAnsi table is used in reverse when writing text.

use lopdf::{Dictionary, Document, Object};

/// WinAnsi codes 0x80..=0x9F. Unlisted codes in the range are undefined.
const WIN_ANSI_HIGH: [(u8, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

/// Glyph names beyond single letters and `uniXXXX`.
const GLYPH_NAMES: &[(&str, char)] = &[
    ("space", ' '),
    ("exclam", '!'),
    ("quotedbl", '"'),
    ("numbersign", '#'),
    ("dollar", '$'),
    ("percent", '%'),
    ("ampersand", '&'),
    ("quotesingle", '\''),
    ("parenleft", '('),
    ("parenright", ')'),
    ("asterisk", '*'),
    ("plus", '+'),
    ("comma", ','),
    ("hyphen", '-'),
    ("period", '.'),
    ("slash", '/'),
    ("zero", '0'),
    ("one", '1'),
    ("two", '2'),
    ("three", '3'),
    ("four", '4'),
    ("five", '5'),
    ("six", '6'),
    ("seven", '7'),
    ("eight", '8'),
    ("nine", '9'),
    ("colon", ':'),
    ("semicolon", ';'),
    ("less", '<'),
    ("equal", '='),
    ("greater", '>'),
    ("question", '?'),
    ("at", '@'),
    ("bracketleft", '['),
    ("backslash", '\\'),
    ("bracketright", ']'),
    ("asciicircum", '^'),
    ("underscore", '_'),
    ("grave", '`'),
    ("braceleft", '{'),
    ("bar", '|'),
    ("braceright", '}'),
    ("asciitilde", '~'),
    ("quoteleft", '\u{2018}'),
    ("quoteright", '\u{2019}'),
    ("quotedblleft", '\u{201C}'),
    ("quotedblright", '\u{201D}'),
    ("endash", '\u{2013}'),
    ("emdash", '\u{2014}'),
    ("bullet", '\u{2022}'),
    ("ellipsis", '\u{2026}'),
    ("dagger", '\u{2020}'),
    ("Euro", '\u{20AC}'),
    ("trademark", '\u{2122}'),
    ("copyright", '\u{00A9}'),
    ("registered", '\u{00AE}'),
    ("section", '\u{00A7}'),
    ("paragraph", '\u{00B6}'),
    ("degree", '\u{00B0}'),
    ("fi", '\u{FB01}'),
    ("fl", '\u{FB02}'),
    ("ff", '\u{FB00}'),
    ("ffi", '\u{FB03}'),
    ("ffl", '\u{FB04}'),
    ("nbspace", '\u{00A0}'),
    ("germandbls", '\u{00DF}'),
    ("aacute", '\u{00E1}'),
    ("agrave", '\u{00E0}'),
    ("adieresis", '\u{00E4}'),
    ("ccedilla", '\u{00E7}'),
    ("eacute", '\u{00E9}'),
    ("egrave", '\u{00E8}'),
    ("ecircumflex", '\u{00EA}'),
    ("iacute", '\u{00ED}'),
    ("ntilde", '\u{00F1}'),
    ("oacute", '\u{00F3}'),
    ("odieresis", '\u{00F6}'),
    ("uacute", '\u{00FA}'),
    ("udieresis", '\u{00FC}'),
    ("Adieresis", '\u{00C4}'),
    ("Eacute", '\u{00C9}'),
    ("Odieresis", '\u{00D6}'),
    ("Udieresis", '\u{00DC}'),
];

/// Map a glyph name to its character.
///
/// Handles `uniXXXX`, `uXXXX`..`uXXXXXX`, single-character names and a table of
/// common Latin names.
pub fn glyph_name_to_char(name: &str) -> Option<char> {
    let mut single = name.chars();
    if let (Some(c), None) = (single.next(), single.next()) {
        return Some(c);
    }
    if let Some(hex) = name.strip_prefix("uni") {
        if hex.len() == 4 {
            return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
        }
    }
    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
        }
    }
    GLYPH_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| *c)
}

/// Encode `c` as a WinAnsi byte, if representable.
pub fn encode_win_ansi(c: char) -> Option<u8> {
    let code = u32::from(c);
    match code {
        0x20..=0x7E | 0xA0..=0xFF => u8::try_from(code).ok(),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(_, ch)| *ch == c)
            .map(|(byte, _)| *byte),
    }
}

/// A code to char table for a simple font.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleEncoding {
    table: [Option<char>; 256],
}

impl SimpleEncoding {
    /// `WinAnsiEncoding`.
    pub fn win_ansi() -> Self {
        let mut table = [None; 256];
        for code in (0x20u8..=0x7E).chain(0xA0..=0xFF) {
            table[usize::from(code)] = Some(char::from(code));
        }
        for (code, c) in WIN_ANSI_HIGH {
            table[usize::from(code)] = Some(c);
        }
        Self { table }
    }

    /// `StandardEncoding`, limited to its ASCII range.
    pub fn standard() -> Self {
        let mut table = [None; 256];
        for code in 0x20u8..=0x7E {
            table[usize::from(code)] = Some(char::from(code));
        }
        table[0x27] = Some('\u{2019}');
        table[0x60] = Some('\u{2018}');
        Self { table }
    }

    fn from_base_name(name: &[u8]) -> Option<Self> {
        match name {
            b"WinAnsiEncoding" => Some(Self::win_ansi()),
            b"StandardEncoding" => Some(Self::standard()),
            _ => None,
        }
    }

    /// Resolve a font's `/Encoding` entry.
    ///
    /// Returns `None` when the font has no encoding or names one that is not
    /// supported; callers then fall back to the raw code.
    pub fn from_font(doc: &Document, font: &Dictionary) -> Option<Self> {
        let encoding = resolve(doc, font.get(b"Encoding").ok()?);
        match encoding {
            Object::Name(name) => Self::from_base_name(name),
            Object::Dictionary(dict) => {
                let mut enc = dict
                    .get(b"BaseEncoding")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .and_then(Self::from_base_name)
                    .unwrap_or_else(Self::standard);
                if let Ok(diffs) = dict.get(b"Differences") {
                    if let Ok(arr) = resolve(doc, diffs).as_array() {
                        enc.apply_differences(arr);
                    }
                }
                Some(enc)
            }
            _ => None,
        }
    }

    /// Apply a `/Differences` array: a code followed by glyph names for
    /// consecutive codes, repeated.
    pub fn apply_differences(&mut self, differences: &[Object]) {
        let mut code: usize = 0;
        for item in differences {
            match item {
                Object::Integer(n) => code = usize::try_from(*n).unwrap_or(usize::MAX),
                Object::Name(name) => {
                    if let Some(slot) = self.table.get_mut(code) {
                        *slot = std::str::from_utf8(name)
                            .ok()
                            .and_then(glyph_name_to_char);
                    }
                    code = code.saturating_add(1);
                }
                _ => {}
            }
        }
    }

    pub fn decode(&self, code: u8) -> Option<char> {
        self.table[usize::from(code)]
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}
