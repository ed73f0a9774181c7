//! `/ToUnicode` CMap parsing.
//!
//! Supports `bfchar` and `bfrange` sections (both the incrementing form and the
//! array form) with UTF-16BE destination strings, and reads the
//! `codespacerange` to learn how many bytes a character code takes.

use std::collections::HashMap;

use crate::error::BackendError;

/// Most codes a single range entry may cover: one full two-byte plane.
pub(crate) const MAX_RANGE_CODES: u32 = 0x1_0000;

/// Whether `lo..=hi` is small enough to expand code by code.
pub(crate) fn range_within_limit(lo: u32, hi: u32) -> bool {
    hi < lo || hi - lo < MAX_RANGE_CODES
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Hex(Vec<u8>),
    Keyword(String),
    ArrayStart,
    ArrayEnd,
}

fn tokenize(data: &[u8]) -> Result<Vec<Token>, BackendError> {
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < data.len() {
        match data[i] {
            b'%' => {
                while i < data.len() && data[i] != b'\n' && data[i] != b'\r' {
                    i += 1;
                }
            }
            b'<' if data.get(i + 1) == Some(&b'<') => i += 2,
            b'>' if data.get(i + 1) == Some(&b'>') => i += 2,
            b'<' => {
                let end = data[i..]
                    .iter()
                    .position(|b| *b == b'>')
                    .map(|p| i + p)
                    .ok_or_else(|| BackendError::Font("unterminated hex string in CMap".into()))?;
                tokens.push(Token::Hex(decode_hex(&data[i + 1..end])?));
                i = end + 1;
            }
            b'[' => {
                tokens.push(Token::ArrayStart);
                i += 1;
            }
            b']' => {
                tokens.push(Token::ArrayEnd);
                i += 1;
            }
            b'(' => {
                // Literal strings only appear in the header; skip them.
                let mut depth = 0usize;
                while i < data.len() {
                    match data[i] {
                        b'\\' => i += 1,
                        b'(' => depth += 1,
                        b')' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    i += 1;
                }
                i += 1;
            }
            b if b.is_ascii_whitespace() => i += 1,
            _ => {
                let start = i;
                while i < data.len()
                    && !data[i].is_ascii_whitespace()
                    && !b"<>[]()%/".contains(&data[i])
                {
                    i += 1;
                }
                if i == start {
                    // lone delimiter such as a name slash
                    i += 1;
                    continue;
                }
                tokens.push(Token::Keyword(
                    String::from_utf8_lossy(&data[start..i]).into_owned(),
                ));
            }
        }
    }
    Ok(tokens)
}

fn decode_hex(digits: &[u8]) -> Result<Vec<u8>, BackendError> {
    let digits: Vec<u8> = digits
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    digits
        .chunks(2)
        .map(|pair| {
            let hi = hex_value(pair[0])?;
            let lo = match pair.get(1) {
                Some(b) => hex_value(*b)?,
                None => 0,
            };
            Ok(hi << 4 | lo)
        })
        .collect()
}

fn hex_value(b: u8) -> Result<u8, BackendError> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        _ => Err(BackendError::Font(format!(
            "invalid hex digit '{}' in CMap",
            char::from(b)
        ))),
    }
}

fn code_of(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, b| acc << 8 | u32::from(*b))
}

fn utf16be(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            [single] => u16::from(*single),
            _ => 0,
        })
        .collect();
    char::decode_utf16(units)
        .map(|r| r.unwrap_or('\u{FFFD}'))
        .collect()
}

/// Add `delta` to the last UTF-16 unit of a destination string.
fn offset_destination(bytes: &[u8], delta: u32) -> Vec<u8> {
    let mut out = bytes.to_vec();
    if out.len() >= 2 {
        let n = out.len();
        let last = u32::from(u16::from_be_bytes([out[n - 2], out[n - 1]])) + delta;
        let [hi, lo] = ((last & 0xFFFF) as u16).to_be_bytes();
        out[n - 2] = hi;
        out[n - 1] = lo;
    } else if let Some(b) = out.first_mut() {
        *b = b.wrapping_add((delta & 0xFF) as u8);
    }
    out
}

/// Character code to Unicode mapping from a `/ToUnicode` stream.
#[derive(Debug, Clone, Default)]
pub struct ToUnicodeCMap {
    mappings: HashMap<u32, String>,
    code_bytes: usize,
}

impl ToUnicodeCMap {
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let tokens = tokenize(data)?;
        let mut cmap = ToUnicodeCMap {
            mappings: HashMap::new(),
            code_bytes: 0,
        };

        let mut i = 0;
        while i < tokens.len() {
            match &tokens[i] {
                Token::Keyword(k) if k == "begincodespacerange" => {
                    i += 1;
                    while let Some(Token::Hex(lo)) = tokens.get(i) {
                        cmap.code_bytes = cmap.code_bytes.max(lo.len());
                        i += 2;
                    }
                }
                Token::Keyword(k) if k == "beginbfchar" => {
                    i += 1;
                    while let (Some(Token::Hex(src)), Some(Token::Hex(dst))) =
                        (tokens.get(i), tokens.get(i + 1))
                    {
                        cmap.mappings.insert(code_of(src), utf16be(dst));
                        i += 2;
                    }
                }
                Token::Keyword(k) if k == "beginbfrange" => {
                    i += 1;
                    while let (Some(Token::Hex(lo)), Some(Token::Hex(hi))) =
                        (tokens.get(i), tokens.get(i + 1))
                    {
                        let (lo, hi) = (code_of(lo), code_of(hi));
                        i += 2;
                        let expand = range_within_limit(lo, hi);
                        if !expand {
                            #[cfg(feature = "tracing")]
                            tracing::warn!(lo, hi, "bfrange too large, skipped");
                        }
                        match tokens.get(i) {
                            Some(Token::Hex(dst)) => {
                                if expand {
                                    for code in lo..=hi {
                                        let bytes = offset_destination(dst, code - lo);
                                        cmap.mappings.insert(code, utf16be(&bytes));
                                    }
                                }
                                i += 1;
                            }
                            Some(Token::ArrayStart) => {
                                i += 1;
                                let mut code = Some(lo);
                                while let Some(Token::Hex(dst)) = tokens.get(i) {
                                    if let Some(c) = code.filter(|c| *c <= hi) {
                                        cmap.mappings.insert(c, utf16be(dst));
                                    }
                                    code = code.and_then(|c| c.checked_add(1));
                                    i += 1;
                                }
                                if tokens.get(i) == Some(&Token::ArrayEnd) {
                                    i += 1;
                                }
                            }
                            _ => break,
                        }
                    }
                }
                _ => i += 1,
            }
        }
        Ok(cmap)
    }

    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    /// Bytes per code from the codespace range, if one was declared.
    pub fn code_bytes(&self) -> Option<usize> {
        (self.code_bytes > 0).then_some(self.code_bytes)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n\
        /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
        /CMapName /Adobe-Identity-UCS def\n";

    fn cmap(body: &str) -> ToUnicodeCMap {
        let src = format!("{HEADER}{body}\nendcmap\nCMapName currentdict /CMap defineresource pop\nend\nend");
        ToUnicodeCMap::parse(src.as_bytes()).unwrap()
    }

    #[test]
    fn bfchar_entries() {
        let map = cmap("2 beginbfchar\n<0003> <0020>\n<0024> <0041>\nendbfchar");
        assert_eq!(map.lookup(3), Some(" "));
        assert_eq!(map.lookup(0x24), Some("A"));
        assert_eq!(map.lookup(0x25), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn bfchar_ligature_and_surrogates() {
        let map = cmap("2 beginbfchar\n<01> <00660069>\n<02> <D83DDE00>\nendbfchar");
        assert_eq!(map.lookup(1), Some("fi"));
        assert_eq!(map.lookup(2), Some("\u{1F600}"));
    }

    #[test]
    fn bfrange_incrementing() {
        let map = cmap("1 beginbfrange\n<0041> <0043> <0061>\nendbfrange");
        assert_eq!(map.lookup(0x41), Some("a"));
        assert_eq!(map.lookup(0x42), Some("b"));
        assert_eq!(map.lookup(0x43), Some("c"));
    }

    #[test]
    fn bfrange_array() {
        let map = cmap("1 beginbfrange\n<10> <12> [<0058> <0059> <005A>]\nendbfrange");
        assert_eq!(map.lookup(0x10), Some("X"));
        assert_eq!(map.lookup(0x12), Some("Z"));
    }

    #[test]
    fn oversized_bfrange_is_skipped() {
        let map = cmap(
            "2 beginbfrange\n<00000000> <FFFFFFFF> <0041>\n<0041> <0042> <0061>\nendbfrange",
        );
        assert_eq!(map.len(), 2);
        assert_eq!(map.lookup(0x41), Some("a"));
        assert_eq!(map.lookup(0x42), Some("b"));
        assert_eq!(map.lookup(0), None);
    }

    #[test]
    fn full_plane_bfrange_is_expanded() {
        let map = cmap("1 beginbfrange\n<0000> <FFFF> <0000>\nendbfrange");
        assert_eq!(map.len(), 0x1_0000);
    }

    #[test]
    fn codespace_width() {
        let map = cmap("1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange");
        assert_eq!(map.code_bytes(), Some(2));
        assert_eq!(cmap("").code_bytes(), None);
        assert!(cmap("").is_empty());
    }

    #[test]
    fn bad_hex_is_an_error() {
        let err = ToUnicodeCMap::parse(b"1 beginbfchar <0G> <0041> endbfchar").unwrap_err();
        assert!(err.to_string().contains("invalid hex digit"));
    }
}
