//! Glyph widths for standard Type1 fonts that are commonly referenced
//! without a `/Widths` array.
//!
//! Only printable ASCII (32..=126) is tabulated; values are Adobe AFM widths
//! in 1/1000 em. Codes outside the table fall back to the font's missing width.

const FIRST: u32 = 32;

#[rustfmt::skip]
static HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
static TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Courier,
    Helvetica,
    HelveticaBold,
    TimesRoman,
}

fn family(base_font: &str) -> Option<Family> {
    // Subset tags look like "ABCDEF+Helvetica".
    let name = base_font.split_once('+').map_or(base_font, |(_, rest)| rest);
    match name {
        "Courier" | "Courier-Bold" | "Courier-Oblique" | "Courier-BoldOblique" => {
            Some(Family::Courier)
        }
        "Helvetica" | "Helvetica-Oblique" | "Arial" | "ArialMT" => Some(Family::Helvetica),
        "Helvetica-Bold" | "Helvetica-BoldOblique" | "Arial-BoldMT" => {
            Some(Family::HelveticaBold)
        }
        "Times-Roman" | "TimesNewRomanPSMT" => Some(Family::TimesRoman),
        _ => None,
    }
}

/// Whether `base_font` names a font with built-in widths.
pub fn is_known(base_font: &str) -> bool {
    family(base_font).is_some()
}

/// Width of `code` in a standard font, if tabulated.
pub fn width(base_font: &str, code: u32) -> Option<f64> {
    let table = match family(base_font)? {
        Family::Courier => return Some(600.0),
        Family::Helvetica => &HELVETICA,
        Family::HelveticaBold => &HELVETICA_BOLD,
        Family::TimesRoman => &TIMES_ROMAN,
    };
    let index = code.checked_sub(FIRST)? as usize;
    table.get(index).map(|w| f64::from(*w))
}
