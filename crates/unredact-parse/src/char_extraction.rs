//! Turns interpreter [`CharEvent`]s into positioned [`Char`]s.

use unredact_core::{Char, Ctm, Point};

use crate::handler::CharEvent;
use crate::page_geometry::PageGeometry;

/// Place one glyph on the page.
///
/// The glyph box spans the advance width horizontally and from descent to
/// ascent vertically, in glyph space. It is carried to user space by the text
/// rendering matrix `Trm = [Tfs·Th 0 0 Tfs 0 Trise] × Tm × CTM`, then into
/// top-left display space by `geometry`. Rotated or skewed text gets the
/// axis-aligned box around the transformed corners.
pub fn char_from_event(event: &CharEvent, geometry: &PageGeometry) -> Char {
    let font_matrix = Ctm::new(
        event.font_size * event.h_scaling,
        0.0,
        0.0,
        event.font_size,
        0.0,
        event.rise,
    );
    let trm = font_matrix.concat(&event.text_matrix).concat(&event.ctm);

    let w = event.displacement / 1000.0;
    let (lo, hi) = (event.descent / 1000.0, event.ascent / 1000.0);
    let corners = [(0.0, lo), (w, lo), (w, hi), (0.0, hi)]
        .map(|(x, y)| trm.transform_point(Point::new(x, y)));
    let bbox = geometry
        .normalize_points(corners)
        .unwrap_or_default();

    let text = event.unicode.clone().unwrap_or_else(|| {
        char::from_u32(event.char_code)
            .unwrap_or(char::REPLACEMENT_CHARACTER)
            .to_string()
    });

    Char {
        text,
        bbox,
        fontname: event.font_name.clone(),
        size: trm.vertical_scale(),
        upright: trm.b.abs() < 1e-6 && trm.c.abs() < 1e-6,
        char_code: event.char_code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unredact_core::BBox;

    fn letter() -> PageGeometry {
        PageGeometry::new(BBox::new(0.0, 0.0, 612.0, 792.0), None, 0)
    }

    fn event() -> CharEvent {
        CharEvent {
            char_code: 65,
            unicode: Some("A".into()),
            font_name: "Helvetica".into(),
            font_size: 12.0,
            text_matrix: Ctm::translation(72.0, 720.0),
            ctm: Ctm::identity(),
            displacement: 667.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 1.0,
            rise: 0.0,
            ascent: 750.0,
            descent: -250.0,
        }
    }

    fn assert_bbox(actual: BBox, expected: BBox) {
        let pairs = [
            (actual.x0, expected.x0),
            (actual.top, expected.top),
            (actual.x1, expected.x1),
            (actual.bottom, expected.bottom),
        ];
        assert!(
            pairs.iter().all(|(a, e)| (a - e).abs() < 1e-6),
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn horizontal_glyph() {
        let ch = char_from_event(&event(), &letter());
        assert_eq!(ch.text, "A");
        // baseline at 792 - 720 = 72; ascent 9pt above, descent 3pt below
        assert_bbox(ch.bbox, BBox::new(72.0, 63.0, 80.004, 75.0));
        assert_eq!(ch.size, 12.0);
        assert!(ch.upright);
        assert_eq!(ch.fontname, "Helvetica");
    }

    #[test]
    fn rise_shifts_box_up() {
        let ch = char_from_event(&CharEvent { rise: 5.0, ..event() }, &letter());
        assert_bbox(ch.bbox, BBox::new(72.0, 58.0, 80.004, 70.0));
    }

    #[test]
    fn horizontal_scaling_narrows_box() {
        let ch = char_from_event(&CharEvent { h_scaling: 0.5, ..event() }, &letter());
        assert!((ch.bbox.width() - 4.002).abs() < 1e-6);
        assert_eq!(ch.size, 12.0);
    }

    #[test]
    fn scaled_text_matrix_scales_size() {
        let ch = char_from_event(
            &CharEvent {
                font_size: 1.0,
                text_matrix: Ctm::new(12.0, 0.0, 0.0, 12.0, 72.0, 720.0),
                ..event()
            },
            &letter(),
        );
        assert!((ch.size - 12.0).abs() < 1e-9);
        assert_bbox(ch.bbox, BBox::new(72.0, 63.0, 80.004, 75.0));
    }

    #[test]
    fn ctm_applies_after_text_matrix() {
        let ch = char_from_event(
            &CharEvent {
                text_matrix: Ctm::identity(),
                ctm: Ctm::translation(100.0, 500.0),
                ..event()
            },
            &letter(),
        );
        assert!((ch.bbox.x0 - 100.0).abs() < 1e-9);
        assert!((ch.bbox.bottom - 295.0).abs() < 1e-9);
    }

    #[test]
    fn rotated_text_is_not_upright() {
        let ch = char_from_event(
            &CharEvent {
                text_matrix: Ctm::new(0.0, 1.0, -1.0, 0.0, 300.0, 300.0),
                ..event()
            },
            &letter(),
        );
        assert!(!ch.upright);
        // width runs vertically now
        assert!((ch.bbox.height() - 8.004).abs() < 1e-6);
        assert!((ch.bbox.width() - 12.0).abs() < 1e-6);
    }

    #[test]
    fn missing_unicode_falls_back_to_code() {
        let ch = char_from_event(&CharEvent { unicode: None, char_code: 0x42, ..event() }, &letter());
        assert_eq!(ch.text, "B");
        let ch = char_from_event(
            &CharEvent { unicode: None, char_code: 0xD800, ..event() },
            &letter(),
        );
        assert_eq!(ch.text, "\u{FFFD}");
    }

    #[test]
    fn zero_font_size() {
        let ch = char_from_event(&CharEvent { font_size: 0.0, ..event() }, &letter());
        assert_eq!(ch.size, 0.0);
        assert_eq!(ch.bbox.width(), 0.0);
    }
}
