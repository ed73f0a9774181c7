//! Output page planning.
//!
//! A [`PagePlan`] describes one composite output page without reference to any
//! PDF library: its size, where the source page lands, and where every line of
//! recovered text is drawn. Coordinates are top-left origin, y downward, the
//! same space as [`LineRecord`].

use std::fmt;
use std::str::FromStr;

use crate::lines::LineRecord;

/// How recovered text is laid out relative to the source page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LayoutMode {
    /// Double-width page: source on the left, black text on the right.
    #[default]
    SideBySide,
    /// Same-size page: white text drawn over the source page.
    OverlayWhite,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::SideBySide => "side_by_side",
            LayoutMode::OverlayWhite => "overlay_white",
        }
    }

    /// Width of the output page for a source page `source_width` wide.
    pub fn page_width(&self, source_width: f64) -> f64 {
        match self {
            LayoutMode::SideBySide => source_width * 2.0,
            LayoutMode::OverlayWhite => source_width,
        }
    }

    /// Horizontal shift applied to every text anchor.
    pub fn text_offset(&self, source_width: f64) -> f64 {
        match self {
            LayoutMode::SideBySide => source_width,
            LayoutMode::OverlayWhite => 0.0,
        }
    }

    pub fn text_color(&self) -> TextColor {
        match self {
            LayoutMode::SideBySide => TextColor::BLACK,
            LayoutMode::OverlayWhite => TextColor::WHITE,
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized mode name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError(pub String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown mode '{}' (expected side_by_side or overlay_white)",
            self.0
        )
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for LayoutMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "side_by_side" => Ok(LayoutMode::SideBySide),
            "overlay_white" => Ok(LayoutMode::OverlayWhite),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// RGB fill color, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl TextColor {
    pub const BLACK: TextColor = TextColor {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: TextColor = TextColor {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
}

/// A string drawn at a baseline anchor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextPlacement {
    pub text: String,
    /// Left edge of the baseline, output page space.
    pub x: f64,
    /// Distance of the baseline from the top of the output page.
    pub y: f64,
    pub size: f64,
}

/// Everything needed to write one composite output page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PagePlan {
    pub mode: LayoutMode,
    /// Displayed size of the source page.
    pub source_width: f64,
    pub source_height: f64,
    /// Size of the output page.
    pub width: f64,
    pub height: f64,
    /// Horizontal offset of the text layer.
    pub offset: f64,
    pub color: TextColor,
    pub placements: Vec<TextPlacement>,
}

impl PagePlan {
    /// Plan a page for `records` extracted from a `source_width × source_height` page.
    ///
    /// Each record anchored at `(x0, top)` with size `s` is drawn at
    /// `(x0 + offset, top + s)`.
    pub fn new(
        mode: LayoutMode,
        source_width: f64,
        source_height: f64,
        records: &[LineRecord],
    ) -> Self {
        let offset = mode.text_offset(source_width);
        let placements = records
            .iter()
            .map(|r| TextPlacement {
                text: r.text.clone(),
                x: r.x0 + offset,
                y: r.top + r.size,
                size: r.size,
            })
            .collect();
        Self {
            mode,
            source_width,
            source_height,
            width: mode.page_width(source_width),
            height: source_height,
            offset,
            color: mode.text_color(),
            placements,
        }
    }

    /// Baseline of `placement` in PDF user space (bottom-left origin).
    pub fn baseline_in_user_space(&self, placement: &TextPlacement) -> (f64, f64) {
        (placement.x, self.height - placement.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_names_round_trip() {
        for mode in [LayoutMode::SideBySide, LayoutMode::OverlayWhite] {
            assert_eq!(mode.as_str().parse::<LayoutMode>(), Ok(mode));
        }
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = "overlay".parse::<LayoutMode>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown mode 'overlay' (expected side_by_side or overlay_white)"
        );
        assert!("SIDE_BY_SIDE".parse::<LayoutMode>().is_err());
    }

    #[test]
    fn widths_and_offsets() {
        assert_eq!(LayoutMode::SideBySide.page_width(300.0), 600.0);
        assert_eq!(LayoutMode::OverlayWhite.page_width(300.0), 300.0);
        assert_eq!(LayoutMode::SideBySide.text_offset(300.0), 300.0);
        assert_eq!(LayoutMode::OverlayWhite.text_offset(300.0), 0.0);
    }

    #[test]
    fn one_color_per_mode() {
        assert_eq!(LayoutMode::SideBySide.text_color(), TextColor::BLACK);
        assert_eq!(LayoutMode::OverlayWhite.text_color(), TextColor::WHITE);
    }

    #[test]
    fn side_by_side_plan_shifts_text() {
        let records = vec![LineRecord::new("REDACTED SECRET", 50.0, 100.0, 12.0)];
        let plan = PagePlan::new(LayoutMode::SideBySide, 300.0, 400.0, &records);
        assert_eq!(plan.width, 600.0);
        assert_eq!(plan.height, 400.0);
        assert_eq!(
            plan.placements,
            vec![TextPlacement {
                text: "REDACTED SECRET".into(),
                x: 350.0,
                y: 112.0,
                size: 12.0,
            }]
        );
        assert_eq!(plan.baseline_in_user_space(&plan.placements[0]), (350.0, 288.0));
    }

    #[test]
    fn overlay_plan_keeps_anchor() {
        let records = vec![LineRecord::new("hidden", 72.0, 200.0, 10.0)];
        let plan = PagePlan::new(LayoutMode::OverlayWhite, 612.0, 792.0, &records);
        assert_eq!(plan.width, 612.0);
        assert_eq!(plan.offset, 0.0);
        assert_eq!(plan.color, TextColor::WHITE);
        assert_eq!(plan.placements[0].x, 72.0);
        assert_eq!(plan.placements[0].y, 210.0);
    }

    #[test]
    fn empty_page_has_no_placements() {
        let plan = PagePlan::new(LayoutMode::SideBySide, 612.0, 792.0, &[]);
        assert!(plan.placements.is_empty());
        assert_eq!(plan.width, 1224.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn mode_serializes_with_cli_names() {
        assert_eq!(
            serde_json::to_string(&LayoutMode::OverlayWhite).unwrap(),
            "\"overlay_white\""
        );
        let mode: LayoutMode = serde_json::from_str("\"side_by_side\"").unwrap();
        assert_eq!(mode, LayoutMode::SideBySide);
    }
}
