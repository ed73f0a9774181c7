//! Page coordinate normalization for `/Rotate` and `/CropBox`.
//!
//! PDF user space has its origin at the bottom left of the MediaBox. Words and
//! lines are reported in display space: the visible (cropped, rotated) page
//! with its origin at the top left and y growing downward.

use unredact_core::{BBox, Ctm, Point};

/// Maps PDF user space onto the visible page.
///
/// ```
/// use unredact_core::BBox;
/// use unredact_parse::PageGeometry;
///
/// let geo = PageGeometry::new(BBox::new(0.0, 0.0, 612.0, 792.0), None, 0);
/// assert_eq!(geo.width(), 612.0);
/// assert_eq!(geo.normalize_point(72.0, 720.0), (72.0, 72.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    rotation: i32,
    width: f64,
    height: f64,
    to_display: Ctm,
}

impl PageGeometry {
    /// `media_box` and `crop_box` are raw PDF rectangles packed into a
    /// [`BBox`] (`top` holds the lower y). `rotation` is the `/Rotate` value;
    /// anything other than a multiple of 90 is treated as 0.
    pub fn new(media_box: BBox, crop_box: Option<BBox>, rotation: i32) -> Self {
        let rotation = match rotation.rem_euclid(360) {
            r @ (90 | 180 | 270) => r,
            _ => 0,
        };
        let (mx0, my0) = (media_box.x0, media_box.top);
        let (nw, nh) = (media_box.width(), media_box.height());

        let crop = crop_box.unwrap_or(media_box);
        let (cx0, cy0) = (crop.x0 - mx0, crop.top - my0);
        let (cx1, cy1) = (crop.x1 - mx0, crop.bottom - my0);

        // crop corners after rotation, still bottom-left origin
        let (rx0, ry0, rx1, ry1) = match rotation {
            90 => (cy0, nw - cx1, cy1, nw - cx0),
            180 => (nw - cx1, nh - cy1, nw - cx0, nh - cy0),
            270 => (nh - cy1, cx0, nh - cy0, cx1),
            _ => (cx0, cy0, cx1, cy1),
        };

        let to_display = match rotation {
            90 => Ctm::new(0.0, -1.0, 1.0, 0.0, -my0 - rx0, nw + mx0 - ry0),
            180 => Ctm::new(-1.0, 0.0, 0.0, -1.0, nw + mx0 - rx0, nh + my0 - ry0),
            270 => Ctm::new(0.0, 1.0, -1.0, 0.0, nh + my0 - rx0, -mx0 - ry0),
            _ => Ctm::translation(-mx0 - rx0, -my0 - ry0),
        };

        Self {
            rotation,
            width: rx1 - rx0,
            height: ry1 - ry0,
            to_display,
        }
    }

    /// Visible width after rotation and cropping.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Visible height after rotation and cropping.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Normalized rotation: 0, 90, 180 or 270.
    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    /// User space to the visible page with a bottom-left origin.
    ///
    /// Used as the `/Matrix` of a Form XObject that redraws the page, so
    /// the crop origin lands at `(0, 0)` and rotation is already applied.
    pub fn display_matrix(&self) -> Ctm {
        self.to_display
    }

    /// User space to top-left display space.
    pub fn normalize_point(&self, x: f64, y: f64) -> (f64, f64) {
        let p = self.to_display.transform_point(Point::new(x, y));
        (p.x, self.height - p.y)
    }

    /// Display-space box covering the given user-space points.
    pub fn normalize_points<I>(&self, points: I) -> Option<BBox>
    where
        I: IntoIterator<Item = Point>,
    {
        BBox::from_points(points.into_iter().map(|p| {
            let (x, y) = self.normalize_point(p.x, p.y);
            Point::new(x, y)
        }))
    }
}
