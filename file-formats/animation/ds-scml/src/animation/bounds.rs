//! Per-frame bounding box accumulation

use glam::Affine2;

use crate::descriptor::{BuildFrame, FrameBounds};

/// Axis-aligned extent, min/max form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Extent {
    /// Extent of an atlas frame placed by `transform`
    ///
    /// The frame's corners are taken relative to its placement offset and
    /// spanned by the transform's basis vectors scaled to pixel size.
    pub fn of_placement(frame: &BuildFrame, transform: &Affine2) -> Self {
        let w = frame.width as f32;
        let h = frame.height as f32;
        let [a, b] = transform.matrix2.x_axis.to_array();
        let [c, d] = transform.matrix2.y_axis.to_array();
        let [tx, ty] = transform.translation.to_array();

        let x0 = tx - w / 2.0 + frame.x;
        let y0 = ty - h / 2.0 + frame.y;
        let xs = [x0, x0 + a * w, x0 + c * h, x0 + a * w + c * h];
        let ys = [y0, y0 + b * w, y0 + d * h, y0 + b * w + d * h];

        Self {
            min_x: xs.iter().copied().fold(f32::INFINITY, f32::min),
            min_y: ys.iter().copied().fold(f32::INFINITY, f32::min),
            max_x: xs.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            max_y: ys.iter().copied().fold(f32::NEG_INFINITY, f32::max),
        }
    }

    /// Whether `other` lies entirely inside this extent
    pub fn contains(&self, other: &Extent) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }
}

/// Running bounding box of the sprites placed in one tick
///
/// The first placement seeds the box, later placements only push each side
/// outwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingBoxAccumulator {
    extent: Option<Extent>,
}

impl BoundingBoxAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the box to include a placed atlas frame
    pub fn extend(&mut self, frame: &BuildFrame, transform: &Affine2) {
        self.extend_extent(Extent::of_placement(frame, transform));
    }

    /// Grow the box to include an extent
    pub fn extend_extent(&mut self, extent: Extent) {
        self.extent = Some(match self.extent {
            None => extent,
            Some(current) => Extent {
                min_x: current.min_x.min(extent.min_x),
                min_y: current.min_y.min(extent.min_y),
                max_x: current.max_x.max(extent.max_x),
                max_y: current.max_y.max(extent.max_y),
            },
        });
    }

    /// Current extent, `None` until something was placed
    pub fn extent(&self) -> Option<Extent> {
        self.extent
    }

    /// Centre and padded size of the box
    ///
    /// Width and height are rounded up, grown by 10% and rounded up again so
    /// edge pixels never get cropped. An empty box yields all zeros.
    pub fn finish(&self) -> FrameBounds {
        let Some(extent) = self.extent else {
            return FrameBounds::default();
        };

        let w = extent.max_x - extent.min_x;
        let h = extent.max_y - extent.min_y;
        FrameBounds {
            x: extent.min_x + w / 2.0,
            y: extent.min_y + h / 2.0,
            w: (w.ceil() * 1.1).ceil(),
            h: (h.ceil() * 1.1).ceil(),
        }
    }
}
