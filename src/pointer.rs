//! Triangular pointer geometry, recomputed from the live animated value
//! on every frame.

use crate::geometry::{polar_to_cartesian, Point};

/// Maps a percentage onto the pointer direction in degrees.
///
/// The lower half of the range sweeps 270°..360° and the upper half
/// wraps around to 0°..90°, so the pointer crosses the top of the dial.
pub fn pointer_angle(percent: f64) -> f64 {
    if percent < 50.0 {
        ((percent * 2.0) / 100.0) * 90.0 + 270.0
    } else {
        ((percent - 50.0) / 50.0) * 90.0
    }
}

/// Tip and base vertices of the pointer triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPolygon {
    pub tip: Point,
    pub right: Point,
    pub left: Point,
}

impl PointerPolygon {
    /// Closed path descriptor: tip, right base, left base.
    pub fn d(&self) -> String {
        format!(
            "M {} {} L {} {} L {} {} Z",
            self.tip.x, self.tip.y, self.right.x, self.right.y, self.left.x, self.left.y
        )
    }

    pub fn vertices(&self) -> [Point; 3] {
        [self.tip, self.right, self.left]
    }
}

/// Computes the pointer triangle. `percent` is used as is; callers clamp.
pub fn pointer_polygon(
    percent: f64,
    center_x: f64,
    center_y: f64,
    tip_radius: f64,
    base_radius: f64,
) -> PointerPolygon {
    let angle = pointer_angle(percent);
    let lower_half = percent < 50.0;
    // base corners sit a quarter turn either side of the tip
    let r_angle = if lower_half { angle - 90.0 } else { angle + 90.0 };
    let l_angle = if lower_half {
        r_angle - 180.0
    } else {
        r_angle + 180.0
    };

    PointerPolygon {
        tip: polar_to_cartesian(center_x, center_y, tip_radius, angle),
        right: polar_to_cartesian(center_x, center_y, base_radius, r_angle),
        left: polar_to_cartesian(center_x, center_y, base_radius, l_angle),
    }
}

/// SVG path for the pointer at `percent`.
pub fn calculate_rotation(
    percent: f64,
    center_x: f64,
    center_y: f64,
    tip_radius: f64,
    base_radius: f64,
) -> String {
    pointer_polygon(percent, center_x, center_y, tip_radius, base_radius).d()
}
