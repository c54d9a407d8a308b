//! Polar/Cartesian conversion and SVG arc descriptors.
//!
//! Angles are in degrees with 0° pointing up and growing clockwise on
//! screen, the same convention SVG rotations use.

use std::f64::consts::PI;

/// A point in gauge (viewBox) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Layout size of the gauge, derived from the available width.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    /// Whether a usable layout has been measured. Rendering is suspended otherwise.
    pub fn is_measured(&self) -> bool {
        self.width != 0.0 && self.height != 0.0 && !self.width.is_nan() && !self.height.is_nan()
    }
}

pub fn update_dimensions(parent_width: f64) -> Dimensions {
    Dimensions {
        width: parent_width,
        height: parent_width / 2.0,
    }
}

pub fn polar_to_cartesian(cx: f64, cy: f64, radius: f64, angle_in_degrees: f64) -> Point {
    let angle_in_radians = (angle_in_degrees - 90.0) * PI / 180.0;
    Point {
        x: cx + radius * angle_in_radians.cos(),
        y: cy + radius * angle_in_radians.sin(),
    }
}

/// Builds an SVG path drawing a circular arc between two angles.
///
/// The path starts at the `end_angle` point and sweeps back to the
/// `start_angle` point with the sweep flag fixed at `0`. The large-arc
/// flag is set only when the span exceeds 180°.
pub fn describe_arc(x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) -> String {
    let start = polar_to_cartesian(x, y, radius, end_angle);
    let end = polar_to_cartesian(x, y, radius, start_angle);

    let large_arc_flag = if end_angle - start_angle <= 180.0 { "0" } else { "1" };

    format!(
        "M {} {} A {} {} 0 {} 0 {} {}",
        start.x, start.y, radius, radius, large_arc_flag, end.x, end.y
    )
}

/// Arc geometry kept around so it can be written as a path descriptor
/// or rasterized directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcPath {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl ArcPath {
    pub fn new(cx: f64, cy: f64, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            cx,
            cy,
            radius,
            start_angle,
            end_angle,
        }
    }

    pub fn d(&self) -> String {
        describe_arc(
            self.cx,
            self.cy,
            self.radius,
            self.start_angle,
            self.end_angle,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn zero_degrees_points_up() {
        let p = polar_to_cartesian(100.0, 100.0, 50.0, 0.0);
        assert_close(p.x, 100.0);
        assert_close(p.y, 50.0);
    }

    #[test]
    fn ninety_degrees_points_right() {
        let p = polar_to_cartesian(0.0, 0.0, 10.0, 90.0);
        assert_close(p.x, 10.0);
        assert_close(p.y, 0.0);

        let left = polar_to_cartesian(0.0, 0.0, 10.0, 270.0);
        assert_close(left.x, -10.0);
        assert_close(left.y, 0.0);
    }

    #[test]
    fn negative_radius_mirrors_through_center() {
        let p = polar_to_cartesian(5.0, 5.0, -3.0, 0.0);
        assert_close(p.x, 5.0);
        assert_close(p.y, 8.0);
    }

    #[test]
    fn conversion_is_pure() {
        let a = polar_to_cartesian(1.5, -2.0, 7.25, 123.0);
        let b = polar_to_cartesian(1.5, -2.0, 7.25, 123.0);
        assert_eq!(a, b);
    }

    #[test]
    fn large_arc_flag_flips_past_180() {
        let half = describe_arc(0.0, 0.0, 10.0, 0.0, 180.0);
        let over = describe_arc(0.0, 0.0, 10.0, 0.0, 181.0);
        let flag = |d: &str| d.split(' ').nth(7).map(str::to_owned);
        assert_eq!(flag(&half).as_deref(), Some("0"));
        assert_eq!(flag(&over).as_deref(), Some("1"));
    }

    #[test]
    fn arc_is_drawn_from_end_to_start() {
        // start 90° is (10, 0), end 270° is (-10, 0); the path must begin at the end point
        let d = describe_arc(0.0, 0.0, 10.0, 90.0, 270.0);
        let parts: Vec<f64> = d
            .split(' ')
            .filter_map(|token| token.parse::<f64>().ok())
            .collect();
        assert_close(parts[0], -10.0);
        assert_close(parts[7], 10.0);
        assert!(d.starts_with("M "));
        assert!(d.contains(" A 10 10 0 0 0 "));
    }

    #[test]
    fn zero_length_arc_starts_and_ends_together() {
        let d = describe_arc(0.0, 0.0, 4.0, 45.0, 45.0);
        let parts: Vec<&str> = d.split(' ').collect();
        assert_eq!(parts[1], parts[9]);
        assert_eq!(parts[2], parts[10]);
    }

    #[test]
    fn dimensions_follow_width() {
        assert_eq!(
            update_dimensions(300.0),
            Dimensions {
                width: 300.0,
                height: 150.0
            }
        );
        assert!(!update_dimensions(0.0).is_measured());
        assert!(update_dimensions(1.0).is_measured());
    }

    #[test]
    fn arc_path_matches_describe_arc() {
        let arc = ArcPath::new(0.0, 0.0, 10.0, 270.0, 450.0);
        assert_eq!(arc.d(), describe_arc(0.0, 0.0, 10.0, 270.0, 450.0));
    }
}
