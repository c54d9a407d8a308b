//! Angular layout of the colored arc segments.

/// Nominal gap between two neighbouring segments, in degrees.
pub const SEGMENT_GAP: f64 = 2.0;

/// Angle where the first segment starts (left horizontal).
pub const ARC_START: f64 = 270.0;

/// Total sweep of the gauge arc.
pub const ARC_SWEEP: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub id: usize,
    pub color_index: usize,
    pub start: f64,
    pub end: f64,
}

/// Rounds half toward positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Splits the 180° gauge arc into `number_of_segments` slices.
///
/// Every slice gets the same integer width. The gap between slices is
/// then widened or narrowed so the last slice ends exactly at 450°.
pub fn build_arc_segments(number_of_segments: usize) -> Vec<ArcSegment> {
    if number_of_segments == 0 {
        return Vec::new();
    }
    let n = number_of_segments as f64;
    let len = round_half_up((ARC_SWEEP - SEGMENT_GAP * (n - 1.0)) / n);
    // a single segment has no neighbour to space from
    let revised_gap = if number_of_segments > 1 {
        (ARC_SWEEP - len * n) / (n - 1.0)
    } else {
        0.0
    };

    let mut segments: Vec<ArcSegment> = Vec::with_capacity(number_of_segments);
    for id in 0..number_of_segments {
        let start = match segments.last() {
            Some(previous) => previous.end + revised_gap,
            None => ARC_START,
        };
        segments.push(ArcSegment {
            id,
            color_index: id,
            start,
            end: start + len,
        });
    }
    segments
}
