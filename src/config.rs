use std::time::Duration;

use bon::Builder;

use crate::animation::SpringConfig;

// ============================================================================
// LAYOUT CONSTANTS
// ============================================================================

/// Vertical position of the dial center, as a fraction of the gauge height.
pub const R_SCALE: f64 = 0.8;
/// Inset of the segment track from the dial center height.
pub const PADDING: f64 = 10.0;
/// Radius of the center hub and of the pointer base.
pub const HUB_RADIUS: f64 = 4.0;
/// Pointer length, as a fraction of the gauge height.
pub const POINTER_TIP_FACTOR: f64 = 0.6;
pub const SEGMENT_STROKE_WIDTH: f64 = 10.0;

pub const VALUE_FONT_SIZE: f64 = 20.0;
pub const TITLE_FONT_SIZE: f64 = 14.0;
/// Distance of the title baseline below the gauge.
pub const TITLE_OFFSET: f64 = 10.0;
/// Extra room below the viewBox so the title is not clipped.
pub const LABEL_HEADROOM: f64 = 25.0;

pub const DEFAULT_START_DELAY: Duration = Duration::from_millis(500);

fn default_colors() -> Vec<String> {
    vec!["#FF0000".to_string(), "#00FF00".to_string()]
}

// ============================================================================
// GAUGE CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Builder)]
pub struct GaugeConfig {
    /// Target value, clamped to [0, 100] when applied.
    #[builder(default = 0.1)]
    pub percent: f64,
    /// Gradient endpoints, or exact per-segment colors when the length
    /// matches `number_of_segments`.
    #[builder(default = default_colors())]
    pub colors: Vec<String>,
    #[builder(default = 3)]
    pub number_of_segments: usize,
    /// Text drawn at the gauge center; omitted when empty.
    #[builder(into, default)]
    pub display_value: String,
    /// Text drawn below the gauge; omitted when empty.
    #[builder(into, default)]
    pub title: String,
    #[builder(default)]
    pub dark_mode: bool,

    // Animation
    #[builder(default = DEFAULT_START_DELAY)]
    pub start_delay: Duration,
    #[builder(default)]
    pub spring: SpringConfig,

    // Window host
    #[builder(default = 300)]
    pub window_width: u32,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    /// TrueType/OpenType font used for the labels in the window host.
    pub font_data: Option<Vec<u8>>,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
