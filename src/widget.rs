//! The gauge widget: owns layout, configuration and the animated value,
//! and assembles the visual tree for each frame.

use std::fmt::Write as _;
use std::time::Duration;

use log::{debug, trace, warn};

use crate::animation::SpringValue;
use crate::color::{get_colors, Color, Paint};
use crate::config::{
    GaugeConfig, HUB_RADIUS, LABEL_HEADROOM, PADDING, POINTER_TIP_FACTOR, R_SCALE,
    SEGMENT_STROKE_WIDTH, TITLE_FONT_SIZE, TITLE_OFFSET, VALUE_FONT_SIZE,
};
use crate::error::GaugeError;
use crate::geometry::{update_dimensions, ArcPath, Dimensions};
use crate::pointer::{pointer_polygon, PointerPolygon};
use crate::segments::{build_arc_segments, ArcSegment};

/// Frame length used when settling the animation outside a render loop.
const SETTLE_FRAME: Duration = Duration::from_millis(16);
const SETTLE_MAX_FRAMES: usize = 10_000;

// ============================================================================
// THEME
// ============================================================================

/// Colors of everything that is not an arc segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub pointer: Paint,
    pub text: Paint,
    pub background: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            pointer: Paint {
                css: "#ccc".to_string(),
                color: Some(Color::from_hex(0xcccccc)),
            },
            text: Paint {
                css: "#474a47".to_string(),
                color: Some(Color::from_hex(0x474a47)),
            },
            background: Color::WHITE,
        }
    }

    pub fn dark() -> Self {
        Self {
            pointer: Paint {
                css: "#989595".to_string(),
                color: Some(Color::from_hex(0x989595)),
            },
            text: Paint {
                css: "#fff".to_string(),
                color: Some(Color::WHITE),
            },
            background: Color::BLACK,
        }
    }

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

// ============================================================================
// VISUAL TREE
// ============================================================================

/// A centered text label; `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub text: String,
    pub paint: Paint,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GaugeElement {
    Pointer {
        polygon: PointerPolygon,
        paint: Paint,
    },
    Hub {
        arc: ArcPath,
        paint: Paint,
    },
    Value(TextLabel),
    Title(TextLabel),
    Segment {
        arc: ArcPath,
        paint: Paint,
        stroke_width: f64,
    },
}

impl GaugeElement {
    fn write_svg(&self, out: &mut String) {
        // writing into a String cannot fail
        let _ = match self {
            GaugeElement::Pointer { polygon, paint } => write!(
                out,
                r#"<path d="{}" stroke="{}" fill="{}"/>"#,
                polygon.d(),
                escape(&paint.css),
                escape(&paint.css)
            ),
            GaugeElement::Hub { arc, paint } => write!(
                out,
                r#"<path d="{}" stroke="{}" fill="{}"/>"#,
                arc.d(),
                escape(&paint.css),
                escape(&paint.css)
            ),
            GaugeElement::Value(label) | GaugeElement::Title(label) => write!(
                out,
                r#"<text fill="{}" stroke="{}" x="{}" y="{}" font-size="{}" text-anchor="middle">{}</text>"#,
                escape(&label.paint.css),
                escape(&label.paint.css),
                label.x,
                label.y,
                label.font_size,
                escape(&label.text)
            ),
            GaugeElement::Segment {
                arc,
                paint,
                stroke_width,
            } => write!(
                out,
                r#"<path d="{}" stroke="{}" stroke-width="{}" stroke-linecap="butt" fill="none"/>"#,
                arc.d(),
                escape(&paint.css),
                stroke_width
            ),
        };
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// One frame of the gauge, in document order: pointer, hub, value text,
/// title text, then the arc segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub dimensions: Dimensions,
    pub background: Color,
    pub elements: Vec<GaugeElement>,
}

impl Scene {
    /// Height of the drawing surface, leaving room for the title.
    pub fn surface_height(&self) -> f64 {
        self.dimensions.height + LABEL_HEADROOM
    }

    pub fn to_svg(&self) -> String {
        let Dimensions { width, height } = self.dimensions;
        let mut out = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" height="{}" width="{}" viewBox="0 0 {} {}"><g>"#,
            self.surface_height(),
            width,
            width,
            height
        );
        for element in &self.elements {
            element.write_svg(&mut out);
        }
        out.push_str("</g></svg>");
        out
    }
}

// ============================================================================
// WIDGET
// ============================================================================

/// Updates a host can push into a running gauge.
#[derive(Debug, Clone, PartialEq)]
pub enum GaugeCommand {
    SetPercent(f64),
    SetDisplayValue(String),
    SetTitle(String),
    SetDarkMode(bool),
}

/// Widget state that changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GaugeState {
    pub dimensions: Dimensions,
    /// Clamped target percent.
    pub percent: f64,
}

pub fn clamp_percent(percent: f64) -> f64 {
    percent.clamp(0.0, 100.0)
}

#[derive(Debug, Clone)]
pub struct Gauge {
    config: GaugeConfig,
    state: GaugeState,
    segments: Vec<ArcSegment>,
    segment_paints: Vec<Paint>,
    animation: SpringValue,
}

fn resolve_segments(config: &GaugeConfig) -> Result<(Vec<ArcSegment>, Vec<Paint>), GaugeError> {
    if config.number_of_segments == 0 {
        return Err(GaugeError::InvalidSegmentCount(0));
    }
    let segments = build_arc_segments(config.number_of_segments);
    let paints: Vec<Paint> = get_colors(&config.colors, config.number_of_segments)?
        .into_iter()
        .map(Paint::new)
        .collect();
    for paint in paints.iter().filter(|p| p.color.is_none()) {
        warn!("segment color `{}` is not a color, it will not be rasterized", paint.css);
    }
    Ok((segments, paints))
}

impl Gauge {
    pub fn new(config: GaugeConfig) -> Result<Self, GaugeError> {
        let (segments, segment_paints) = resolve_segments(&config)?;
        let animation = SpringValue::new(0.0, config.start_delay, config.spring);
        let mut gauge = Self {
            state: GaugeState::default(),
            segments,
            segment_paints,
            animation,
            config,
        };
        gauge.set_percent(gauge.config.percent);
        Ok(gauge)
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn state(&self) -> &GaugeState {
        &self.state
    }

    pub fn segments(&self) -> &[ArcSegment] {
        &self.segments
    }

    /// Resolved segment colors, one per segment.
    pub fn colors(&self) -> Vec<&str> {
        self.segment_paints.iter().map(|p| p.css.as_str()).collect()
    }

    pub fn theme(&self) -> Theme {
        Theme::for_mode(self.config.dark_mode)
    }

    /// Replaces the configuration. On error the gauge keeps its previous one.
    pub fn set_config(&mut self, config: GaugeConfig) -> Result<(), GaugeError> {
        let (segments, segment_paints) = resolve_segments(&config)?;
        debug!(
            "gauge reconfigured: {} segments, colors {:?}",
            segments.len(),
            segment_paints.iter().map(|p| &p.css).collect::<Vec<_>>()
        );
        self.segments = segments;
        self.segment_paints = segment_paints;
        self.animation.retune(config.start_delay, config.spring);
        let percent = config.percent;
        self.config = config;
        self.set_percent(percent);
        Ok(())
    }

    pub fn set_percent(&mut self, percent: f64) {
        let clamped = clamp_percent(percent);
        self.config.percent = percent;
        self.state.percent = clamped;
        self.animation.set_target(clamped);
    }

    /// Handles a width measurement from the host layout.
    pub fn on_layout(&mut self, width: f64) {
        let dimensions = update_dimensions(width);
        if dimensions != self.state.dimensions {
            debug!("gauge layout {}x{}", dimensions.width, dimensions.height);
            self.state.dimensions = dimensions;
        }
    }

    pub fn apply(&mut self, command: GaugeCommand) {
        match command {
            GaugeCommand::SetPercent(percent) => self.set_percent(percent),
            GaugeCommand::SetDisplayValue(text) => self.config.display_value = text,
            GaugeCommand::SetTitle(text) => self.config.title = text,
            GaugeCommand::SetDarkMode(dark_mode) => self.config.dark_mode = dark_mode,
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.animation.tick(dt);
        trace!("gauge animated value {}", self.animation.value());
    }

    /// Runs the animation to rest (or gives up after a bounded number of
    /// frames, which only happens for non-finite targets).
    pub fn settle(&mut self) {
        for _ in 0..SETTLE_MAX_FRAMES {
            if self.animation.is_settled() {
                return;
            }
            self.animation.tick(SETTLE_FRAME);
        }
    }

    pub fn animated_value(&self) -> f64 {
        self.animation.value()
    }

    pub fn is_settled(&self) -> bool {
        self.animation.is_settled()
    }

    fn dial_center(&self) -> (f64, f64) {
        let Dimensions { width, height } = self.state.dimensions;
        (width / 2.0, height * R_SCALE)
    }

    /// Pointer triangle for the current animated value.
    pub fn pointer_polygon(&self) -> PointerPolygon {
        let (cx, cy) = self.dial_center();
        pointer_polygon(
            self.animation.value(),
            cx,
            cy,
            self.state.dimensions.height * POINTER_TIP_FACTOR,
            HUB_RADIUS,
        )
    }

    pub fn pointer_path(&self) -> String {
        self.pointer_polygon().d()
    }

    /// Builds the visual tree, or `None` until a non-zero width is measured.
    pub fn render(&self) -> Option<Scene> {
        let dimensions = self.state.dimensions;
        if !dimensions.is_measured() {
            return None;
        }
        let Dimensions { width, height } = dimensions;
        let (cx, cy) = self.dial_center();
        let theme = self.theme();

        let mut elements = Vec::with_capacity(self.segments.len() + 4);
        elements.push(GaugeElement::Pointer {
            polygon: self.pointer_polygon(),
            paint: theme.pointer.clone(),
        });
        elements.push(GaugeElement::Hub {
            arc: ArcPath::new(cx, cy, HUB_RADIUS, 1.0, 360.0),
            paint: theme.pointer.clone(),
        });
        if !self.config.display_value.is_empty() {
            elements.push(GaugeElement::Value(TextLabel {
                x: width * 0.5,
                y: height * 0.5,
                font_size: VALUE_FONT_SIZE,
                text: self.config.display_value.clone(),
                paint: theme.text.clone(),
            }));
        }
        if !self.config.title.is_empty() {
            elements.push(GaugeElement::Title(TextLabel {
                x: width * 0.5,
                y: height + TITLE_OFFSET,
                font_size: TITLE_FONT_SIZE,
                text: self.config.title.clone(),
                paint: theme.text.clone(),
            }));
        }
        for segment in &self.segments {
            elements.push(GaugeElement::Segment {
                arc: ArcPath::new(cx, cy, cy - PADDING, segment.start, segment.end),
                paint: self.segment_paints[segment.color_index].clone(),
                stroke_width: SEGMENT_STROKE_WIDTH,
            });
        }

        Some(Scene {
            dimensions,
            background: theme.background,
            elements,
        })
    }
}
