//! Color parsing and hue-aware gradient resolution for the arc segments.
//!
//! Segment colors are plain CSS strings. When the caller supplies fewer
//! or more colors than there are segments, the first and last entries
//! become the endpoints of a gradient that is sampled in HSL space, so a
//! red to green gauge passes through yellow instead of a muddy brown.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("no colors given to build a gradient from")]
    Empty,
    #[error("unrecognized color `{0}`")]
    Invalid(String),
}

/// 8-bit sRGB color with an opacity in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub opacity: f64,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);

    /// Opaque color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            opacity: 1.0,
        }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xff) as u8,
            ((hex >> 8) & 0xff) as u8,
            (hex & 0xff) as u8,
        )
    }

    pub const fn with_opacity(self, opacity: f64) -> Self {
        Self { opacity, ..self }
    }

    /// Parses any CSS color: hex (3, 4, 6 or 8 digits), `rgb[a]()`,
    /// `hsl[a]()`, `hwb()`, named colors and `transparent`.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let parsed = csscolorparser::parse(&input.trim().to_ascii_lowercase())
            .map_err(|_| ColorError::Invalid(input.to_owned()))?;
        let [r, g, b, _] = parsed.to_rgba8();
        Ok(Self {
            r,
            g,
            b,
            opacity: f64::from(parsed.a),
        })
    }

    pub fn to_hsl(self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let min = r.min(g).min(b);
        let max = r.max(g).max(b);
        let chroma = max - min;
        let lightness = (max + min) / 2.0;

        if chroma == 0.0 {
            // grays have no hue; pure black and white have no saturation either
            let saturation = (lightness > 0.0 && lightness < 1.0).then_some(0.0);
            return Hsl {
                hue: None,
                saturation,
                lightness,
                opacity: self.opacity,
            };
        }

        let hue = if r == max {
            (g - b) / chroma + if g < b { 6.0 } else { 0.0 }
        } else if g == max {
            (b - r) / chroma + 2.0
        } else {
            (r - g) / chroma + 4.0
        };
        let saturation = chroma
            / if lightness < 0.5 {
                max + min
            } else {
                2.0 - max - min
            };

        Hsl {
            hue: Some(hue * 60.0),
            saturation: Some(saturation),
            lightness,
            opacity: self.opacity,
        }
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl fmt::Display for Color {
    /// CSS functional notation: `rgb(255, 128, 0)`, or
    /// `rgba(255, 128, 0, 0.5)` when not fully opaque.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opacity = if self.opacity.is_nan() {
            1.0
        } else {
            self.opacity.clamp(0.0, 1.0)
        };
        if opacity == 1.0 {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, opacity)
        }
    }
}

/// HSL color with hue in degrees and saturation/lightness in [0, 1].
///
/// Achromatic colors carry no hue, and black/white carry no saturation.
/// Interpolation borrows the missing component from the other endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: Option<f64>,
    pub saturation: Option<f64>,
    pub lightness: f64,
    pub opacity: f64,
}

impl Hsl {
    pub fn to_color(self) -> Color {
        let hue = self.hue.map(|h| {
            let h = h % 360.0;
            if h < 0.0 {
                h + 360.0
            } else {
                h
            }
        });
        let lightness = self.lightness;
        let (h, saturation) = match (hue, self.saturation) {
            (Some(h), Some(s)) if !h.is_nan() && !s.is_nan() => (h, s),
            _ => (0.0, 0.0),
        };
        let spread = if lightness < 0.5 {
            lightness
        } else {
            1.0 - lightness
        };
        let m2 = lightness + spread * saturation;
        let m1 = 2.0 * lightness - m2;

        let red = hue_to_channel(if h >= 240.0 { h - 240.0 } else { h + 120.0 }, m1, m2);
        let green = hue_to_channel(h, m1, m2);
        let blue = hue_to_channel(if h < 120.0 { h + 240.0 } else { h - 120.0 }, m1, m2);

        Color::new(to_byte(red), to_byte(green), to_byte(blue)).with_opacity(self.opacity)
    }
}

fn hue_to_channel(h: f64, m1: f64, m2: f64) -> f64 {
    let value = if h < 60.0 {
        m1 + (m2 - m1) * h / 60.0
    } else if h < 180.0 {
        m2
    } else if h < 240.0 {
        m1 + (m2 - m1) * (240.0 - h) / 60.0
    } else {
        m1
    };
    value * 255.0
}

/// Rounds half up and clamps into a byte; NaN becomes 0.
fn to_byte(value: f64) -> u8 {
    let rounded = (value + 0.5).floor();
    if rounded.is_nan() {
        0
    } else {
        rounded.clamp(0.0, 255.0) as u8
    }
}

/// Interpolates between two colors in HSL space at `t` in [0, 1].
///
/// Hue travels the short way around the color wheel.
pub fn interpolate_hsl(from: Hsl, to: Hsl, t: f64) -> Hsl {
    let hue = match (from.hue, to.hue) {
        (Some(a), Some(b)) => {
            let mut delta = b - a;
            if delta > 180.0 || delta < -180.0 {
                delta -= 360.0 * (delta / 360.0 + 0.5).floor();
            }
            Some(a + t * delta)
        }
        (a, b) => a.or(b),
    };
    let saturation = match (from.saturation, to.saturation) {
        (Some(a), Some(b)) => Some(a + t * (b - a)),
        (a, b) => a.or(b),
    };
    Hsl {
        hue,
        saturation,
        lightness: from.lightness + t * (to.lightness - from.lightness),
        opacity: from.opacity + t * (to.opacity - from.opacity),
    }
}

/// Resolves exactly one color per segment.
///
/// A list that already has `number_of_segments` entries is returned as is,
/// without being parsed. Otherwise the first and last colors are blended
/// in HSL over the domain `[1, number_of_segments]`, sampled at every
/// integer position.
pub fn get_colors<S: AsRef<str>>(
    colors: &[S],
    number_of_segments: usize,
) -> Result<Vec<String>, ColorError> {
    if colors.len() == number_of_segments {
        return Ok(colors.iter().map(|c| c.as_ref().to_owned()).collect());
    }
    let (first, last) = match (colors.first(), colors.last()) {
        (Some(first), Some(last)) => (first.as_ref(), last.as_ref()),
        _ => return Err(ColorError::Empty),
    };
    let from = Color::parse(first)?.to_hsl();
    let to = Color::parse(last)?.to_hsl();

    let span = number_of_segments as f64 - 1.0;
    Ok((1..=number_of_segments)
        .map(|i| {
            // a one-point domain samples the middle of the range
            let t = if span == 0.0 {
                0.5
            } else {
                (i as f64 - 1.0) / span
            };
            interpolate_hsl(from, to, t).to_color().to_string()
        })
        .collect())
}

/// A CSS color string kept next to its parsed value, so the same paint
/// can be written into SVG and rasterized.
///
/// `color` is `None` when the string is not a color. The SVG still
/// carries it verbatim; the rasterizer leaves the element unpainted.
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub css: String,
    pub color: Option<Color>,
}

impl Paint {
    pub fn new(css: impl Into<String>) -> Self {
        let css = css.into();
        let color = Color::parse(&css).ok();
        Self { css, color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_syntaxes() {
        assert_eq!(Color::parse("#FF0000"), Ok(Color::new(255, 0, 0)));
        assert_eq!(Color::parse("#ccc"), Ok(Color::new(0xcc, 0xcc, 0xcc)));
        assert_eq!(Color::parse(" Lime "), Ok(Color::new(0, 255, 0)));
        assert_eq!(Color::parse("rgb(1, 2, 3)"), Ok(Color::new(1, 2, 3)));
        assert_eq!(Color::parse("rgb(255 0 0)"), Ok(Color::new(255, 0, 0)));
        assert_eq!(Color::parse("rgb(100%, 0%, 0%)"), Ok(Color::new(255, 0, 0)));
        assert_eq!(Color::parse("hsl(120, 100%, 50%)"), Ok(Color::new(0, 255, 0)));
        assert_eq!(Color::parse("hsl(120deg, 100%, 50%)"), Ok(Color::new(0, 255, 0)));
        assert_eq!(
            Color::parse("#12345"),
            Err(ColorError::Invalid("#12345".to_string()))
        );
        assert!(Color::parse("not-a-color").is_err());
    }

    #[test]
    fn parses_translucent_colors() {
        let half = Color::parse("rgba(255, 0, 0, 0.5)").unwrap();
        assert_eq!(half, Color::new(255, 0, 0).with_opacity(0.5));

        let hex = Color::parse("#ff000080").unwrap();
        assert_eq!((hex.r, hex.g, hex.b), (255, 0, 0));
        assert!((hex.opacity - 128.0 / 255.0).abs() < 1e-6);

        let short = Color::parse("#f008").unwrap();
        assert_eq!((short.r, short.g, short.b), (255, 0, 0));
        assert!((short.opacity - 136.0 / 255.0).abs() < 1e-6);

        assert_eq!(Color::parse("transparent").unwrap().opacity, 0.0);
    }

    #[test]
    fn display_includes_opacity_only_when_translucent() {
        assert_eq!(Color::new(1, 2, 3).to_string(), "rgb(1, 2, 3)");
        assert_eq!(
            Color::new(1, 2, 3).with_opacity(0.25).to_string(),
            "rgba(1, 2, 3, 0.25)"
        );
        assert_eq!(Color::new(1, 2, 3).with_opacity(f64::NAN).to_string(), "rgb(1, 2, 3)");
    }

    #[test]
    fn gradient_accepts_translucent_endpoints() {
        let resolved = get_colors(&["rgba(255, 0, 0, 0.5)", "#00ff00"], 3).unwrap();
        assert_eq!(
            resolved,
            vec![
                "rgba(255, 0, 0, 0.5)",
                "rgba(255, 255, 0, 0.75)",
                "rgb(0, 255, 0)"
            ]
        );
        let hex = get_colors(&["#ff000080", "#00ff00"], 3).unwrap();
        assert_eq!(hex.len(), 3);
        assert!(hex[0].starts_with("rgba(255, 0, 0, 0.50"));
        assert_eq!(hex[2], "rgb(0, 255, 0)");
    }

    #[test]
    fn paint_keeps_unparseable_css() {
        let paint = Paint::new("bogus");
        assert_eq!(paint.css, "bogus");
        assert_eq!(paint.color, None);
        assert_eq!(Paint::new("#ccc").color, Some(Color::from_hex(0xcccccc)));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let color = Color::new(12, 200, 7);
        assert_eq!(color.to_string(), "rgb(12, 200, 7)");
        assert_eq!(color.to_string().parse::<Color>(), Ok(color));
    }

    #[test]
    fn hsl_conversion_keeps_primary_colors() {
        for color in [
            Color::new(255, 0, 0),
            Color::new(0, 255, 0),
            Color::new(0, 0, 255),
            Color::new(0x47, 0x4a, 0x47),
        ] {
            assert_eq!(color.to_hsl().to_color(), color);
        }
        let white = Color::WHITE.to_hsl();
        assert_eq!(white.hue, None);
        assert_eq!(white.saturation, None);
        let gray = Color::new(128, 128, 128).to_hsl();
        assert_eq!(gray.saturation, Some(0.0));
    }

    #[test]
    fn same_length_is_identity() {
        let colors = ["#abc", "bogus", "whatever"];
        assert_eq!(
            get_colors(&colors, 3),
            Ok(vec![
                "#abc".to_string(),
                "bogus".to_string(),
                "whatever".to_string()
            ])
        );
    }

    #[test]
    fn red_to_green_passes_through_yellow() {
        let resolved = get_colors(&["#FF0000", "#00FF00"], 3).unwrap();
        assert_eq!(
            resolved,
            vec!["rgb(255, 0, 0)", "rgb(255, 255, 0)", "rgb(0, 255, 0)"]
        );
    }

    #[test]
    fn hue_takes_the_short_way_round() {
        let resolved = get_colors(&["red", "blue"], 3).unwrap();
        assert_eq!(resolved[1], "rgb(255, 0, 255)");
    }

    #[test]
    fn inner_colors_are_ignored_when_interpolating() {
        let resolved = get_colors(&["#FF0000", "blue", "#00FF00"], 5).unwrap();
        assert_eq!(resolved.len(), 5);
        assert_eq!(resolved[0], "rgb(255, 0, 0)");
        assert_eq!(resolved[2], "rgb(255, 255, 0)");
        assert_eq!(resolved[4], "rgb(0, 255, 0)");
    }

    #[test]
    fn achromatic_endpoint_borrows_hue_and_saturation() {
        let resolved = get_colors(&["white", "red"], 3).unwrap();
        assert_eq!(resolved[1], "rgb(255, 128, 128)");
    }

    #[test]
    fn single_segment_samples_the_midpoint() {
        let resolved = get_colors(&["#FF0000", "#00FF00"], 1).unwrap();
        assert_eq!(resolved, vec!["rgb(255, 255, 0)"]);
    }

    #[test]
    fn resolves_exactly_one_color_per_segment() {
        for n in 1..=12 {
            assert_eq!(get_colors(&["#FF0000", "#00FF00"], n).unwrap().len(), n);
        }
    }

    #[test]
    fn reports_unusable_inputs() {
        let empty: [&str; 0] = [];
        assert_eq!(get_colors(&empty, 3), Err(ColorError::Empty));
        assert_eq!(
            get_colors(&["#FF0000", "nope"], 3),
            Err(ColorError::Invalid("nope".to_string()))
        );
    }
}
