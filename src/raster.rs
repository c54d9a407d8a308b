//! Software rasterizer that paints a gauge [`Scene`] into an RGBA frame.

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::color::Color;
use crate::geometry::Point;
use crate::widget::{GaugeElement, Scene, TextLabel};

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    /// Wraps an RGBA frame of `width * height` pixels.
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        self.frame
            .get(idx..idx + 3)
            .map(|px| Color::new(px[0], px[1], px[2]))
    }

    fn blend(&mut self, x: i64, y: i64, color: Color, alpha: f64) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let a = (alpha * color.opacity).clamp(0.0, 1.0);
        for (channel, src) in dst.iter_mut().zip([color.r, color.g, color.b]) {
            *channel = (f64::from(src) * a + f64::from(*channel) * (1.0 - a)).round() as u8;
        }
        dst[3] = 0xff;
    }

    /// Pixel rows and columns covering `[min, max]`, clipped to the frame.
    fn span(&self, min: f64, max: f64, limit: usize) -> std::ops::Range<i64> {
        let lo = min.floor().max(0.0) as i64;
        let hi = (max.ceil() + 1.0).min(limit as f64).max(0.0) as i64;
        lo..hi
    }

    /// Strokes a ring sector. Angles use the gauge convention (0° up,
    /// clockwise) and may exceed 360°.
    pub fn stroke_arc(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        stroke_width: f64,
        color: Color,
    ) {
        let sweep = end_angle - start_angle;
        if !(sweep > 0.0) || !radius.is_finite() {
            return;
        }
        let inner = radius - stroke_width / 2.0;
        let outer = radius + stroke_width / 2.0;
        let reach = outer.abs() + 1.0;
        for y in self.span(center.y - reach, center.y + reach, self.height) {
            for x in self.span(center.x - reach, center.x + reach, self.width) {
                let dx = x as f64 + 0.5 - center.x;
                let dy = y as f64 + 0.5 - center.y;
                let dist = (dx * dx + dy * dy).sqrt();
                let radial = (dist - inner + 0.5).min(outer - dist + 0.5).clamp(0.0, 1.0);
                if radial <= 0.0 {
                    continue;
                }
                let angle = dy.atan2(dx).to_degrees() + 90.0;
                let offset = (angle - start_angle).rem_euclid(360.0);
                if offset <= sweep || sweep >= 360.0 {
                    self.blend(x, y, color, radial);
                }
            }
        }
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        let reach = radius + 1.0;
        for y in self.span(center.y - reach, center.y + reach, self.height) {
            for x in self.span(center.x - reach, center.x + reach, self.width) {
                let dx = x as f64 + 0.5 - center.x;
                let dy = y as f64 + 0.5 - center.y;
                let dist = (dx * dx + dy * dy).sqrt();
                let coverage = (radius - dist + 0.5).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    /// Fills a triangle with a one pixel anti-aliased edge.
    pub fn fill_triangle(&mut self, vertices: [Point; 3], color: Color) {
        let [a, b, c] = vertices;
        let area = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
        if area == 0.0 || area.is_nan() {
            return;
        }
        let orientation = area.signum();
        let edges = [(a, b), (b, c), (c, a)];
        let min_x = a.x.min(b.x).min(c.x);
        let max_x = a.x.max(b.x).max(c.x);
        let min_y = a.y.min(b.y).min(c.y);
        let max_y = a.y.max(b.y).max(c.y);
        for y in self.span(min_y - 1.0, max_y + 1.0, self.height) {
            for x in self.span(min_x - 1.0, max_x + 1.0, self.width) {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;
                let coverage = edges
                    .iter()
                    .map(|(from, to)| {
                        let ex = to.x - from.x;
                        let ey = to.y - from.y;
                        let len = (ex * ex + ey * ey).sqrt();
                        // signed distance, positive on the inside
                        let cross = ex * (py - from.y) - ey * (px - from.x);
                        orientation * cross / len
                    })
                    .fold(f64::INFINITY, f64::min);
                let coverage = (coverage + 0.5).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    /// Draws `text` centered on `x` with its baseline at `y`.
    pub fn draw_text(&mut self, x: f64, y: f64, text: &str, font: &Font, size: f64, color: Color) {
        let scale = Scale::uniform(size as f32);
        let glyphs: Vec<PositionedGlyph> = font.layout(text, scale, point(0.0, 0.0)).collect();
        let width = text_width(&glyphs);
        let origin_x = x - width / 2.0;
        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = origin_x as i64 + i64::from(bb.min.x) + i64::from(gx);
                    let py = y as i64 + i64::from(bb.min.y) + i64::from(gy);
                    self.blend(px, py, color, f64::from(v));
                });
            }
        }
    }
}

fn text_width(glyphs: &[PositionedGlyph]) -> f64 {
    match (glyphs.first(), glyphs.last()) {
        (Some(first), Some(last)) => f64::from(
            last.position().x - first.position().x
                + last.unpositioned().h_metrics().advance_width,
        ),
        _ => 0.0,
    }
}

/// Paints a scene in document order, the way an SVG renderer would.
/// Text is skipped when no font is available, and elements whose paint
/// is not a color are left out.
pub fn draw_scene(canvas: &mut Canvas, scene: &Scene, font: Option<&Font>) {
    canvas.clear(scene.background);
    for element in &scene.elements {
        match element {
            GaugeElement::Pointer { polygon, paint } => {
                if let Some(color) = paint.color {
                    canvas.fill_triangle(polygon.vertices(), color);
                }
            }
            GaugeElement::Hub { arc, paint } => {
                // the hub path is a 359° arc that is filled and stroked; it reads as a disc
                if let Some(color) = paint.color {
                    canvas.fill_circle(Point::new(arc.cx, arc.cy), arc.radius + 0.5, color);
                }
            }
            GaugeElement::Value(label) | GaugeElement::Title(label) => {
                if let (Some(font), Some(color)) = (font, label.paint.color) {
                    draw_label(canvas, label, font, color);
                }
            }
            GaugeElement::Segment {
                arc,
                paint,
                stroke_width,
            } => {
                if let Some(color) = paint.color {
                    canvas.stroke_arc(
                        Point::new(arc.cx, arc.cy),
                        arc.radius,
                        arc.start_angle,
                        arc.end_angle,
                        *stroke_width,
                        color,
                    );
                }
            }
        }
    }
}

fn draw_label(canvas: &mut Canvas, label: &TextLabel, font: &Font, color: Color) {
    canvas.draw_text(label.x, label.y, &label.text, font, label.font_size, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GaugeConfig;
    use crate::geometry::polar_to_cartesian;
    use crate::widget::Gauge;

    fn frame(width: usize, height: usize) -> Vec<u8> {
        vec![0; width * height * 4]
    }

    #[test]
    fn arc_only_covers_its_sweep() {
        let mut buffer = frame(100, 100);
        let mut canvas = Canvas::new(&mut buffer, 100, 100);
        canvas.clear(Color::WHITE);
        let center = Point::new(50.0, 50.0);
        canvas.stroke_arc(center, 30.0, 270.0, 360.0, 6.0, Color::BLACK);

        let on = polar_to_cartesian(50.0, 50.0, 30.0, 315.0);
        let off = polar_to_cartesian(50.0, 50.0, 30.0, 45.0);
        assert_eq!(canvas.pixel(on.x as usize, on.y as usize), Some(Color::BLACK));
        assert_eq!(canvas.pixel(off.x as usize, off.y as usize), Some(Color::WHITE));
        assert_eq!(canvas.pixel(50, 50), Some(Color::WHITE));
    }

    #[test]
    fn triangle_fills_its_interior() {
        let mut buffer = frame(40, 40);
        let mut canvas = Canvas::new(&mut buffer, 40, 40);
        canvas.clear(Color::WHITE);
        let red = Color::new(255, 0, 0);
        canvas.fill_triangle(
            [Point::new(5.0, 5.0), Point::new(35.0, 5.0), Point::new(5.0, 35.0)],
            red,
        );
        assert_eq!(canvas.pixel(10, 10), Some(red));
        assert_eq!(canvas.pixel(33, 33), Some(Color::WHITE));
    }

    #[test]
    fn translucent_colors_blend_with_the_background() {
        let mut buffer = frame(10, 10);
        let mut canvas = Canvas::new(&mut buffer, 10, 10);
        canvas.clear(Color::WHITE);
        canvas.fill_circle(Point::new(5.0, 5.0), 100.0, Color::BLACK.with_opacity(0.5));
        assert_eq!(canvas.pixel(5, 5), Some(Color::new(128, 128, 128)));
    }

    #[test]
    fn unparseable_segment_colors_are_left_unpainted() {
        let mut gauge = Gauge::new(
            GaugeConfig::builder()
                .colors(vec!["bogus".to_string(), "red".to_string(), "red".to_string()])
                .build(),
        )
        .unwrap();
        gauge.on_layout(300.0);
        let scene = gauge.render().unwrap();

        let (width, height) = (300, 175);
        let mut buffer = frame(width, height);
        let mut canvas = Canvas::new(&mut buffer, width, height);
        draw_scene(&mut canvas, &scene, None);

        // on the track of the first segment, which is skipped
        assert_eq!(canvas.pixel(41, 119), Some(Color::WHITE));
        // on the track of the last segment, mirrored
        assert_eq!(canvas.pixel(258, 119), Some(Color::new(255, 0, 0)));
    }

    #[test]
    fn shapes_outside_the_frame_are_clipped() {
        let mut buffer = frame(10, 10);
        let mut canvas = Canvas::new(&mut buffer, 10, 10);
        canvas.fill_circle(Point::new(-50.0, -50.0), 20.0, Color::WHITE);
        canvas.fill_circle(Point::new(5.0, 5.0), 100.0, Color::WHITE);
        assert_eq!(canvas.pixel(9, 9), Some(Color::WHITE));
        assert_eq!(canvas.pixel(10, 0), None);
    }

    #[test]
    fn scene_paints_background_hub_and_segments() {
        let mut gauge = Gauge::new(GaugeConfig::builder().dark_mode(true).build()).unwrap();
        gauge.on_layout(300.0);
        let scene = gauge.render().unwrap();

        let (width, height) = (300, 175);
        let mut buffer = frame(width, height);
        let mut canvas = Canvas::new(&mut buffer, width, height);
        draw_scene(&mut canvas, &scene, None);

        assert_eq!(canvas.pixel(2, 2), Some(Color::BLACK));
        assert_eq!(canvas.pixel(150, 120), Some(Color::from_hex(0x989595)));
        // leftmost point of the first (red) segment track: radius 110 around (150, 120)
        assert_eq!(canvas.pixel(41, 119), Some(Color::new(255, 0, 0)));
    }
}
