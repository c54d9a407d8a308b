// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod animation;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod pointer;
pub mod raster;
pub mod segments;
pub mod widget;

pub use animation::{SpringConfig, SpringValue};
pub use color::{get_colors, interpolate_hsl, Color, ColorError, Paint};
pub use config::GaugeConfig;
pub use error::GaugeError;
pub use geometry::{describe_arc, polar_to_cartesian, update_dimensions, ArcPath, Dimensions, Point};
pub use pointer::{calculate_rotation, pointer_angle, pointer_polygon, PointerPolygon};
pub use segments::{build_arc_segments, ArcSegment};
pub use widget::{Gauge, GaugeCommand, GaugeElement, GaugeState, Scene, TextLabel, Theme};

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use log::{debug, error, warn};
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::config::LABEL_HEADROOM;
use crate::raster::Canvas;

// ============================================================================
// WINDOW HOST
// ============================================================================

impl Gauge {
    /// Opens a window showing the gauge until it is closed.
    pub fn show(self) -> Result<(), GaugeError> {
        self.run_window(None)
    }

    /// Like [`Gauge::show`], applying commands from `receiver` before each frame.
    pub fn show_with_commands(self, receiver: Receiver<GaugeCommand>) -> Result<(), GaugeError> {
        self.run_window(Some(receiver))
    }

    fn load_font(&self) -> Result<Option<Font<'static>>, GaugeError> {
        match &self.config().font_data {
            Some(data) => Font::try_from_vec(data.clone())
                .map(Some)
                .ok_or(GaugeError::Font),
            None => {
                warn!("no font configured, value and title text will not be drawn");
                Ok(None)
            }
        }
    }

    fn run_window(mut self, receiver: Option<Receiver<GaugeCommand>>) -> Result<(), GaugeError> {
        let font = self.load_font()?;
        let logical_width = f64::from(self.config().window_width);
        let logical_height = logical_width / 2.0 + LABEL_HEADROOM;
        let window_title = if self.config().title.is_empty() {
            "Gauge".to_string()
        } else {
            self.config().title.clone()
        };

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&window_title)
            .with_inner_size(LogicalSize::new(logical_width, logical_height))
            .with_resizable(true)
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;
        self.on_layout(f64::from(size.width));

        // a non-positive framerate redraws on every loop iteration
        let frame_duration =
            Duration::try_from_secs_f64(1.0 / self.config().max_framerate).unwrap_or(Duration::ZERO);
        let mut last_frame = Instant::now();
        let mut last_tick = Instant::now();

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if new_size.width == 0 || new_size.height == 0 {
                            self.on_layout(0.0);
                            return;
                        }
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                            warn!("failed to resize pixel buffer: {err}");
                        }
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            warn!("failed to resize surface: {err}");
                        }
                        self.on_layout(f64::from(new_size.width));
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some(ref receiver) = receiver {
                            for command in receiver.try_iter() {
                                debug!("applying {command:?}");
                                self.apply(command);
                            }
                        }
                        let now = Instant::now();
                        self.tick(now - last_tick);
                        last_tick = now;

                        let Some(scene) = self.render() else {
                            return;
                        };
                        let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                        raster::draw_scene(&mut canvas, &scene, font.as_ref());
                        if let Err(err) = pixels.render() {
                            error!("render failed: {err}");
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}
