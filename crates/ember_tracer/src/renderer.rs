//! Frame driver.
//!
//! A frame advances the camera one orbit step around the scene, then traces
//! one primary ray per pixel in scanline order and hands packed pixels to a
//! `FramebufferSink`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use ember_core::{Color, Scene};
use ember_math::{CameraState, Ray};

use crate::config::RenderConfig;
use crate::context::{RayCounters, RenderContext};

/// Packed value written where a camera ray hits nothing.
pub const BACKGROUND: u32 = 0;

/// Anything that accepts packed `0xAARRGGBB` pixels.
pub trait FramebufferSink {
    fn set_pixel(&mut self, x: u32, y: u32, packed: u32);
}

/// Summary of one rendered frame.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    pub width: u32,
    pub height: u32,
    /// Pixels handed to the sink
    pub pixels_written: u64,
    /// Pixels whose camera ray hit something
    pub pixels_hit: u64,
    pub counters: RayCounters,
    pub elapsed: Duration,
    /// True if the frame stopped early
    pub cancelled: bool,
}

/// Clamp a 0-1 channel to 8 bits, truncating.
#[inline]
fn channel(c: f32) -> u32 {
    (c * 255.0).clamp(0.0, 255.0) as u32
}

/// Pack an opaque color as `0xFFRRGGBB`.
pub fn pack_rgba(color: Color) -> u32 {
    0xFF00_0000 | channel(color.x) << 16 | channel(color.y) << 8 | channel(color.z)
}

/// Split a packed pixel into `[r, g, b, a]` bytes.
pub fn unpack_rgba(packed: u32) -> [u8; 4] {
    [
        (packed >> 16) as u8,
        (packed >> 8) as u8,
        packed as u8,
        (packed >> 24) as u8,
    ]
}

/// In-memory framebuffer of packed pixels.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with background.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![BACKGROUND; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&p| unpack_rgba(p)).collect()
    }

    /// Convert to an `image` buffer for saving.
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(unpack_rgba(self.get(x, y)))
        })
    }
}

impl FramebufferSink for ImageBuffer {
    fn set_pixel(&mut self, x: u32, y: u32, packed: u32) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = packed;
        }
    }
}

/// Orbit the camera one step around the scene center and face the center.
pub fn advance_camera(camera: &mut CameraState, scene: &Scene, config: &RenderConfig) {
    let center = scene.center();
    camera.orbit_y(config.orbit_step(), center);
    camera.look_at(center);
}

/// Trace the camera ray through pixel (x, y) and pack the result.
pub fn render_pixel(ctx: &mut RenderContext, camera: &CameraState, x: u32, y: u32) -> u32 {
    let config = ctx.config;
    let direction = camera.primary_ray_direction(
        x,
        y,
        config.width,
        config.height,
        config.focal_length,
        config.scale,
    );
    ctx.trace_primary(Ray::new(camera.position, direction))
        .map_or(BACKGROUND, pack_rgba)
}

/// Render one frame, advancing `camera` by one orbit step first.
pub fn render_frame(
    scene: &Scene,
    camera: &mut CameraState,
    config: &RenderConfig,
    sink: &mut impl FramebufferSink,
) -> FrameStats {
    render_frame_cancellable(scene, camera, config, sink, &AtomicBool::new(false))
}

/// Render one frame, stopping at the next scanline once `cancel` is set.
///
/// Rows already written stay in the sink.
pub fn render_frame_cancellable(
    scene: &Scene,
    camera: &mut CameraState,
    config: &RenderConfig,
    sink: &mut impl FramebufferSink,
    cancel: &AtomicBool,
) -> FrameStats {
    let start = Instant::now();
    advance_camera(camera, scene, config);

    let mut ctx = RenderContext::new(scene, config, camera);
    let mut stats = FrameStats {
        width: config.width,
        height: config.height,
        ..Default::default()
    };

    for y in 0..config.height {
        if cancel.load(Ordering::Relaxed) {
            stats.cancelled = true;
            log::info!("Frame cancelled at row {}", y);
            break;
        }
        for x in 0..config.width {
            let packed = render_pixel(&mut ctx, camera, x, y);
            sink.set_pixel(x, y, packed);
            stats.pixels_written += 1;
            if packed != BACKGROUND {
                stats.pixels_hit += 1;
            }
        }
    }

    stats.counters = ctx.counters;
    stats.elapsed = start.elapsed();
    log::info!(
        "Rendered {}x{} frame in {:.2?} ({} primary, {} reflect, {} refract rays)",
        stats.width,
        stats.height,
        stats.elapsed,
        stats.counters.primary,
        stats.counters.reflect,
        stats.counters.refract
    );
    stats
}
