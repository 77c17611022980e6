//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are traced independently and
//! in parallel using rayon. Every bucket gets its own `RenderContext`, so
//! workers never share a brightness cache.

use std::time::Instant;

use ember_core::Scene;
use ember_math::CameraState;
use rayon::prelude::*;

use crate::config::RenderConfig;
use crate::context::{RayCounters, RenderContext};
use crate::renderer::{advance_camera, render_pixel, FrameStats, FramebufferSink, BACKGROUND};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Generate buckets covering the image, sorted center-out.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1);
    let mut buckets = Vec::new();

    for y in (0..height).step_by(size as usize) {
        for x in (0..width).step_by(size as usize) {
            let bw = size.min(width - x);
            let bh = size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
        }
    }

    sort_spiral(&mut buckets, width, height);
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from the image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let dist = |b: &Bucket| {
        let (x, y) = b.center();
        (x - cx).powi(2) + (y - cy).powi(2)
    };

    buckets.sort_by(|a, b| dist(a).total_cmp(&dist(b)));
}

/// Packed pixels of one bucket, row-major within the bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    pub pixels: Vec<u32>,
    pub counters: RayCounters,
}

/// Trace every pixel of a bucket with a fresh context.
pub fn render_bucket(
    bucket: &Bucket,
    scene: &Scene,
    camera: &CameraState,
    config: &RenderConfig,
) -> BucketResult {
    let mut ctx = RenderContext::new(scene, config, camera);
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            pixels.push(render_pixel(&mut ctx, camera, bucket.x + local_x, bucket.y + local_y));
        }
    }

    log::debug!(
        "Bucket {} at ({}, {}) done, {} vertices shaded",
        bucket.index,
        bucket.x,
        bucket.y,
        ctx.cache.filled()
    );

    BucketResult {
        bucket: *bucket,
        pixels,
        counters: ctx.counters,
    }
}

/// Render one frame on the rayon pool, advancing `camera` by one orbit step.
///
/// Produces the same pixels as `render_frame`.
pub fn render_frame_parallel(
    scene: &Scene,
    camera: &mut CameraState,
    config: &RenderConfig,
    bucket_size: u32,
    sink: &mut impl FramebufferSink,
) -> FrameStats {
    let start = Instant::now();
    advance_camera(camera, scene, config);
    let camera = &*camera;

    let buckets = generate_buckets(config.width, config.height, bucket_size);
    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, scene, camera, config))
        .collect();

    let mut stats = FrameStats {
        width: config.width,
        height: config.height,
        ..Default::default()
    };
    for result in &results {
        let b = result.bucket;
        for (i, &packed) in result.pixels.iter().enumerate() {
            let i = i as u32;
            sink.set_pixel(b.x + i % b.width, b.y + i / b.width, packed);
            stats.pixels_written += 1;
            if packed != BACKGROUND {
                stats.pixels_hit += 1;
            }
        }
        stats.counters.merge(&result.counters);
    }

    stats.elapsed = start.elapsed();
    log::info!(
        "Rendered {}x{} frame in {} buckets on {} threads in {:.2?}",
        stats.width,
        stats.height,
        results.len(),
        rayon::current_num_threads(),
        stats.elapsed
    );
    stats
}
