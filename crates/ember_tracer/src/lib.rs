//! Ember Tracer - Whitted-style CPU ray tracing
//!
//! Traces triangle scenes with:
//! - Brute-force closest-hit intersection
//! - Flat, Gouraud and Phong shading with hard or soft shadows
//! - Mirror reflection and solid glass refraction on an explicit work list
//! - Serial scanline and parallel bucket frame drivers

mod bucket;
mod config;
mod context;
mod hit;
pub mod intersect;
mod renderer;
pub mod shading;
pub mod transport;

pub use bucket::{
    generate_buckets, render_bucket, render_frame_parallel, Bucket, BucketResult,
    DEFAULT_BUCKET_SIZE,
};
pub use config::{ConfigError, ConfigResult, RenderConfig, CEILING_AREA_LIGHT, CEILING_LIGHT};
pub use context::{RayCounters, RenderContext};
pub use hit::Hit;
pub use intersect::{barycentric, closest_intersection, intersect_triangle};
pub use renderer::{
    advance_camera, pack_rgba, render_frame, render_frame_cancellable, render_pixel,
    unpack_rgba, FrameStats, FramebufferSink, ImageBuffer, BACKGROUND,
};
pub use shading::{BrightnessCache, Lighting, ShadingModel, VertexLighting};
pub use transport::{refract, trace, Bounce, PendingRay, Refraction, TirPolicy};

/// Re-export the scene and math types the tracer API uses.
pub use ember_core::{Color, Scene};
pub use ember_math::{CameraState, Ray, Vec3};
