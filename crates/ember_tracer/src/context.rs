//! Per-frame render state.

use ember_core::{Color, Scene};
use ember_math::{CameraState, Ray, Vec3};

use crate::config::RenderConfig;
use crate::hit::Hit;
use crate::shading::{self, BrightnessCache, ShadingModel};
use crate::transport::{self, PendingRay};

/// Ray counts gathered while tracing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RayCounters {
    pub primary: u64,
    pub reflect: u64,
    pub refract: u64,
    /// Rays that hit a depth cap
    pub depth_exhausted: u64,
    /// Refractions that turned into total internal reflection
    pub total_internal_reflections: u64,
}

impl RayCounters {
    pub fn merge(&mut self, other: &RayCounters) {
        self.primary += other.primary;
        self.reflect += other.reflect;
        self.refract += other.refract;
        self.depth_exhausted += other.depth_exhausted;
        self.total_internal_reflections += other.total_internal_reflections;
    }
}

/// Everything one worker needs to trace rays for a frame.
///
/// The scene, settings and eye position are shared and read-only; the
/// brightness cache and counters belong to this context alone.
pub struct RenderContext<'a> {
    pub scene: &'a Scene,
    pub config: &'a RenderConfig,
    /// Camera position, the viewpoint for specular highlights
    pub eye: Vec3,
    pub cache: BrightnessCache,
    pub counters: RayCounters,
}

impl<'a> RenderContext<'a> {
    /// Fresh state for a frame seen from `camera`.
    pub fn new(scene: &'a Scene, config: &'a RenderConfig, camera: &CameraState) -> Self {
        Self {
            scene,
            config,
            eye: camera.position,
            cache: BrightnessCache::new(scene.vertex_count()),
            counters: RayCounters::default(),
        }
    }

    /// Color seen along a camera ray, or `None` if it leaves the scene.
    pub fn trace_primary(&mut self, ray: Ray) -> Option<Color> {
        transport::trace(self, PendingRay::primary(ray))
    }

    /// Brightness of a direct primary hit with the configured model.
    pub fn shade(&mut self, hit: &Hit) -> f32 {
        match self.config.shading {
            ShadingModel::Flat => self.shade_flat(hit),
            ShadingModel::Phong => shading::phong(self.scene, self.config, self.eye, hit),
            ShadingModel::Gouraud => {
                shading::gouraud(self.scene, self.config, self.eye, hit, &mut self.cache)
            }
        }
    }

    /// Flat brightness, used for surfaces reached through mirrors and glass.
    pub fn shade_flat(&self, hit: &Hit) -> f32 {
        shading::flat(self.scene, self.config, self.eye, hit)
    }
}
