// Re-export glam for convenience
pub use glam::*;

// Ember math types
mod aabb;
mod camera;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use camera::CameraState;
pub use interval::Interval;
pub use ray::Ray;

/// Reflect `incident` about `normal` (`normal` must be unit length).
#[inline]
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * incident.dot(normal) * normal
}
