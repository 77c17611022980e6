//! Mirror and glass light transport.
//!
//! Rays are resolved with an explicit work list instead of recursion. Each
//! step takes one `PendingRay`, finds what it hits and either resolves a
//! color or queues the next ray. Reflection and refraction chains have
//! separate depth caps, and every ray also counts against a total bounce
//! budget that never resets, so mirror and glass cannot trade rays forever.
//!
//! Glass is handled as a solid: a refracted ray walks from face to face,
//! probing just past each hit to see whether it is still inside, until it
//! leaves through a glass face into air.

use ember_core::Color;
use ember_math::{reflect, Ray, Vec3};
use serde::{Deserialize, Serialize};

use crate::context::RenderContext;
use crate::hit::Hit;
use crate::intersect::closest_intersection;

/// Result of bending a ray through an interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Refraction {
    Refracted(Vec3),
    TotalInternalReflection,
}

/// What to do when a refraction has no transmitted ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TirPolicy {
    /// Continue as a mirror reflection off the same face.
    #[default]
    Reflect,
    /// Stop and return black.
    Absorb,
}

/// Kind of ray waiting to be traced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounce {
    Primary,
    Reflect,
    Refract,
}

/// A ray in the work list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingRay {
    pub origin: Vec3,
    pub direction: Vec3,
    pub bounce: Bounce,
    /// Depth within the current reflection or refraction chain
    pub depth: u32,
    /// Rays traced before this one since the camera ray
    pub bounces: u32,
}

impl PendingRay {
    pub fn primary(ray: Ray) -> Self {
        Self {
            origin: ray.origin,
            direction: ray.direction,
            bounce: Bounce::Primary,
            depth: 0,
            bounces: 0,
        }
    }

    /// Mirror bounce off `hit`, starting `epsilon` along the new direction.
    pub fn reflected(hit: &Hit, incident: Vec3, depth: u32, epsilon: f32) -> Self {
        let ray = Ray::offset(hit.point, reflect(incident, hit.triangle.normal), epsilon);
        Self {
            origin: ray.origin,
            direction: ray.direction,
            bounce: Bounce::Reflect,
            depth,
            bounces: 0,
        }
    }

    pub fn refracted(origin: Vec3, direction: Vec3, depth: u32) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            bounce: Bounce::Refract,
            depth,
            bounces: 0,
        }
    }

    fn ray(&self) -> Ray {
        Ray::new(self.origin, self.direction)
    }
}

/// Snell refraction of a unit `incident` ray.
///
/// `eta_ratio` is the index on the far side of `normal`. A ray arriving
/// from behind the normal swaps the indices and flips the normal.
pub fn refract(incident: Vec3, normal: Vec3, eta_ratio: f32) -> Refraction {
    let mut cosi = (-incident).dot(normal).clamp(-1.0, 1.0);
    let (mut etai, mut etat) = (1.0, eta_ratio);
    let mut n = normal;
    if cosi < 0.0 {
        cosi = -cosi;
        std::mem::swap(&mut etai, &mut etat);
        n = -n;
    }

    let eta = etai / etat;
    let k = 1.0 - eta * eta * (1.0 - cosi * cosi);
    if k < 0.0 {
        Refraction::TotalInternalReflection
    } else {
        Refraction::Refracted(eta * incident + (eta * cosi - k.sqrt()) * n)
    }
}

enum Step {
    Continue(PendingRay),
    Resolved(Color),
    /// A primary ray that hit nothing
    Background,
}

/// Trace a ray to a color. `None` means a primary ray left the scene.
pub fn trace(ctx: &mut RenderContext, ray: PendingRay) -> Option<Color> {
    let mut work = vec![ray];
    while let Some(task) = work.pop() {
        match step(ctx, task) {
            Step::Continue(mut next) => {
                next.bounces = task.bounces + 1;
                work.push(next);
            }
            Step::Resolved(color) => return Some(color),
            Step::Background => return None,
        }
    }
    None
}

fn step(ctx: &mut RenderContext, task: PendingRay) -> Step {
    if task.bounces > ctx.config.max_bounces {
        ctx.counters.depth_exhausted += 1;
        return Step::Resolved(Color::ZERO);
    }
    match task.bounce {
        Bounce::Primary => {
            ctx.counters.primary += 1;
            primary_step(ctx, task)
        }
        Bounce::Reflect => {
            if task.depth >= ctx.config.max_reflect_depth {
                ctx.counters.depth_exhausted += 1;
                return Step::Resolved(Color::ZERO);
            }
            ctx.counters.reflect += 1;
            reflect_step(ctx, task)
        }
        Bounce::Refract => {
            if task.depth > ctx.config.max_refract_depth {
                ctx.counters.depth_exhausted += 1;
                return Step::Resolved(Color::ZERO);
            }
            ctx.counters.refract += 1;
            refract_step(ctx, task)
        }
    }
}

fn primary_step(ctx: &mut RenderContext, task: PendingRay) -> Step {
    let scene = ctx.scene;
    let ray = task.ray();
    let Some(hit) = closest_intersection(&ray, &scene.triangles) else {
        return Step::Background;
    };
    let tri = hit.triangle;

    if tri.is_mirror() {
        Step::Continue(PendingRay::reflected(&hit, ray.direction, 1, ctx.config.epsilon))
    } else if tri.is_glass() {
        let ior = ctx.config.glass_ior;
        enter_glass(ctx, &hit, &task, ior)
    } else if hit.is_back_face(ray.direction) {
        Step::Resolved(tri.color_at(hit.weights()) * ctx.config.lighting.ambient)
    } else {
        let brightness = ctx.shade(&hit);
        Step::Resolved(tri.color_at(hit.weights()) * brightness)
    }
}

fn reflect_step(ctx: &mut RenderContext, task: PendingRay) -> Step {
    let scene = ctx.scene;
    let ray = task.ray();
    let Some(hit) = closest_intersection(&ray, &scene.triangles) else {
        let color = scene
            .environment
            .as_ref()
            .map_or(Color::ZERO, |env| env.sample(ray.direction));
        return Step::Resolved(color);
    };

    if hit.triangle.is_mirror() {
        Step::Continue(PendingRay::reflected(
            &hit,
            ray.direction,
            task.depth + 1,
            ctx.config.epsilon,
        ))
    } else if hit.triangle.is_glass() {
        let ior = ctx.config.reflect_glass_ior;
        enter_glass(ctx, &hit, &task, ior)
    } else {
        Step::Resolved(shade_flat(ctx, &hit))
    }
}

fn refract_step(ctx: &mut RenderContext, task: PendingRay) -> Step {
    let scene = ctx.scene;
    let ray = task.ray();
    let eps = ctx.config.epsilon;
    let Some(hit) = closest_intersection(&ray, &scene.triangles) else {
        return Step::Resolved(Color::ZERO);
    };

    // Probe just past the face along its normal to see what lies beyond.
    let past = hit.point + hit.triangle.normal * eps;
    let still_inside = closest_intersection(&Ray::new(past, ray.direction), &scene.triangles)
        .is_some_and(|probe| probe.triangle.is_glass());
    let exiting = hit.triangle.is_glass() && !still_inside;

    if !exiting {
        return Step::Continue(PendingRay::refracted(past, ray.direction, task.depth + 1));
    }

    let normal = hit.normal_along(ray.direction);
    let exit_dir = match refract(ray.direction, normal, ctx.config.exit_ior) {
        Refraction::Refracted(dir) => dir.normalize(),
        Refraction::TotalInternalReflection => {
            ctx.counters.total_internal_reflections += 1;
            return match ctx.config.tir {
                TirPolicy::Absorb => Step::Resolved(Color::ZERO),
                TirPolicy::Reflect => Step::Continue(PendingRay::refracted(
                    hit.point - normal * eps,
                    reflect(ray.direction, normal),
                    task.depth + 1,
                )),
            };
        }
    };

    let exit = Ray::new(hit.point + normal * eps, exit_dir);
    match closest_intersection(&exit, &scene.triangles) {
        None => Step::Resolved(Color::ZERO),
        Some(next) if next.triangle.is_mirror() => {
            Step::Continue(PendingRay::reflected(&next, exit.direction, 1, eps))
        }
        Some(next) => Step::Resolved(shade_flat(ctx, &next)),
    }
}

/// Bend a ray into glass at `hit`. The normal is oriented along the ray, so
/// the new origin sits just inside the solid.
fn enter_glass(ctx: &mut RenderContext, hit: &Hit, task: &PendingRay, ior: f32) -> Step {
    let normal = hit.normal_along(task.direction);
    match refract(task.direction, normal, ior) {
        Refraction::Refracted(dir) => {
            Step::Continue(PendingRay::refracted(hit.point + normal * ctx.config.epsilon, dir, 1))
        }
        Refraction::TotalInternalReflection => {
            ctx.counters.total_internal_reflections += 1;
            match ctx.config.tir {
                TirPolicy::Absorb => Step::Resolved(Color::ZERO),
                TirPolicy::Reflect => {
                    let depth = match task.bounce {
                        Bounce::Reflect => task.depth + 1,
                        _ => 1,
                    };
                    Step::Continue(PendingRay::reflected(hit, task.direction, depth, ctx.config.epsilon))
                }
            }
        }
    }
}

fn shade_flat(ctx: &RenderContext, hit: &Hit) -> Color {
    hit.triangle.color_at(hit.weights()) * ctx.shade_flat(hit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_finite(v: Vec3) -> bool {
        v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
    }

    #[test]
    fn test_refract_straight_through() {
        match refract(Vec3::NEG_Z, Vec3::Z, 1.5) {
            Refraction::Refracted(dir) => assert!((dir - Vec3::NEG_Z).length() < 1e-6),
            other => panic!("expected refraction, got {:?}", other),
        }
    }

    #[test]
    fn test_refract_bends_toward_normal() {
        let incident = Vec3::new(1.0, -1.0, 0.0).normalize();
        let Refraction::Refracted(dir) = refract(incident, Vec3::Y, 1.5) else {
            panic!("unexpected total internal reflection");
        };
        let sin_in = incident.x;
        let sin_out = dir.normalize().x;
        assert!((sin_in / sin_out - 1.5).abs() < 1e-4);
        assert!(dir.y < 0.0);
    }

    #[test]
    fn test_refract_from_behind_swaps_indices() {
        // Leaving a 1.5 medium at a steep angle: sin 60 * 1.5 > 1
        let incident = Vec3::new(60f32.to_radians().sin(), 60f32.to_radians().cos(), 0.0);
        assert_eq!(
            refract(incident, Vec3::Y, 1.5),
            Refraction::TotalInternalReflection
        );
    }

    #[test]
    fn test_tir_never_produces_nan() {
        for i in 0..=90 {
            let a = (i as f32).to_radians();
            let incident = Vec3::new(a.sin(), -a.cos(), 0.0);
            for eta in [0.5, 1.0 / 1.3, 1.3, 1.6, 2.4] {
                if let Refraction::Refracted(dir) = refract(incident, Vec3::NEG_Y, eta) {
                    assert!(is_finite(dir));
                }
            }
        }
    }

    #[test]
    fn test_pending_ray_reflected() {
        let tri = ember_core::Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, Color::ONE);
        let hit = Hit {
            point: Vec3::new(0.2, 0.2, 0.0),
            distance: 1.0,
            u: 0.2,
            v: 0.2,
            triangle: &tri,
            index: 0,
        };
        let incident = Vec3::new(0.0, 1.0, -1.0).normalize();
        let next = PendingRay::reflected(&hit, incident, 2, 0.001);

        assert_eq!(next.bounce, Bounce::Reflect);
        assert_eq!(next.depth, 2);
        assert!((next.direction - Vec3::new(0.0, 1.0, 1.0).normalize()).length() < 1e-6);
        assert!(next.origin.z > 0.0);
    }
}
