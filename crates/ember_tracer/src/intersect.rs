//! Brute-force ray-triangle intersection.
//!
//! Every query tests every triangle. Each test solves
//! `o + t*d = v0 + u*e1 + v*e2` for `(t, u, v)` with Cramer's rule.

use ember_core::Triangle;
use ember_math::{Interval, Ray, Vec3};

use crate::hit::Hit;

/// Determinants smaller than this are treated as a ray parallel to the
/// triangle's plane (or a triangle with no area).
pub const DETERMINANT_EPSILON: f32 = 1e-8;

/// Solve the ray against one triangle.
///
/// Returns `(t, u, v)` for a hit with `t > 0`, `u >= 0`, `v >= 0` and
/// `u + v <= 1`; edges count as inside.
pub fn intersect_triangle(ray: &Ray, triangle: &Triangle) -> Option<(f32, f32, f32)> {
    let (e1, e2) = triangle.edges();
    let s = ray.origin - triangle.vertices[0];
    let neg_d = -ray.direction;

    // det[-d, e1, e2] as a scalar triple product
    let e1_x_e2 = e1.cross(e2);
    let det = neg_d.dot(e1_x_e2);
    if det.abs() < DETERMINANT_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let t = s.dot(e1_x_e2) * inv_det;
    if !Interval::AHEAD.surrounds(t) {
        return None;
    }

    let u = neg_d.dot(s.cross(e2)) * inv_det;
    let v = neg_d.dot(e1.cross(s)) * inv_det;
    if u < 0.0 || v < 0.0 || u + v > 1.0 {
        return None;
    }

    Some((t, u, v))
}

/// Find the nearest triangle along `ray`.
pub fn closest_intersection<'a>(ray: &Ray, triangles: &'a [Triangle]) -> Option<Hit<'a>> {
    let mut closest: Option<Hit<'a>> = None;

    for (index, triangle) in triangles.iter().enumerate() {
        let Some((t, u, v)) = intersect_triangle(ray, triangle) else {
            continue;
        };
        if closest.map_or(true, |hit| t < hit.distance) {
            closest = Some(Hit {
                point: ray.at(t),
                distance: t,
                u,
                v,
                triangle,
                index,
            });
        }
    }

    closest
}

/// Barycentric weights of `p` from sub-triangle areas:
/// `(area(P,B,C), area(P,C,A), area(P,A,B)) / area(A,B,C)`.
///
/// A zero-area triangle puts all weight on the first vertex.
pub fn barycentric(p: Vec3, [a, b, c]: [Vec3; 3]) -> Vec3 {
    // Twice the areas; the factor cancels.
    let area = (b - a).cross(c - a).length();
    if area == 0.0 {
        return Vec3::X;
    }

    let w0 = (b - p).cross(c - p).length();
    let w1 = (c - p).cross(a - p).length();
    let w2 = (a - p).cross(b - p).length();

    Vec3::new(w0, w1, w2) / area
}
