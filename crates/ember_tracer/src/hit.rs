//! Ray-triangle hit records.

use ember_core::Triangle;
use ember_math::Vec3;

/// The closest intersection of a ray with the scene.
///
/// A miss is `None` at the call site; there is no sentinel distance.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    /// Point of intersection
    pub point: Vec3,
    /// Distance along the (unit) ray direction
    pub distance: f32,
    /// Edge coordinates from the intersection solve
    pub u: f32,
    pub v: f32,
    /// The triangle that was hit
    pub triangle: &'a Triangle,
    /// Index of the triangle in the scene
    pub index: usize,
}

impl<'a> Hit<'a> {
    /// True if the ray arrived on the side the face normal points away from.
    #[inline]
    pub fn is_back_face(&self, direction: Vec3) -> bool {
        direction.dot(self.triangle.normal) > 0.0
    }

    /// Face normal flipped to point along `direction`.
    #[inline]
    pub fn normal_along(&self, direction: Vec3) -> Vec3 {
        let n = self.triangle.normal;
        if direction.dot(n) < 0.0 {
            -n
        } else {
            n
        }
    }

    /// Barycentric weights of the hit point, in vertex order.
    #[inline]
    pub fn weights(&self) -> Vec3 {
        crate::intersect::barycentric(self.point, self.triangle.vertices)
    }
}
