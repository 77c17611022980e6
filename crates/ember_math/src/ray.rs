use crate::Vec3;

/// A ray in 3D space with an origin and a unit direction.
///
/// Rays are cheap `Copy` values built per query (primary, shadow,
/// reflection and refraction rays); nothing stores them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray. `direction` is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Create a ray from `origin` pushed `epsilon` along `direction`.
    ///
    /// Secondary rays start on a surface; the push keeps them from hitting
    /// the surface they leave.
    pub fn offset(origin: Vec3, direction: Vec3, epsilon: f32) -> Self {
        let direction = direction.normalize();
        Self {
            origin: origin + direction * epsilon,
            direction,
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation_normalizes() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let ray = Ray::new(origin, Vec3::new(0.0, 4.0, 0.0));

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, Vec3::Y);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_offset() {
        let ray = Ray::offset(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0), 0.001);

        assert_eq!(ray.direction, Vec3::NEG_Z);
        assert!((ray.origin.z + 0.001).abs() < 1e-7);
    }
}
