//! Immutable triangle records used by the tracer.

use std::sync::Arc;

use ember_math::{Vec2, Vec3};

use crate::material::{Color, Surface};
use crate::texture::Texture;

/// A scene triangle with everything shading needs inline.
#[derive(Clone, Debug)]
pub struct Triangle {
    /// Vertex positions
    pub vertices: [Vec3; 3],
    /// Vertex ids into the scene's vertex tables (normals, brightness cache)
    pub vertex_ids: [u32; 3],
    /// Unit face normal, `normalize((v1 - v0) x (v2 - v0))`.
    /// Zero for a degenerate triangle.
    pub normal: Vec3,
    /// Material color
    pub color: Color,
    /// Surface kind
    pub surface: Surface,
    /// Per-vertex texture coordinates
    pub uvs: Option<[Vec2; 3]>,
    /// Diffuse texture sampled through `uvs`
    pub texture: Option<Arc<Texture>>,
}

impl Triangle {
    /// Create a diffuse triangle. Vertex ids default to 0, 1, 2.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, color: Color) -> Self {
        Self {
            vertices: [v0, v1, v2],
            vertex_ids: [0, 1, 2],
            normal: face_normal(v0, v1, v2),
            color,
            surface: Surface::Diffuse,
            uvs: None,
            texture: None,
        }
    }

    /// Set the vertex ids.
    pub fn with_ids(mut self, ids: [u32; 3]) -> Self {
        self.vertex_ids = ids;
        self
    }

    /// Set the surface kind.
    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surface = surface;
        self
    }

    #[inline]
    pub fn is_mirror(&self) -> bool {
        self.surface == Surface::Mirror
    }

    #[inline]
    pub fn is_glass(&self) -> bool {
        self.surface == Surface::Glass
    }

    /// Edges from vertex 0: (v1 - v0, v2 - v0).
    #[inline]
    pub fn edges(&self) -> (Vec3, Vec3) {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0, v2 - v0)
    }

    pub fn area(&self) -> f32 {
        let (e1, e2) = self.edges();
        0.5 * e1.cross(e2).length()
    }

    pub fn centroid(&self) -> Vec3 {
        let [v0, v1, v2] = self.vertices;
        (v0 + v1 + v2) / 3.0
    }

    /// True if the triangle has no area and can never be hit.
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vec3::ZERO
    }

    /// Surface color at a point with the given barycentric weights.
    ///
    /// Textured triangles return their texture at the interpolated UV in
    /// place of the material color; everything else returns the material
    /// color.
    pub fn color_at(&self, weights: Vec3) -> Color {
        match (&self.texture, &self.uvs) {
            (Some(texture), Some([a, b, c])) => {
                let uv = *a * weights.x + *b * weights.y + *c * weights.z;
                texture.sample(uv.x, uv.y)
            }
            _ => self.color,
        }
    }
}

/// Unit normal of a counter-clockwise triangle, or zero if it has no area.
pub fn face_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    (v1 - v0).cross(v2 - v0).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, Color::ONE)
    }

    #[test]
    fn test_face_normal_ccw() {
        let tri = unit_triangle();
        assert_eq!(tri.normal, Vec3::Z);
        assert!((tri.area() - 0.5).abs() < 1e-6);
        assert!(!tri.is_degenerate());
    }

    #[test]
    fn test_degenerate() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0, Color::ONE);
        assert!(tri.is_degenerate());
        assert_eq!(tri.area(), 0.0);
    }

    #[test]
    fn test_surface_flags() {
        let tri = unit_triangle().with_surface(Surface::Mirror);
        assert!(tri.is_mirror());
        assert!(!tri.is_glass());
        assert!(unit_triangle().with_surface(Surface::Glass).is_glass());
    }

    #[test]
    fn test_color_at_textured() {
        // 3x1 texture: black, red, white
        let texture =
            Texture::from_rgb8(3, 1, &[0, 0, 0, 255, 0, 0, 255, 255, 255]).unwrap();
        // a tinted material color is replaced, not multiplied
        let mut tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, Color::new(0.2, 0.4, 0.6));
        tri.texture = Some(Arc::new(texture));
        tri.uvs = Some([Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.0), Vec2::new(0.0, 0.0)]);

        assert_eq!(tri.color_at(Vec3::new(1.0, 0.0, 0.0)), Color::ZERO);
        assert_eq!(tri.color_at(Vec3::new(0.0, 1.0, 0.0)), Color::X);
        assert_eq!(tri.color_at(Vec3::new(0.0, 0.0, 1.0)), Color::ZERO);
    }

    #[test]
    fn test_color_at_plain() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, Color::new(0.2, 0.4, 0.6));
        assert_eq!(tri.color_at(Vec3::splat(1.0 / 3.0)), Color::new(0.2, 0.4, 0.6));
    }
}
