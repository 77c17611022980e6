//! Cube-map environment for rays that leave the scene.

use std::sync::Arc;

use ember_math::Vec3;

use crate::material::Color;
use crate::texture::Texture;

/// Cube face, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Six textures surrounding the scene at infinity.
#[derive(Clone, Debug)]
pub struct EnvironmentMap {
    faces: [Arc<Texture>; 6],
}

impl EnvironmentMap {
    /// Build from faces ordered +X, -X, +Y, -Y, +Z, -Z.
    pub fn new(faces: [Arc<Texture>; 6]) -> Self {
        Self { faces }
    }

    /// A map whose every face is one color.
    pub fn uniform(color: Color) -> Self {
        let tex = Arc::new(Texture::solid_color(color));
        Self::new(std::array::from_fn(|_| tex.clone()))
    }

    pub fn face(&self, face: CubeFace) -> &Texture {
        &self.faces[face.index()]
    }

    /// Pick the face and UV a direction points at.
    pub fn project(direction: Vec3) -> (CubeFace, f32, f32) {
        let Vec3 { x, y, z } = direction;
        let (ax, ay, az) = (x.abs(), y.abs(), z.abs());

        if ax > ay && ax > az {
            let (face, u) = if x > 0.0 {
                (CubeFace::PosX, -z)
            } else {
                (CubeFace::NegX, z)
            };
            (face, 0.5 * (1.0 + u / ax), 0.5 * (1.0 - y / ax))
        } else if ay > ax && ay > az {
            let (face, v) = if y > 0.0 {
                (CubeFace::PosY, -z)
            } else {
                (CubeFace::NegY, z)
            };
            (face, 0.5 * (1.0 + x / ay), 0.5 * (1.0 - v / ay))
        } else {
            let (face, u) = if z > 0.0 {
                (CubeFace::PosZ, x)
            } else {
                (CubeFace::NegZ, -x)
            };
            (face, 0.5 * (1.0 + u / az), 0.5 * (1.0 - y / az))
        }
    }

    /// Color seen along `direction`.
    pub fn sample(&self, direction: Vec3) -> Color {
        if direction.length_squared() == 0.0 {
            return Color::ZERO;
        }
        let (face, u, v) = Self::project(direction);
        let tex = self.face(face);
        // u, v land in [0, 1]; clamp instead of wrapping so 1.0 stays on the edge.
        let x = (u.clamp(0.0, 1.0) * (tex.width - 1) as f32) as u32;
        let y = (v.clamp(0.0, 1.0) * (tex.height - 1) as f32) as u32;
        tex.texel(x, y)
    }
}
