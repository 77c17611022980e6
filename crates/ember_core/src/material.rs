//! Surface materials.
//!
//! Ember does not run a BRDF. A material is a flat color plus a `Surface`
//! tag that decides whether a hit is shaded directly or handed to
//! reflection/refraction transport.

use std::sync::Arc;

use ember_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::texture::Texture;

/// Color type alias (RGB values 0-1, quantized to 8 bits on output)
pub type Color = Vec3;

/// How light leaves a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// Shaded directly with the lighting model.
    #[default]
    Diffuse,
    /// Perfect mirror: rays continue in the reflected direction.
    Mirror,
    /// Dielectric: rays are refracted through the solid.
    Glass,
}

/// A named material as an MTL loader would hand it over.
#[derive(Clone, Debug)]
pub struct Material {
    /// Material name (from `newmtl`)
    pub name: String,

    /// Diffuse color (`Kd`)
    pub color: Color,

    /// Surface kind
    pub surface: Surface,

    /// Optional texture; replaces `color` on faces with per-vertex UVs
    pub texture: Option<Arc<Texture>>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: Color::splat(0.5), // Grey default
            surface: Surface::Diffuse,
            texture: None,
        }
    }
}

impl Material {
    /// Create a diffuse material.
    pub fn diffuse(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            ..Default::default()
        }
    }

    /// Create a mirror material. The color is only used if the mirror is
    /// ever shaded directly.
    pub fn mirror(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Color::ONE,
            surface: Surface::Mirror,
            texture: None,
        }
    }

    /// Create a glass material.
    pub fn glass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Color::ONE,
            surface: Surface::Glass,
            texture: None,
        }
    }

    /// Attach a diffuse texture.
    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let red = Material::diffuse("red", Color::new(1.0, 0.0, 0.0));
        assert_eq!(red.surface, Surface::Diffuse);
        assert_eq!(red.color, Color::X);

        assert_eq!(Material::mirror("m").surface, Surface::Mirror);
        assert_eq!(Material::glass("g").surface, Surface::Glass);
        assert!(Material::default().texture.is_none());
    }

    #[test]
    fn test_with_texture() {
        let tex = Arc::new(Texture::solid_color(Color::ONE));
        let mat = Material::diffuse("tiles", Color::ONE).with_texture(tex);
        assert!(mat.texture.is_some());
    }
}
