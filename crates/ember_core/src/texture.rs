//! Texture images for materials and environment maps.
//!
//! Pixels are stored as 0-1 RGB straight from the 8-bit source. Ember
//! shades in display space, so no sRGB linearization happens here.

use std::path::Path;

use thiserror::Error;

use crate::material::Color;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture has no pixels")]
    Empty,

    #[error("Pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGB")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A loaded texture with pixel data.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data, row-major, top row first
    pub pixels: Vec<Color>,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
            path: "<solid>".to_string(),
        }
    }

    /// Create a texture from tightly packed 8-bit RGB bytes.
    pub fn from_rgb8(width: u32, height: u32, bytes: &[u8]) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        let expected = width as usize * height as usize * 3;
        if bytes.len() != expected {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }

        let pixels = bytes
            .chunks_exact(3)
            .map(|p| Color::new(p[0] as f32, p[1] as f32, p[2] as f32) / 255.0)
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
            path: "<memory>".to_string(),
        })
    }

    /// Load a texture from an image file (PPM, PNG, ...).
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TextureError::Load {
            path: path.display().to_string(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let mut texture = Self::from_rgb8(width, height, rgb.as_raw())?;
        texture.path = path.display().to_string();

        log::debug!("Loaded texture: {} ({}x{})", texture.path, width, height);

        Ok(texture)
    }

    /// Sample the texture at UV coordinates (nearest texel).
    ///
    /// UV coordinates wrap into [0, 1], with (0, 0) at the top-left texel.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let u = u.rem_euclid(1.0);
        let v = v.rem_euclid(1.0);

        let x = (u * (self.width - 1) as f32) as u32;
        let y = (v * (self.height - 1) as f32) as u32;

        self.texel(x, y)
    }

    /// Get pixel at integer coordinates, clamped to the image.
    pub fn texel(&self, x: u32, y: u32) -> Color {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let idx = (y * self.width + x) as usize;
        self.pixels.get(idx).copied().unwrap_or(Color::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_texture() {
        let tex = Texture::solid_color(Color::new(1.0, 0.5, 0.0));
        assert_eq!(tex.width, 1);
        assert_eq!(tex.height, 1);

        let sample = tex.sample(0.5, 0.5);
        assert!((sample.x - 1.0).abs() < 0.001);
        assert!((sample.y - 0.5).abs() < 0.001);
        assert!((sample.z - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_from_rgb8_corners() {
        // 2x2: red, green / blue, white
        let bytes = [255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let tex = Texture::from_rgb8(2, 2, &bytes).unwrap();

        assert_eq!(tex.sample(0.0, 0.0), Color::X);
        assert_eq!(tex.sample(0.99, 0.0), Color::X); // nearest truncates
        assert_eq!(tex.texel(1, 0), Color::Y);
        assert_eq!(tex.texel(0, 1), Color::Z);
        assert_eq!(tex.texel(5, 5), Color::ONE);
    }

    #[test]
    fn test_from_rgb8_size_mismatch() {
        let err = Texture::from_rgb8(2, 2, &[0; 5]).unwrap_err();
        assert!(matches!(err, TextureError::SizeMismatch { expected: 12, .. }));
        assert!(matches!(
            Texture::from_rgb8(0, 4, &[]),
            Err(TextureError::Empty)
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Texture::load("does/not/exist.ppm").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.ppm"));
    }
}
