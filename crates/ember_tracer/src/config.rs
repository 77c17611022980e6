//! Render settings.
//!
//! Everything a frame needs besides the scene and the camera lives in
//! `RenderConfig`. It deserializes from JSON with every field optional, so a
//! settings file only has to name what it changes.

use std::path::Path;

use ember_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shading::{Lighting, ShadingModel};
use crate::transport::TirPolicy;

/// Light above the Cornell box, used for hard shadows.
pub const CEILING_LIGHT: Vec3 = Vec3::new(0.0, 0.89, 0.1);

/// Sample points across the ceiling light for soft shadows.
pub const CEILING_AREA_LIGHT: [Vec3; 6] = [
    Vec3::new(0.01, 0.89, -0.2),
    Vec3::new(0.02, 0.89, 0.0),
    Vec3::new(0.03, 0.89, 0.1),
    Vec3::new(0.04, 0.89, 0.2),
    Vec3::new(0.05, 0.89, 0.3),
    Vec3::new(0.06, 0.89, -0.1),
];

/// Errors from loading or checking a `RenderConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Image size {width}x{height} has no pixels")]
    EmptyImage { width: u32, height: u32 },

    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("At least one light is required")]
    NoLights,

    #[error("Ambient light must not be negative, got {0}")]
    NegativeAmbient(f32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Distance from the camera to the image plane
    pub focal_length: f32,
    /// Pixels per world unit on the image plane
    pub scale: f32,
    /// Light sample points. One point casts hard shadows, several average
    /// into soft shadows.
    pub lights: Vec<Vec3>,
    /// Lighting constants
    pub lighting: Lighting,
    /// Shading model for directly lit primary hits
    pub shading: ShadingModel,
    /// Push applied to reflection and refraction ray origins
    pub epsilon: f32,
    /// Push applied to shadow ray origins
    pub shadow_epsilon: f32,
    /// Index of refraction entering glass from a primary ray
    pub glass_ior: f32,
    /// Index of refraction entering glass from a reflected ray
    pub reflect_glass_ior: f32,
    /// Index of refraction leaving glass
    pub exit_ior: f32,
    /// Reflection depth at which a ray gives up
    pub max_reflect_depth: u32,
    /// Refraction depth past which a ray gives up
    pub max_refract_depth: u32,
    /// Rays traced after the camera ray before giving up, across mirrors
    /// and glass combined
    pub max_bounces: u32,
    /// What happens on total internal reflection
    pub tir: TirPolicy,
    /// Camera orbit per frame, in degrees around Y
    pub orbit_step_degrees: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            focal_length: 2.0,
            scale: 150.0,
            lights: vec![CEILING_LIGHT],
            lighting: Lighting::default(),
            shading: ShadingModel::Flat,
            epsilon: 0.001,
            shadow_epsilon: 0.001,
            glass_ior: 1.3,
            reflect_glass_ior: 1.6,
            exit_ior: 1.0 / 1.3,
            max_reflect_depth: 3,
            max_refract_depth: 240,
            max_bounces: 256,
            tir: TirPolicy::Reflect,
            orbit_step_degrees: 1.0,
        }
    }
}

impl RenderConfig {
    /// Defaults with the six-point ceiling light and the wider shadow push
    /// soft shadows use.
    pub fn soft_shadows() -> Self {
        Self {
            lights: CEILING_AREA_LIGHT.to_vec(),
            shadow_epsilon: 0.002,
            ..Default::default()
        }
    }

    /// Parse from a JSON string. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("Loaded render config from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        for (name, value) in [
            ("focal_length", self.focal_length),
            ("scale", self.scale),
            ("epsilon", self.epsilon),
            ("shadow_epsilon", self.shadow_epsilon),
            ("glass_ior", self.glass_ior),
            ("reflect_glass_ior", self.reflect_glass_ior),
            ("exit_ior", self.exit_ior),
        ] {
            // `!(x > 0)` also catches NaN
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        if self.lights.is_empty() {
            return Err(ConfigError::NoLights);
        }
        if self.lighting.ambient < 0.0 {
            return Err(ConfigError::NegativeAmbient(self.lighting.ambient));
        }
        Ok(())
    }

    /// Orbit step in radians.
    pub fn orbit_step(&self) -> f32 {
        self.orbit_step_degrees.to_radians()
    }

    /// Number of pixels in a frame.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lights, vec![CEILING_LIGHT]);
        assert_eq!(config.max_reflect_depth, 3);
        assert_eq!(config.max_refract_depth, 240);
        assert!(config.max_bounces > config.max_refract_depth);
        assert_eq!(config.pixel_count(), 320 * 240);
    }

    #[test]
    fn test_soft_shadows_preset() {
        let config = RenderConfig::soft_shadows();
        assert_eq!(config.lights.len(), 6);
        assert_eq!(config.shadow_epsilon, 0.002);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RenderConfig::from_json_str(
            r#"{ "width": 64, "shading": "phong", "tir": "absorb", "lighting": { "ambient": 0.1 } }"#,
        )
        .unwrap();

        assert_eq!(config.width, 64);
        assert_eq!(config.height, 240);
        assert_eq!(config.shading, ShadingModel::Phong);
        assert_eq!(config.tir, TirPolicy::Absorb);
        assert_eq!(config.lighting.ambient, 0.1);
        assert_eq!(config.lighting.shininess, Lighting::default().shininess);
    }

    #[test]
    fn test_lights_from_json_arrays() {
        let config = RenderConfig::from_json_str(r#"{ "lights": [[0.4, 0.4, 1.5]] }"#).unwrap();
        assert_eq!(config.lights, vec![Vec3::new(0.4, 0.4, 1.5)]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = RenderConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyImage { .. })));

        let config = RenderConfig {
            scale: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { name: "scale", .. })
        ));

        let config = RenderConfig {
            lights: vec![],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoLights)));

        let mut config = RenderConfig::default();
        config.lighting.ambient = -0.5;
        assert!(matches!(config.validate(), Err(ConfigError::NegativeAmbient(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            RenderConfig::from_json_str("{ width: }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = RenderConfig::from_json_file("no/such/config.json").unwrap_err();
        assert!(err.to_string().contains("no/such/config.json"));
    }
}
