//! Brightness of directly lit surfaces.
//!
//! Shading produces a scalar brightness in [0, 1] that scales the surface
//! color. Each light sample contributes diffuse and ambient terms, replaced
//! by ambient alone when the sample is occluded, plus a specular term.
//! Several samples average into a soft shadow.
//!
//! Three normal sources are supported:
//! - **Flat**: the face normal at the hit point
//! - **Gouraud**: lighting evaluated at each vertex with its smooth
//!   normal, cached per frame by vertex id and interpolated
//! - **Phong**: smooth normals interpolated to the hit point

use std::f32::consts::PI;

use ember_core::Scene;
use ember_math::{reflect, Interval, Ray, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::RenderConfig;
use crate::hit::Hit;
use crate::intersect::closest_intersection;

/// Which normal the lighting model is evaluated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingModel {
    #[default]
    Flat,
    Gouraud,
    Phong,
}

/// Lighting constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lighting {
    /// Brightness floor, also the full brightness of shadowed samples
    pub ambient: f32,
    /// Specular exponent
    pub shininess: f32,
    /// Numerator of the distance falloff
    pub intensity: f32,
    /// Falloff spread: brightness is `intensity / (falloff * pi * d^2)`
    pub falloff: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: 0.3,
            shininess: 500.0,
            intensity: 7.0,
            falloff: 5.0,
        }
    }
}

impl Lighting {
    /// Distance attenuation of a light `distance` away.
    #[inline]
    pub fn proximity(&self, distance: f32) -> f32 {
        self.intensity / (self.falloff * PI * distance * distance)
    }
}

/// Lighting terms of one vertex, one entry per light sample.
///
/// Shadowing is left out: the caller picks `lit` or `shadowed` per light
/// from its own shadow test.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VertexLighting {
    /// Diffuse plus ambient plus specular, as if the light were visible
    pub lit: Vec<f32>,
    /// Ambient plus specular
    pub shadowed: Vec<f32>,
}

impl VertexLighting {
    pub fn evaluate(config: &RenderConfig, eye: Vec3, point: Vec3, normal: Vec3) -> Self {
        let (lit, shadowed) = config
            .lights
            .iter()
            .map(|&light| light_terms(&config.lighting, eye, point, normal, light))
            .unzip();
        Self { lit, shadowed }
    }

    /// Mean over the light samples, taking `shadowed` where `occluded` is set.
    /// Not clamped.
    pub fn mean(&self, occluded: &[bool]) -> f32 {
        if self.lit.is_empty() {
            return 0.0;
        }
        let total: f32 = self
            .lit
            .iter()
            .zip(&self.shadowed)
            .zip(occluded)
            .map(|((&lit, &shadowed), &occluded)| if occluded { shadowed } else { lit })
            .sum();
        total / self.lit.len() as f32
    }
}

/// Per-frame vertex lighting, indexed by vertex id.
///
/// Each vertex is evaluated at most once per frame.
#[derive(Debug, Clone, Default)]
pub struct BrightnessCache {
    values: Vec<Option<VertexLighting>>,
}

impl BrightnessCache {
    /// An empty cache for `vertex_count` vertex ids.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            values: vec![None; vertex_count],
        }
    }

    pub fn get(&self, id: u32) -> Option<&VertexLighting> {
        self.values.get(id as usize).and_then(Option::as_ref)
    }

    /// Return the cached lighting of `id`, computing it on first use.
    pub fn get_or_insert_with(
        &mut self,
        id: u32,
        compute: impl FnOnce() -> VertexLighting,
    ) -> &VertexLighting {
        let index = id as usize;
        if index >= self.values.len() {
            self.values.resize(index + 1, None);
        }
        self.values[index].get_or_insert_with(compute)
    }

    /// Number of vertices evaluated so far.
    pub fn filled(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Lambert term scaled by distance falloff, clamped to [0, 1].
pub fn diffuse(point: Vec3, normal: Vec3, light: Vec3, lighting: &Lighting) -> f32 {
    let to_light = light - point;
    let incidence = normal.normalize_or_zero().dot(to_light.normalize_or_zero()).max(0.0);
    (lighting.proximity(to_light.length()) * incidence).clamp(0.0, 1.0)
}

/// Phong specular highlight seen from `eye`.
pub fn specular(point: Vec3, eye: Vec3, light: Vec3, normal: Vec3, shininess: f32) -> f32 {
    let view = (eye - point).normalize_or_zero();
    let to_light = (light - point).normalize_or_zero();
    view.dot(reflect(-to_light, normal)).max(0.0).powf(shininess)
}

/// Brightness of one light sample when visible and when occluded.
fn light_terms(lighting: &Lighting, eye: Vec3, point: Vec3, normal: Vec3, light: Vec3) -> (f32, f32) {
    let highlight = specular(point, eye, light, normal, lighting.shininess);
    let lit = (diffuse(point, normal, light, lighting) + lighting.ambient).max(lighting.ambient);
    (lit + highlight, lighting.ambient + highlight)
}

/// True if something accepted by `occludes` sits between `point` and `light`.
pub fn in_shadow(
    scene: &Scene,
    point: Vec3,
    light: Vec3,
    epsilon: f32,
    occludes: impl Fn(&Hit) -> bool,
) -> bool {
    let light_distance = (light - point).length();
    let ray = Ray::offset(point, light - point, epsilon);
    closest_intersection(&ray, &scene.triangles)
        .is_some_and(|hit| hit.distance < light_distance && occludes(&hit))
}

/// Shadow test from `point` toward every light, in light order.
pub fn shadow_mask(
    scene: &Scene,
    config: &RenderConfig,
    point: Vec3,
    occludes: impl Fn(&Hit) -> bool,
) -> Vec<bool> {
    config
        .lights
        .iter()
        .map(|&light| in_shadow(scene, point, light, config.shadow_epsilon, &occludes))
        .collect()
}

/// Average brightness over every light sample, clamped to [0, 1].
///
/// This is the whole lighting model; Flat and Phong only differ in the
/// normal they pass in.
pub fn brightness(
    scene: &Scene,
    config: &RenderConfig,
    eye: Vec3,
    point: Vec3,
    normal: Vec3,
    occludes: impl Fn(&Hit) -> bool,
) -> f32 {
    let lighting = &config.lighting;
    if config.lights.is_empty() {
        return Interval::UNIT.clamp(lighting.ambient);
    }

    let total: f32 = config
        .lights
        .iter()
        .map(|&light| {
            let (lit, shadowed) = light_terms(lighting, eye, point, normal, light);
            if in_shadow(scene, point, light, config.shadow_epsilon, &occludes) {
                shadowed
            } else {
                lit
            }
        })
        .sum();

    Interval::UNIT.clamp(total / config.lights.len() as f32)
}

/// Flat shading: face normal at the hit point.
pub fn flat(scene: &Scene, config: &RenderConfig, eye: Vec3, hit: &Hit) -> f32 {
    brightness(scene, config, eye, hit.point, hit.triangle.normal, |h| {
        h.index != hit.index
    })
}

/// Phong shading: smooth normal interpolated to the hit point.
pub fn phong(scene: &Scene, config: &RenderConfig, eye: Vec3, hit: &Hit) -> f32 {
    let weights = hit.weights();
    let [n0, n1, n2] = hit.triangle.vertex_ids.map(|id| scene.vertex_normal(id));
    let normal = (n0 * weights.x + n1 * weights.y + n2 * weights.z)
        .try_normalize()
        .unwrap_or(hit.triangle.normal);

    brightness(scene, config, eye, hit.point, normal, |h| h.index != hit.index)
}

/// Gouraud shading: vertex lighting interpolated to the hit point.
///
/// Vertex terms are cached per frame by vertex id. Shadows are tested from
/// the hit point, so an occluder inside a large face still darkens it.
pub fn gouraud(
    scene: &Scene,
    config: &RenderConfig,
    eye: Vec3,
    hit: &Hit,
    cache: &mut BrightnessCache,
) -> f32 {
    if config.lights.is_empty() {
        return Interval::UNIT.clamp(config.lighting.ambient);
    }

    let occluded = shadow_mask(scene, config, hit.point, |h| h.index != hit.index);
    let tri = hit.triangle;
    let weights = hit.weights().to_array();

    let mut total = 0.0;
    for ((&id, &position), weight) in tri.vertex_ids.iter().zip(&tri.vertices).zip(weights) {
        let terms = cache.get_or_insert_with(id, || {
            VertexLighting::evaluate(config, eye, position, scene.vertex_normal(id))
        });
        total += weight * terms.mean(&occluded);
    }

    Interval::UNIT.clamp(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::{Color, Material, Mesh};

    fn floor_scene() -> Scene {
        let mut mesh = Mesh::default();
        mesh.add_quad(
            [
                Vec3::new(-1.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, -1.0),
                Vec3::new(-1.0, 0.0, -1.0),
            ],
            0,
        );
        Scene::new("floor", mesh, vec![Material::diffuse("white", Color::ONE)]).unwrap()
    }

    #[test]
    fn test_proximity_default() {
        let lighting = Lighting::default();
        assert!((lighting.proximity(1.0) - 7.0 / (5.0 * PI)).abs() < 1e-6);
    }

    #[test]
    fn test_diffuse_facing_and_away() {
        let lighting = Lighting::default();
        let lit = diffuse(Vec3::ZERO, Vec3::Y, Vec3::new(0.0, 0.5, 0.0), &lighting);
        let away = diffuse(Vec3::ZERO, Vec3::NEG_Y, Vec3::new(0.0, 0.5, 0.0), &lighting);

        assert_eq!(lit, 1.0); // 7 / (5 pi 0.25) > 1, clamped
        assert_eq!(away, 0.0);
    }

    #[test]
    fn test_specular_peak_on_mirror_direction() {
        let light = Vec3::new(-1.0, 1.0, 0.0);
        let eye = Vec3::new(1.0, 1.0, 0.0);
        let on_peak = specular(Vec3::ZERO, eye, light, Vec3::Y, 500.0);
        let off_peak = specular(Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0), light, Vec3::Y, 500.0);

        assert!((on_peak - 1.0).abs() < 1e-4);
        assert!(off_peak < 1e-6);
    }

    #[test]
    fn test_brightness_cache_computes_once() {
        let mut cache = BrightnessCache::new(2);
        let mut calls = 0;
        let first = cache
            .get_or_insert_with(1, || {
                calls += 1;
                VertexLighting { lit: vec![0.5], shadowed: vec![0.25] }
            })
            .clone();
        let second = cache
            .get_or_insert_with(1, || {
                calls += 1;
                VertexLighting::default()
            })
            .clone();

        assert_eq!(first, second);
        assert_eq!(calls, 1);
        assert!(cache.get(0).is_none());
        assert_eq!(cache.filled(), 1);
    }

    #[test]
    fn test_vertex_lighting_mean_picks_shadowed_terms() {
        let terms = VertexLighting {
            lit: vec![0.8, 0.6],
            shadowed: vec![0.3, 0.4],
        };
        assert!((terms.mean(&[false, false]) - 0.7).abs() < 1e-6);
        assert!((terms.mean(&[true, false]) - 0.45).abs() < 1e-6);
        assert!((terms.mean(&[true, true]) - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_lit_point_brighter_than_ambient() {
        let scene = floor_scene();
        let config = RenderConfig {
            lights: vec![Vec3::new(0.0, 1.0, 0.0)],
            ..Default::default()
        };
        let ray = Ray::new(Vec3::new(0.1, 2.0, 0.1), Vec3::NEG_Y);
        let hit = closest_intersection(&ray, &scene.triangles).unwrap();
        let eye = ray.origin;

        let b = flat(&scene, &config, eye, &hit);
        assert!(b > config.lighting.ambient);
        assert!(b <= 1.0);
    }

    #[test]
    fn test_light_below_floor_is_ambient() {
        let scene = floor_scene();
        let config = RenderConfig {
            lights: vec![Vec3::new(0.0, -1.0, 0.0)],
            ..Default::default()
        };
        let ray = Ray::new(Vec3::new(0.3, 2.0, 0.3), Vec3::NEG_Y);
        let hit = closest_intersection(&ray, &scene.triangles).unwrap();

        // no diffuse and the highlight is reflected below the floor
        let b = flat(&scene, &config, ray.origin, &hit);
        assert!((b - config.lighting.ambient).abs() < 1e-6);
    }

    #[test]
    fn test_soft_average_of_one_light_matches_hard() {
        let scene = floor_scene();
        let light = Vec3::new(0.2, 0.9, 0.0);
        let hard = RenderConfig {
            lights: vec![light],
            ..Default::default()
        };
        let soft = RenderConfig {
            lights: vec![light; 4],
            ..Default::default()
        };
        let ray = Ray::new(Vec3::new(-0.4, 2.0, 0.2), Vec3::NEG_Y);
        let hit = closest_intersection(&ray, &scene.triangles).unwrap();

        let a = flat(&scene, &hard, ray.origin, &hit);
        let b = flat(&scene, &soft, ray.origin, &hit);
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn test_phong_on_flat_floor_matches_flat() {
        let scene = floor_scene();
        let config = RenderConfig {
            lights: vec![Vec3::new(0.5, 1.5, 0.0)],
            ..Default::default()
        };
        let ray = Ray::new(Vec3::new(-0.3, 2.0, 0.4), Vec3::NEG_Y);
        let hit = closest_intersection(&ray, &scene.triangles).unwrap();

        let f = flat(&scene, &config, ray.origin, &hit);
        let p = phong(&scene, &config, ray.origin, &hit);
        assert!((f - p).abs() < 1e-5);
    }

    #[test]
    fn test_gouraud_fills_cache_for_hit_triangle() {
        let scene = floor_scene();
        let config = RenderConfig::default();
        let mut cache = BrightnessCache::new(scene.vertex_count());
        let ray = Ray::new(Vec3::new(0.5, 2.0, 0.2), Vec3::NEG_Y);
        let hit = closest_intersection(&ray, &scene.triangles).unwrap();

        let b = gouraud(&scene, &config, ray.origin, &hit, &mut cache);

        assert_eq!(cache.filled(), 3);
        let cached = hit
            .triangle
            .vertex_ids
            .map(|id| cache.get(id).unwrap().mean(&[false]));
        let lo = cached.iter().copied().fold(f32::INFINITY, f32::min);
        let hi = cached.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert!(b >= lo - 1e-6 && b <= hi + 1e-6);
    }
}
