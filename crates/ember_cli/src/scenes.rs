//! Built-in scenes.

use std::f32::consts::PI;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use ember_core::{Color, EnvironmentMap, Material, Mesh, Scene, Texture};
use ember_math::Vec3;
use ember_tracer::CEILING_LIGHT;

use crate::cli::SceneKind;

/// Light in front of the sphere.
pub const SPHERE_LIGHT: Vec3 = Vec3::new(0.4, 0.4, 1.5);

/// Cube map file stems, in face order.
const CUBE_FACES: [&str; 6] = ["right", "left", "up", "down", "front", "back"];

impl SceneKind {
    /// Light used when no config file names one.
    pub fn default_light(self) -> Vec3 {
        match self {
            SceneKind::Cornell => CEILING_LIGHT,
            SceneKind::Sphere => SPHERE_LIGHT,
        }
    }
}

pub fn build(kind: SceneKind, floor_texture: Option<&Path>) -> Result<Scene> {
    let scene = match kind {
        SceneKind::Cornell => {
            let texture = floor_texture
                .map(|path| {
                    Texture::load(path)
                        .with_context(|| format!("loading floor texture {}", path.display()))
                })
                .transpose()?;
            cornell_box(texture.map(Arc::new))?
        }
        SceneKind::Sphere => sphere()?,
    };
    Ok(scene)
}

/// Cornell box open toward +Z, spanning -1..1 on every axis.
pub fn cornell_box(floor_texture: Option<Arc<Texture>>) -> Result<Scene> {
    let mut floor = Material::diffuse("floor", Color::splat(0.8));
    if let Some(texture) = floor_texture.clone() {
        floor = floor.with_texture(texture);
    }
    let materials = vec![
        floor,
        Material::diffuse("white", Color::splat(0.8)),
        Material::diffuse("red", Color::new(0.8, 0.1, 0.1)),
        Material::diffuse("green", Color::new(0.1, 0.8, 0.1)),
        Material::mirror("mirror"),
        Material::glass("glass"),
    ];

    let mut mesh = Mesh::default();
    let floor_start = mesh.vertex_count();
    mesh.add_quad(
        [
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(-1.0, -1.0, -1.0),
        ],
        0,
    );
    // ceiling
    mesh.add_quad(
        [
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ],
        1,
    );
    // back
    mesh.add_quad(
        [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
        ],
        1,
    );
    // left
    mesh.add_quad(
        [
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ],
        2,
    );
    // right
    mesh.add_quad(
        [
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, -1.0),
        ],
        3,
    );
    mesh.add_box(Vec3::new(0.15, -1.0, -0.6), Vec3::new(0.65, 0.2, -0.1), 4);
    mesh.add_box(Vec3::new(-0.65, -1.0, -0.2), Vec3::new(-0.15, -0.4, 0.3), 5);

    if floor_texture.is_some() {
        let mut uvs = vec![[0.0, 0.0]; mesh.vertex_count()];
        let corners = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
        uvs[floor_start..floor_start + 4].copy_from_slice(&corners);
        mesh.uvs = Some(uvs);
    }

    Ok(Scene::new("cornell", mesh, materials)?)
}

/// A UV sphere with shared vertices, so smooth shading has real normals.
pub fn sphere() -> Result<Scene> {
    let mut mesh = Mesh::default();
    add_uv_sphere(&mut mesh, Vec3::ZERO, 0.5, 24, 16, 0);
    let materials = vec![Material::diffuse("red", Color::new(0.9, 0.2, 0.2))];
    Ok(Scene::new("sphere", mesh, materials)?)
}

fn add_uv_sphere(
    mesh: &mut Mesh,
    center: Vec3,
    radius: f32,
    slices: u32,
    stacks: u32,
    material: usize,
) {
    let top = mesh.add_vertex(center + Vec3::Y * radius);
    let rings: Vec<Vec<u32>> = (1..stacks)
        .map(|i| {
            let phi = PI * i as f32 / stacks as f32;
            (0..slices)
                .map(|j| {
                    let theta = 2.0 * PI * j as f32 / slices as f32;
                    let dir = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
                    mesh.add_vertex(center + dir * radius)
                })
                .collect()
        })
        .collect();
    let bottom = mesh.add_vertex(center - Vec3::Y * radius);

    let s = slices as usize;
    for j in 0..s {
        let k = (j + 1) % s;
        mesh.add_face([top, rings[0][k], rings[0][j]], material);
        for pair in rings.windows(2) {
            let (upper, lower) = (&pair[0], &pair[1]);
            mesh.add_face([upper[j], upper[k], lower[k]], material);
            mesh.add_face([upper[j], lower[k], lower[j]], material);
        }
        let last = &rings[rings.len() - 1];
        mesh.add_face([bottom, last[j], last[k]], material);
    }
}

/// Load a cube map from `<dir>/<face>.png` (or `.ppm`).
pub fn load_environment(dir: &Path) -> Result<EnvironmentMap> {
    let mut faces = Vec::with_capacity(6);
    for stem in CUBE_FACES {
        let path = ["png", "ppm"]
            .iter()
            .map(|ext| dir.join(format!("{stem}.{ext}")))
            .find(|p| p.exists())
            .with_context(|| format!("no {stem}.png or {stem}.ppm in {}", dir.display()))?;
        faces.push(Arc::new(Texture::load(&path)?));
    }
    let faces: [Arc<Texture>; 6] = faces
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected six cube map faces"))?;
    Ok(EnvironmentMap::new(faces))
}
