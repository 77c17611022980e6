//! Small scenes shared by the integration tests.

#![allow(dead_code)]

use ember_core::{Color, Material, Mesh, Scene};
use ember_math::Vec3;

/// Axis-aligned square at height `y` facing +Y.
pub fn floor(mesh: &mut Mesh, y: f32, half: f32, material: usize) {
    mesh.add_quad(
        [
            Vec3::new(-half, y, half),
            Vec3::new(half, y, half),
            Vec3::new(half, y, -half),
            Vec3::new(-half, y, -half),
        ],
        material,
    );
}

/// Axis-aligned square at depth `z` facing +Z.
pub fn back_wall(mesh: &mut Mesh, z: f32, half: f32, material: usize) {
    mesh.add_quad(
        [
            Vec3::new(-half, -half, z),
            Vec3::new(half, -half, z),
            Vec3::new(half, half, z),
            Vec3::new(-half, half, z),
        ],
        material,
    );
}

/// Axis-aligned square at depth `z` facing -Z.
pub fn front_wall(mesh: &mut Mesh, z: f32, half: f32, material: usize) {
    mesh.add_quad(
        [
            Vec3::new(-half, -half, z),
            Vec3::new(-half, half, z),
            Vec3::new(half, half, z),
            Vec3::new(half, -half, z),
        ],
        material,
    );
}

/// A small open-front room with a mirror panel and a glass block.
pub fn room() -> Scene {
    let materials = vec![
        Material::diffuse("white", Color::splat(0.9)),
        Material::diffuse("red", Color::new(0.9, 0.1, 0.1)),
        Material::mirror("mirror"),
        Material::glass("glass"),
    ];
    let mut mesh = Mesh::default();
    floor(&mut mesh, -1.0, 1.0, 0);
    back_wall(&mut mesh, -1.0, 1.0, 0);
    // left wall facing +X
    mesh.add_quad(
        [
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ],
        1,
    );
    // mirror panel on the right, facing -X
    mesh.add_quad(
        [
            Vec3::new(0.95, -0.8, -0.6),
            Vec3::new(0.95, -0.8, 0.6),
            Vec3::new(0.95, 0.6, 0.6),
            Vec3::new(0.95, 0.6, -0.6),
        ],
        2,
    );
    mesh.add_box(Vec3::new(-0.6, -1.0, -0.4), Vec3::new(-0.1, -0.3, 0.1), 3);

    Scene::new("room", mesh, materials).unwrap()
}
