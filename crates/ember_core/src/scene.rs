//! Scene assembly for the tracer.
//!
//! A `Scene` is built once from a mesh and its materials and is read-only
//! afterwards. Building validates the indices, resolves materials onto
//! triangles and computes the smooth vertex-normal table keyed by vertex id.

use std::sync::Arc;

use ember_math::{Aabb, Vec2, Vec3};
use thiserror::Error;

use crate::environment::EnvironmentMap;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::triangle::Triangle;

/// Errors that can occur while building a scene.
#[derive(Error, Debug, PartialEq)]
pub enum SceneError {
    #[error("No geometry found in scene")]
    NoGeometry,

    #[error("Index count {0} is not a multiple of 3")]
    RaggedIndices(usize),

    #[error("Face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    InvalidIndex {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Mesh has {faces} faces but {materials} face material ids")]
    MaterialCountMismatch { faces: usize, materials: usize },

    #[error("Face {face} uses material {material}, but only {material_count} are defined")]
    InvalidMaterial {
        face: usize,
        material: usize,
        material_count: usize,
    },

    #[error("Mesh has {vertices} vertices but {uvs} UV coordinates")]
    UvCountMismatch { vertices: usize, uvs: usize },
}

/// Result type for scene building.
pub type SceneResult<T> = Result<T, SceneError>;

/// A ready-to-trace scene.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Scene name (usually from filename)
    pub name: String,

    /// Every triangle, in face order
    pub triangles: Vec<Triangle>,

    /// Smooth normal per vertex id
    pub vertex_normals: Vec<Vec3>,

    /// Bounding box of all vertices
    pub bounds: Aabb,

    /// Optional cube map seen by reflection rays that leave the scene
    pub environment: Option<Arc<EnvironmentMap>>,
}

impl Scene {
    /// Build a scene from a mesh and the materials its faces reference.
    pub fn new(name: impl Into<String>, mesh: Mesh, materials: Vec<Material>) -> SceneResult<Self> {
        let name = name.into();
        validate(&mesh, &materials)?;

        let face_normals = mesh.face_normals();
        let vertex_normals = mesh.vertex_normals();

        let mut triangles = Vec::with_capacity(mesh.triangle_count());
        let mut degenerate = 0;

        for (face, (ids, normal)) in mesh.faces().zip(face_normals).enumerate() {
            let material = &materials[mesh.face_materials[face]];
            let vertices = ids.map(|id| mesh.positions[id as usize]);
            let uvs = mesh
                .uvs
                .as_ref()
                .map(|uvs| ids.map(|id| Vec2::from(uvs[id as usize])));

            if normal == Vec3::ZERO {
                degenerate += 1;
            }

            triangles.push(Triangle {
                vertices,
                vertex_ids: ids,
                normal,
                color: material.color,
                surface: material.surface,
                uvs,
                texture: material.texture.clone(),
            });
        }

        if degenerate > 0 {
            log::warn!(
                "Scene {}: {} degenerate triangles will never be hit",
                name,
                degenerate
            );
        }

        log::info!(
            "Built scene {}: {} triangles, {} vertices, {} materials",
            name,
            triangles.len(),
            vertex_normals.len(),
            materials.len()
        );

        Ok(Self {
            name,
            triangles,
            vertex_normals,
            bounds: mesh.bounds,
            environment: None,
        })
    }

    /// Attach an environment map.
    pub fn with_environment(mut self, environment: Arc<EnvironmentMap>) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Center of the bounding box; the camera orbits around it.
    pub fn center(&self) -> Vec3 {
        self.bounds.centroid()
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Get the number of vertex ids.
    pub fn vertex_count(&self) -> usize {
        self.vertex_normals.len()
    }

    /// Smooth normal of a vertex id.
    #[inline]
    pub fn vertex_normal(&self, id: u32) -> Vec3 {
        self.vertex_normals[id as usize]
    }
}

fn validate(mesh: &Mesh, materials: &[Material]) -> SceneResult<()> {
    if mesh.indices.len() % 3 != 0 {
        return Err(SceneError::RaggedIndices(mesh.indices.len()));
    }
    if mesh.triangle_count() == 0 {
        return Err(SceneError::NoGeometry);
    }
    if mesh.face_materials.len() != mesh.triangle_count() {
        return Err(SceneError::MaterialCountMismatch {
            faces: mesh.triangle_count(),
            materials: mesh.face_materials.len(),
        });
    }
    if let Some(uvs) = &mesh.uvs {
        if uvs.len() != mesh.vertex_count() {
            return Err(SceneError::UvCountMismatch {
                vertices: mesh.vertex_count(),
                uvs: uvs.len(),
            });
        }
    }

    for (face, ids) in mesh.faces().enumerate() {
        if let Some(&index) = ids.iter().find(|&&i| i as usize >= mesh.vertex_count()) {
            return Err(SceneError::InvalidIndex {
                face,
                index,
                vertex_count: mesh.vertex_count(),
            });
        }
        let material = mesh.face_materials[face];
        if material >= materials.len() {
            return Err(SceneError::InvalidMaterial {
                face,
                material,
                material_count: materials.len(),
            });
        }
    }

    Ok(())
}
