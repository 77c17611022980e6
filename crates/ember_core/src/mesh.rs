//! Mesh geometry representation for Ember scenes.
//!
//! A mesh is a shared vertex pool plus indexed faces, the shape an OBJ
//! loader produces. Each face carries a material id. Vertex indices are the
//! vertex ids the tracer uses to key normals and brightness caches, so two
//! faces share a smooth normal exactly when they share an index.

use std::collections::HashMap;

use ember_math::{Aabb, Vec3};

use crate::triangle::face_normal;

/// A mesh consisting of vertex positions, optional UVs, and triangle indices.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// UV coordinates (optional - one [u, v] per vertex)
    pub uvs: Option<Vec<[f32; 2]>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Material id of each triangle
    pub face_materials: Vec<usize>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh from positions, indices and per-face material ids.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, face_materials: Vec<usize>) -> Self {
        let bounds = Aabb::enclosing(&positions);
        Self {
            positions,
            uvs: None,
            indices,
            face_materials,
            bounds,
        }
    }

    /// Build a mesh from unindexed triangles, welding vertices whose
    /// coordinates are bit-for-bit identical.
    ///
    /// This is the one place positions are compared; everything downstream
    /// works on the resulting integer ids.
    pub fn from_triangle_soup(triangles: &[[Vec3; 3]], face_materials: Vec<usize>) -> Self {
        let mut ids: HashMap<[u32; 3], u32> = HashMap::new();
        let mut positions = Vec::new();
        let mut indices = Vec::with_capacity(triangles.len() * 3);

        for tri in triangles {
            for p in tri {
                let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
                let id = *ids.entry(key).or_insert_with(|| {
                    positions.push(*p);
                    (positions.len() - 1) as u32
                });
                indices.push(id);
            }
        }

        log::debug!(
            "Welded {} triangle corners into {} vertices",
            triangles.len() * 3,
            positions.len()
        );

        Self::new(positions, indices, face_materials)
    }

    /// Append a vertex and return its id.
    pub fn add_vertex(&mut self, position: Vec3) -> u32 {
        self.positions.push(position);
        self.bounds = self.bounds.include(position);
        (self.positions.len() - 1) as u32
    }

    /// Append a triangle over existing vertex ids.
    pub fn add_face(&mut self, ids: [u32; 3], material: usize) {
        self.indices.extend_from_slice(&ids);
        self.face_materials.push(material);
    }

    /// Append a counter-clockwise quad `a b c d` as two triangles sharing
    /// the `a c` diagonal.
    pub fn add_quad(&mut self, corners: [Vec3; 4], material: usize) {
        let [a, b, c, d] = corners.map(|p| self.add_vertex(p));
        self.add_face([a, b, c], material);
        self.add_face([a, c, d], material);
    }

    /// Append a closed axis-aligned box with outward-facing triangles.
    ///
    /// The eight corners are shared, so smooth normals on a box point
    /// diagonally out of its corners.
    pub fn add_box(&mut self, min: Vec3, max: Vec3, material: usize) {
        let corner = |i: u32| {
            Vec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            )
        };
        let base = self.positions.len() as u32;
        for i in 0..8 {
            self.add_vertex(corner(i));
        }

        // Each face lists its corners counter-clockwise seen from outside.
        const FACES: [[u32; 4]; 6] = [
            [0, 4, 6, 2], // -X
            [1, 3, 7, 5], // +X
            [0, 1, 5, 4], // -Y
            [2, 6, 7, 3], // +Y
            [0, 2, 3, 1], // -Z
            [4, 5, 7, 6], // +Z
        ];
        for [a, b, c, d] in FACES {
            self.add_face([base + a, base + b, base + c], material);
            self.add_face([base + a, base + c, base + d], material);
        }
    }

    /// Unit normal of every face (zero for degenerate faces).
    pub fn face_normals(&self) -> Vec<Vec3> {
        self.faces()
            .map(|[i0, i1, i2]| {
                face_normal(
                    self.positions[i0 as usize],
                    self.positions[i1 as usize],
                    self.positions[i2 as usize],
                )
            })
            .collect()
    }

    /// Smooth vertex normals: the unweighted mean of the unit normals of
    /// every face sharing the vertex, renormalized.
    ///
    /// A vertex no face uses, or whose face normals cancel out, gets +Y.
    /// Indices must already be in range.
    pub fn vertex_normals(&self) -> Vec<Vec3> {
        let mut sums = vec![Vec3::ZERO; self.positions.len()];

        for (ids, normal) in self.faces().zip(self.face_normals()) {
            for id in ids {
                sums[id as usize] += normal;
            }
        }

        sums.into_iter()
            .map(|sum| sum.try_normalize().unwrap_or(Vec3::Y))
            .collect()
    }

    /// Iterate over faces as vertex-id triples.
    pub fn faces(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|face| [face[0], face[1], face[2]])
    }

    /// Check if the mesh has UV coordinates.
    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    /// Get the mesh center (center of bounding box).
    pub fn center(&self) -> Vec3 {
        self.bounds.centroid()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_creation() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let mesh = Mesh::new(positions, vec![0, 1, 2], vec![0]);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.has_uvs());
        assert_eq!(mesh.center(), Vec3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_vertex_normals_single_triangle() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2], vec![0]);

        for normal in mesh.vertex_normals() {
            assert!((normal - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_vertex_normals_are_unweighted() {
        // A large floor triangle and a tiny wall triangle share vertex 0.
        // Area weighting would pull the shared normal toward +Y.
        let positions = vec![
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 0.1, 0.0),
            Vec3::new(0.0, 0.0, 0.1),
        ];
        // floor normal +Y, wall normal +X
        let mesh = Mesh::new(positions, vec![0, 1, 2, 0, 3, 4], vec![0, 0]);
        let normals = mesh.vertex_normals();

        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((normals[0] - expected).length() < 1e-5);
    }

    #[test]
    fn test_unused_vertex_gets_default_normal() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::splat(5.0)];
        let mesh = Mesh::new(positions, vec![0, 1, 2], vec![0]);
        assert_eq!(mesh.vertex_normals()[3], Vec3::Y);
    }

    #[test]
    fn test_triangle_soup_welds_shared_corners() {
        let a = Vec3::ZERO;
        let b = Vec3::X;
        let c = Vec3::Y;
        let d = Vec3::new(1.0, 1.0, 0.0);
        let mesh = Mesh::from_triangle_soup(&[[a, b, c], [b, d, c]], vec![0, 1]);

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 1, 3, 2]);
        assert_eq!(mesh.face_materials, vec![0, 1]);
    }

    #[test]
    fn test_add_quad() {
        let mut mesh = Mesh::default();
        mesh.add_quad(
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            3,
        );

        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.face_materials, vec![3, 3]);
        for normal in mesh.face_normals() {
            assert!((normal - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_add_box_faces_point_outward() {
        let mut mesh = Mesh::default();
        mesh.add_box(Vec3::splat(-1.0), Vec3::splat(1.0), 0);

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);

        let center = mesh.center();
        for (face, normal) in mesh.faces().zip(mesh.face_normals()) {
            let p = mesh.positions[face[0] as usize];
            let q = mesh.positions[face[1] as usize];
            let r = mesh.positions[face[2] as usize];
            let face_center = (p + q + r) / 3.0;
            assert!(normal.dot(face_center - center) > 0.0);
        }
    }

    #[test]
    fn test_bounds_tracks_added_vertices() {
        let mut mesh = Mesh::default();
        mesh.add_vertex(Vec3::new(-1.0, -2.0, -3.0));
        mesh.add_vertex(Vec3::new(4.0, 5.0, 6.0));

        assert_eq!(mesh.bounds.min(), Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(mesh.bounds.max(), Vec3::new(4.0, 5.0, 6.0));
    }
}
