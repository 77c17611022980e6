//! Ember Core - scene data for the Ember ray tracer.
//!
//! This crate provides:
//!
//! - **Geometry**: `Mesh` (shared vertex pool + indexed faces) and the
//!   immutable `Triangle` records the tracer works on
//! - **Materials**: `Material` with a `Surface` kind (diffuse, mirror, glass)
//! - **Scene**: `Scene`, which assigns integer vertex ids and the
//!   averaged vertex-normal table at build time
//! - **Images**: `Texture` and the cube `EnvironmentMap`
//!
//! # Example
//!
//! ```ignore
//! use ember_core::{Material, Mesh, Scene};
//!
//! let mut mesh = Mesh::default();
//! mesh.add_quad([a, b, c, d], 0);
//! let scene = Scene::new("room", mesh, vec![Material::diffuse("white", Color::ONE)])?;
//! println!("{} triangles", scene.triangle_count());
//! ```

pub mod environment;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod texture;
pub mod triangle;

// Re-export commonly used types
pub use environment::{CubeFace, EnvironmentMap};
pub use material::{Color, Material, Surface};
pub use mesh::Mesh;
pub use scene::{Scene, SceneError, SceneResult};
pub use texture::{Texture, TextureError, TextureResult};
pub use triangle::Triangle;
