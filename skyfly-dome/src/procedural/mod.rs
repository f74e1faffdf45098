//! Procedural mesh generation
//!
//! Functions for generating the built-in scene meshes with UVs, normals and
//! baked vertex shading. Nothing here parses a model file format.

mod primitives;
mod scene;
mod types;

pub(crate) use scene::hash2;

pub use primitives::{generate_box, generate_dome, generate_plane};
pub use scene::{DOME_RADIUS, generate_city, generate_skydome, generate_terrain};
pub use types::{Mesh, MeshBuilder, Vertex};
