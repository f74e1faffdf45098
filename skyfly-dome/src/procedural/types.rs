//! Procedural mesh types
//!
//! Shared types for procedural mesh generation.

use glam::{Mat4, Vec2, Vec3};
use skyfly_shared::Rgba8;
use tracing::warn;

/// Trait for mesh construction - enables generic geometry generation
pub trait MeshBuilder: Default {
    /// Add a vertex with position, UV coordinates and normal, returning its index
    fn add_vertex(&mut self, position: Vec3, uv: (f32, f32), normal: Vec3) -> u16;

    /// Add a triangle using three vertex indices
    fn add_triangle(&mut self, i0: u16, i1: u16, i2: u16);
}

/// Mesh vertex as the rasterizer consumes it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
    /// Baked vertex shade
    pub color: Rgba8,
}

/// Indexed triangle mesh
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    /// Triangle indices (u16, three per triangle)
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                &self.vertices[tri[0] as usize],
                &self.vertices[tri[1] as usize],
                &self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Set every vertex shade from its position and normal
    pub fn paint(&mut self, shade: impl Fn(Vec3, Vec3) -> Rgba8) {
        for vertex in &mut self.vertices {
            vertex.color = shade(vertex.position, vertex.normal);
        }
    }

    /// Append `other` transformed by `transform`.
    ///
    /// Meshes are limited to u16 indices; an append that would overflow is
    /// skipped with a warning.
    pub fn append(&mut self, other: &Mesh, transform: &Mat4) {
        let base = self.vertices.len();
        if base + other.vertices.len() > u16::MAX as usize + 1 {
            warn!(
                "Mesh::append: {} + {} vertices exceeds u16 index range, skipping",
                base,
                other.vertices.len()
            );
            return;
        }

        let normal_matrix = transform.inverse().transpose();
        self.vertices.extend(other.vertices.iter().map(|v| Vertex {
            position: transform.transform_point3(v.position),
            normal: normal_matrix.transform_vector3(v.normal).normalize_or_zero(),
            ..*v
        }));
        self.indices
            .extend(other.indices.iter().map(|&i| (base + i as usize) as u16));
    }

    /// Axis-aligned bounds (min, max), `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.min(v.position), max.max(v.position))
        }))
    }
}

impl MeshBuilder for Mesh {
    fn add_vertex(&mut self, position: Vec3, uv: (f32, f32), normal: Vec3) -> u16 {
        let index = self.vertices.len() as u16;
        self.vertices.push(Vertex {
            position,
            uv: Vec2::new(uv.0, uv.1),
            normal,
            color: Rgba8::WHITE,
        });
        index
    }

    fn add_triangle(&mut self, i0: u16, i1: u16, i2: u16) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }
}
