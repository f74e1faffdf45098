//! Parametric primitives with UV coordinates (plane, box, dome)

use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, PI};
use tracing::warn;

use super::types::MeshBuilder;

fn positive_or_clamp(name: &str, value: f32) -> f32 {
    if value <= 0.0 {
        warn!("{name} must be > 0.0, clamping to 0.001");
        0.001
    } else {
        value
    }
}

/// Generate a plane mesh with UVs on the XZ plane (Y=0)
///
/// # Arguments
/// * `size_x` - Width along X axis
/// * `size_z` - Depth along Z axis
/// * `subdivisions_x` - Number of X subdivisions (min 1, max 180)
/// * `subdivisions_z` - Number of Z subdivisions (min 1, max 180)
///
/// # Returns
/// Mesh with `(subdivisions_x + 1) × (subdivisions_z + 1)` vertices
pub fn generate_plane<M: MeshBuilder>(size_x: f32, size_z: f32, subdivisions_x: u32, subdivisions_z: u32) -> M {
    let size_x = positive_or_clamp("generate_plane: size_x", size_x);
    let size_z = positive_or_clamp("generate_plane: size_z", size_z);

    // 181 × 181 vertices still fit u16 indices
    let subdivisions_x = subdivisions_x.clamp(1, 180);
    let subdivisions_z = subdivisions_z.clamp(1, 180);

    let mut mesh = M::default();

    for z in 0..=subdivisions_z {
        for x in 0..=subdivisions_x {
            let u = x as f32 / subdivisions_x as f32;
            let v = z as f32 / subdivisions_z as f32;

            let position = Vec3::new(-size_x * 0.5 + u * size_x, 0.0, -size_z * 0.5 + v * size_z);
            mesh.add_vertex(position, (u, v), Vec3::Y);
        }
    }

    for z in 0..subdivisions_z {
        for x in 0..subdivisions_x {
            let i0 = (z * (subdivisions_x + 1) + x) as u16;
            let i1 = i0 + 1;
            let i2 = ((z + 1) * (subdivisions_x + 1) + x) as u16;
            let i3 = i2 + 1;

            // CCW winding for +Y normal
            mesh.add_triangle(i0, i2, i1);
            mesh.add_triangle(i1, i2, i3);
        }
    }

    mesh
}

/// Generate an axis-aligned box standing on Y=0
///
/// # Arguments
/// * `half_x` - Half-extent along X axis
/// * `height` - Height along +Y
/// * `half_z` - Half-extent along Z axis
///
/// # Returns
/// Mesh with 20 vertices (4 per face, no bottom face)
pub fn generate_box<M: MeshBuilder>(half_x: f32, height: f32, half_z: f32) -> M {
    let x = positive_or_clamp("generate_box: half_x", half_x);
    let h = positive_or_clamp("generate_box: height", height);
    let z = positive_or_clamp("generate_box: half_z", half_z);

    let mut mesh = M::default();

    let add_quad = |mesh: &mut M, corners: [Vec3; 4], normal: Vec3| {
        let i0 = mesh.add_vertex(corners[0], (0.0, 0.0), normal);
        let i1 = mesh.add_vertex(corners[1], (1.0, 0.0), normal);
        let i2 = mesh.add_vertex(corners[2], (1.0, 1.0), normal);
        let i3 = mesh.add_vertex(corners[3], (0.0, 1.0), normal);

        mesh.add_triangle(i0, i1, i2);
        mesh.add_triangle(i0, i2, i3);
    };

    // Front (+Z)
    add_quad(
        &mut mesh,
        [Vec3::new(-x, 0.0, z), Vec3::new(x, 0.0, z), Vec3::new(x, h, z), Vec3::new(-x, h, z)],
        Vec3::Z,
    );
    // Back (-Z)
    add_quad(
        &mut mesh,
        [Vec3::new(x, 0.0, -z), Vec3::new(-x, 0.0, -z), Vec3::new(-x, h, -z), Vec3::new(x, h, -z)],
        Vec3::NEG_Z,
    );
    // Right (+X)
    add_quad(
        &mut mesh,
        [Vec3::new(x, 0.0, z), Vec3::new(x, 0.0, -z), Vec3::new(x, h, -z), Vec3::new(x, h, z)],
        Vec3::X,
    );
    // Left (-X)
    add_quad(
        &mut mesh,
        [Vec3::new(-x, 0.0, -z), Vec3::new(-x, 0.0, z), Vec3::new(-x, h, z), Vec3::new(-x, h, -z)],
        Vec3::NEG_X,
    );
    // Top (+Y)
    add_quad(
        &mut mesh,
        [Vec3::new(-x, h, z), Vec3::new(x, h, z), Vec3::new(x, h, -z), Vec3::new(-x, h, -z)],
        Vec3::Y,
    );

    mesh
}

/// Generate a hemisphere seen from inside, centred on the origin
///
/// # Arguments
/// * `radius` - Dome radius
/// * `segments` - Number of longitudinal divisions (min 3, max 128)
/// * `rings` - Number of latitudinal divisions from horizon to zenith (min 1, max 64)
///
/// # Returns
/// Mesh with `(rings + 1) × (segments + 1)` vertices. Normals point inward.
///
/// # UV Mapping
/// UVs are a top-down planar projection (`x / radius`, `z / radius` remapped
/// to 0..1), so a scrolled texture reads as a flat cloud deck.
pub fn generate_dome<M: MeshBuilder>(radius: f32, segments: u32, rings: u32) -> M {
    let radius = positive_or_clamp("generate_dome: radius", radius);
    let segments = segments.clamp(3, 128);
    let rings = rings.clamp(1, 64);

    let mut mesh = M::default();

    for ring in 0..=rings {
        // 0 at the horizon, PI/2 at the zenith
        let elevation = (ring as f32 / rings as f32) * FRAC_PI_2;
        let y = radius * elevation.sin();
        let ring_radius = radius * elevation.cos();

        for seg in 0..=segments {
            let theta = (seg as f32 / segments as f32) * 2.0 * PI;
            let position = Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin());
            let uv = (position.x / radius * 0.5 + 0.5, position.z / radius * 0.5 + 0.5);
            mesh.add_vertex(position, uv, -position.normalize());
        }
    }

    let verts_per_ring = segments + 1;
    for ring in 0..rings {
        for seg in 0..segments {
            let i0 = (ring * verts_per_ring + seg) as u16;
            let i1 = (ring * verts_per_ring + seg + 1) as u16;
            let i2 = ((ring + 1) * verts_per_ring + seg) as u16;
            let i3 = ((ring + 1) * verts_per_ring + seg + 1) as u16;

            mesh.add_triangle(i0, i3, i1);
            mesh.add_triangle(i0, i2, i3);
        }
    }

    mesh
}
