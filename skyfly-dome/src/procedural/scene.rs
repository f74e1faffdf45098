//! Built-in scene meshes
//!
//! The terrain, city and sky dome are generated here and painted with baked
//! vertex shading. Layout is driven by an integer hash so every run builds
//! the same geometry.

use glam::{Mat4, Vec3};
use skyfly_shared::Rgba8;

use super::primitives::{generate_box, generate_dome, generate_plane};
use super::types::Mesh;

/// Radius of the dome mesh before the sky transform scales it
pub const DOME_RADIUS: f32 = 2500.0;

const TERRAIN_SIZE: f32 = 2000.0;
const TERRAIN_SUBDIVISIONS: u32 = 40;
const CITY_GRID: i32 = 4;
const CITY_SPACING: f32 = 60.0;

const GROUND: Rgba8 = Rgba8::new(0x5A, 0x6B, 0x4A, 0xFF);
const CONCRETE: Rgba8 = Rgba8::new(0xB4, 0xB0, 0xA8, 0xFF);

/// Integer hash for deterministic layout
pub(crate) fn hash2(x: i32, z: i32) -> u32 {
    let mut h = (x as u32).wrapping_mul(0x27D4_EB2D) ^ (z as u32).wrapping_mul(0x1656_67B1);
    h ^= h >> 15;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^ (h >> 16)
}

/// Lambert term against the fixed bake light, with ambient floor
fn bake_light(normal: Vec3) -> f32 {
    let light = Vec3::new(0.4, 1.0, 0.3).normalize();
    0.45 + 0.55 * normal.dot(light).max(0.0)
}

/// Ground plane centred on the origin
pub fn generate_terrain() -> Mesh {
    let mut mesh: Mesh = generate_plane(TERRAIN_SIZE, TERRAIN_SIZE, TERRAIN_SUBDIVISIONS, TERRAIN_SUBDIVISIONS);
    mesh.paint(|position, normal| {
        let variation = (hash2(position.x as i32, position.z as i32) % 24) as f32 / 255.0;
        GROUND.scale_rgb(bake_light(normal) + variation)
    });
    mesh
}

/// Blocks of towers on a grid around the origin
pub fn generate_city() -> Mesh {
    let mut city = Mesh::new();

    for gx in -CITY_GRID..=CITY_GRID {
        for gz in -CITY_GRID..=CITY_GRID {
            let h = hash2(gx, gz);
            // Leave some lots empty
            if h % 5 == 0 {
                continue;
            }
            let height = 20.0 + (h % 100) as f32;
            let half = 12.0 + ((h >> 8) % 10) as f32;

            let mut tower: Mesh = generate_box(half, height, half);
            let tint = 0.8 + ((h >> 16) % 20) as f32 / 100.0;
            tower.paint(|_, normal| CONCRETE.scale_rgb(bake_light(normal) * tint));

            let placement = Mat4::from_translation(Vec3::new(gx as f32 * CITY_SPACING, 0.0, gz as f32 * CITY_SPACING));
            city.append(&tower, &placement);
        }
    }

    city
}

/// Inside-facing hemisphere. Vertex alpha carries elevation (0 at the
/// horizon, 255 at the zenith) for the gradient combiner.
pub fn generate_skydome() -> Mesh {
    let mut mesh: Mesh = generate_dome(DOME_RADIUS, 24, 8);
    mesh.paint(|position, _| {
        let elevation = (position.y / DOME_RADIUS).clamp(0.0, 1.0);
        Rgba8::new(0xFF, 0xFF, 0xFF, (elevation * 255.0).round() as u8)
    });
    mesh
}
