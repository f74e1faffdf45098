//! Colour combiner and blender
//!
//! Per-pixel evaluation of the fixed-function colour pipeline. The device has
//! no texture memory; the cloud combiner samples a procedural tiling noise in
//! place of a texture.

use glam::Vec2;
use skyfly_core::{Blender, Combiner};
use skyfly_shared::Rgba8;

use super::render_state::RenderState;
use crate::procedural::hash2;

/// Lattice cells per texture repeat
const NOISE_PERIOD: i32 = 8;

fn lattice(x: i32, y: i32) -> f32 {
    let h = hash2(x.rem_euclid(NOISE_PERIOD), y.rem_euclid(NOISE_PERIOD));
    (h & 0xFFFF) as f32 / 65535.0
}

/// Smooth value noise in 0..1, tiling every repeat of `uv`
pub fn value_noise(uv: Vec2) -> f32 {
    let p = uv * NOISE_PERIOD as f32;
    let cell = p.floor();
    let f = p - cell;
    let (x, y) = (cell.x as i32, cell.y as i32);
    let smooth = f * f * (Vec2::splat(3.0) - 2.0 * f);

    let top = lattice(x, y) + (lattice(x + 1, y) - lattice(x, y)) * smooth.x;
    let bottom = lattice(x, y + 1) + (lattice(x + 1, y + 1) - lattice(x, y + 1)) * smooth.x;
    top + (bottom - top) * smooth.y
}

/// Cloud cover (0..1) at `uv` for two scrolled layers.
///
/// `density` raises the share of sky covered.
pub fn cloud_coverage(uv: Vec2, offsets: &[[f32; 2]; 2], density: f32) -> f32 {
    let far = value_noise(uv * 2.0 + Vec2::from_array(offsets[0]));
    let near = value_noise(uv * 4.0 + Vec2::from_array(offsets[1]));
    let noise = far * 0.65 + near * 0.35;

    let threshold = 1.0 - density.clamp(0.0, 1.0) * 0.6;
    ((noise - threshold) / 0.25).clamp(0.0, 1.0)
}

/// Combiner output for one pixel
pub fn combine(state: &RenderState, shade: Rgba8, uv: Vec2) -> Rgba8 {
    let prim = state.prim_color;
    let env = state.env_color;
    match state.combiner {
        Combiner::Shade | Combiner::TexShade => shade,
        Combiner::Gradient => {
            let mut out = env.lerp(prim, shade.a as f32 / 255.0);
            out.a = 0xFF;
            out
        }
        Combiner::Clouds => {
            let cover = cloud_coverage(uv, &state.tex_offsets, env.a as f32 / 255.0);
            Rgba8::new(prim.r, prim.g, prim.b, (cover * prim.a as f32).round() as u8)
        }
        Combiner::Flare => {
            let mut out = prim.lerp(env, env.a as f32 / 255.0);
            out.a = prim.a;
            out
        }
    }
}

/// Blend a combiner output over the framebuffer colour
pub fn blend(blender: Blender, src: Rgba8, dst: Rgba8) -> Rgba8 {
    let out = match blender {
        Blender::Opaque => src,
        Blender::Multiply => dst.lerp(src, src.a as f32 / 255.0),
        Blender::Additive => {
            let add = src.scale_rgb(src.a as f32 / 255.0);
            Rgba8::new(
                dst.r.saturating_add(add.r),
                dst.g.saturating_add(add.g),
                dst.b.saturating_add(add.b),
                0xFF,
            )
        }
    };
    Rgba8 { a: 0xFF, ..out }
}
