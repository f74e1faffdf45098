//! Render state management
//!
//! Sticky mode state of the rasterizer, updated by [`ModeChange`]s in command
//! order. Antialias and filter modes are tracked but do not change the
//! software output.

use skyfly_core::{Antialias, Blender, Combiner, Filter, ModeChange};
use skyfly_shared::Rgba8;

/// Number of texture tiles with a scroll offset
pub const TILE_COUNT: usize = 2;

/// Current render modes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub combiner: Combiner,
    pub blender: Blender,
    pub antialias: Antialias,
    pub filter: Filter,
    pub depth_compare: bool,
    pub depth_update: bool,
    pub env_color: Rgba8,
    pub prim_color: Rgba8,
    pub tex_offsets: [[f32; 2]; TILE_COUNT],
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            combiner: Combiner::default(),
            blender: Blender::default(),
            antialias: Antialias::default(),
            filter: Filter::default(),
            depth_compare: false,
            depth_update: false,
            env_color: Rgba8::WHITE,
            prim_color: Rgba8::WHITE,
            tex_offsets: [[0.0; 2]; TILE_COUNT],
        }
    }
}

impl RenderState {
    pub fn apply(&mut self, change: &ModeChange) {
        match *change {
            // Colour registers and tile offsets survive a mode reset
            ModeChange::Standard => {
                *self = RenderState {
                    env_color: self.env_color,
                    prim_color: self.prim_color,
                    tex_offsets: self.tex_offsets,
                    ..RenderState::default()
                }
            }
            ModeChange::Combiner(combiner) => self.combiner = combiner,
            ModeChange::Depth { compare, update } => {
                self.depth_compare = compare;
                self.depth_update = update;
            }
            ModeChange::Antialias(antialias) => self.antialias = antialias,
            ModeChange::Filter(filter) => self.filter = filter,
            ModeChange::EnvColor(color) => self.env_color = color,
            ModeChange::PrimColor(color) => self.prim_color = color,
            ModeChange::Blender(blender) => self.blender = blender,
            ModeChange::TexOffset { tile, offset } => match self.tex_offsets.get_mut(tile as usize) {
                Some(slot) => *slot = offset,
                None => tracing::warn!("TexOffset: tile {tile} out of range (max {})", TILE_COUNT - 1),
            },
        }
    }
}
