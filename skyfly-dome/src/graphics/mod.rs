//! Skyfly Dome graphics backend (software)
//!
//! Implements the `Rasterizer` trait from skyfly-core with a CPU rasterizer
//! modelled on the target's fixed-function pipeline.
//!
//! # Architecture
//!
//! **Coprocessor** (command execution) → **SoftRasterizer** (pixels)
//!
//! - The coprocessor replays queued commands and cached blocks in order
//! - Mode changes update the sticky [`RenderState`]
//! - Draws are combined and blended per pixel into a [`FramePool`] buffer

mod frame;
mod raster;
mod render_state;
mod shading;

pub use frame::FramePool;
pub use raster::SoftRasterizer;
pub use render_state::{RenderState, TILE_COUNT};
pub use shading::{blend, cloud_coverage, combine, value_noise};
