//! Skyfly Core - frame pipeline for an embedded 3D renderer
//!
//! This crate ties camera state, hierarchical transforms, one-time-compiled
//! static geometry and a cross-frame deferred post-effect into one ordered
//! command submission per frame.
//!
//! # Architecture
//!
//! - [`CameraController`] - free-fly camera driven by per-tick input
//! - [`DeviceMemory`] / [`TransformStack`] - float to fixed-point transform pipeline
//! - [`CommandQueue`] / [`Coprocessor`] - ordered command stream and its consumer
//! - [`StaticGeometry`] - lazily recorded, replayable [`CommandBlock`]
//! - [`DeferredTask`] - ordering barrier run after submission, before present
//! - [`FrameLoop`] - Update/Draw driver
//!
//! The atmosphere, asset loader, input device and rasterizer are collaborators
//! behind the traits in [`console`].

pub mod cache;
pub mod camera;
pub mod command;
pub mod config;
pub mod console;
pub mod coprocessor;
pub mod deferred;
pub mod error;
pub mod frame;
pub mod input;
#[cfg(test)]
mod integration;
pub mod math;
#[cfg(test)]
pub mod test_utils;
pub mod transform;

pub use cache::{MAX_BLOCK_COMMANDS, StaticGeometry};
pub use camera::{CameraController, CameraState, Projection, ViewState};
pub use command::{
    Antialias, Blender, BlockRecorder, Combiner, Command, CommandBlock, CommandQueue, CommandSink,
    Filter, ModeChange, ModelHandle, QueueEntry, ScreenQuad,
};
pub use config::Config;
pub use console::{
    AssetLoader, Atmosphere, DEPTH_FAR, DepthSampler, DisplaySpecs, FrameClock, FrameStats,
    Rasterizer, skyfly_specs,
};
pub use coprocessor::{Coprocessor, CoprocessorStats};
pub use deferred::DeferredTask;
pub use error::{AssetError, ConfigError, CoreError, DeviceError};
pub use frame::{FrameLoop, Scene};
pub use input::{Buttons, IdleInput, InputFrame, InputSource};
pub use math::Euler;
pub use transform::{DeviceMemory, FixedMat4, MatrixSlot, Srt, TransformStack};
