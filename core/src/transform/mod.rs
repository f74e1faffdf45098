//! Transform pipeline
//!
//! Bridges authoring-time transforms (scale, euler rotation, translation in
//! floats) to the fixed-point matrices the coprocessor consumes.
//!
//! - [`Srt`] builds a float [`glam::Mat4`]
//! - [`FixedMat4`] is the s15.16 encoding the coprocessor reads
//! - [`DeviceMemory`] holds fixed matrices in device-visible memory; the host
//!   can only write float matrices into it (converted on write), never read
//! - [`TransformStack`] composes pushed matrices during command execution

mod fixed;
mod memory;
mod srt;
mod stack;

pub use fixed::FixedMat4;
pub use memory::{DeviceMemory, MatrixSlot};
pub use srt::Srt;
pub use stack::TransformStack;
