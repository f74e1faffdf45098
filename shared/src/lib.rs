//! Shared types for the Skyfly frame pipeline.
//!
//! Holds the fixed display specification of the target device and the small
//! POD types (colours) that both the pipeline core and the reference device
//! need without depending on each other.

pub mod color;
pub mod console;

pub use color::Rgba8;
pub use console::{
    ColorDepth, DisplayFilter, DisplaySpecs, Gamma, SKYFLY_BUFFER_COUNT, SKYFLY_RESOLUTION,
    skyfly_specs,
};
