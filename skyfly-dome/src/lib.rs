//! Skyfly Dome - Library interface
//!
//! This module exports the reference device for the skyfly frame pipeline:
//! a software rasterizer, the skydome atmosphere, the built-in model
//! library, scripted input and the headless player.

pub mod assets;
pub mod clock;
pub mod console;
pub mod graphics;
pub mod player;
pub mod procedural;
pub mod script;
pub mod skydome;
