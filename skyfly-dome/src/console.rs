//! Skyfly Dome device
//!
//! Bundles the reference implementations of every device trait: the software
//! rasterizer, the skydome atmosphere and the built-in model library.

use skyfly_core::config::Config;
use skyfly_core::{AssetError, CoreError, FrameClock, FrameLoop, InputSource};

use crate::assets::ModelLibrary;
use crate::graphics::SoftRasterizer;
use crate::skydome::Skydome;

/// Get Skyfly display specifications
pub use skyfly_core::skyfly_specs;

/// Frame loop running on the reference device
pub type DomeLoop<I, C> = FrameLoop<SoftRasterizer, Skydome, I, C>;

/// Reference device ready to be handed to a [`FrameLoop`]
#[derive(Debug)]
pub struct SkyflyDome {
    pub rasterizer: SoftRasterizer,
    pub skydome: Skydome,
    pub library: ModelLibrary,
}

impl SkyflyDome {
    /// Build the device with the built-in models.
    ///
    /// The sky dome model is loaded here; the scene models are loaded when
    /// the frame loop is built.
    pub fn new(config: &Config) -> Result<Self, AssetError> {
        Self::with_library(config, ModelLibrary::builtin())
    }

    pub fn with_library(config: &Config, mut library: ModelLibrary) -> Result<Self, AssetError> {
        let specs = skyfly_specs();
        let mut skydome = Skydome::load(&config.atmosphere, &mut library)?;
        skydome.set_viewport(specs.resolution);
        let rasterizer = SoftRasterizer::new(specs, library.table());

        tracing::debug!(
            "{} device: {}x{}, {} frame buffers, {} models",
            specs.name,
            specs.resolution.0,
            specs.resolution.1,
            specs.buffer_count,
            library.table().len()
        );

        Ok(Self {
            rasterizer,
            skydome,
            library,
        })
    }

    /// Build the frame loop driving this device
    pub fn into_frame_loop<I, C>(self, config: &Config, input: I, clock: C) -> Result<DomeLoop<I, C>, CoreError>
    where
        I: InputSource,
        C: FrameClock,
    {
        let SkyflyDome {
            rasterizer,
            skydome,
            mut library,
        } = self;
        FrameLoop::new(config, rasterizer, skydome, input, clock, &mut library)
    }
}
