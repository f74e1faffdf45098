//! Device collaborator traits
//!
//! The frame pipeline drives a device through these traits. A concrete device
//! (such as the `skyfly-dome` reference device) implements each of them; the
//! pipeline itself never depends on how pixels, assets, or time are produced.

use crate::camera::ViewState;
use crate::command::{CommandQueue, ModeChange, ModelHandle, ScreenQuad};
use crate::deferred::DeferredTask;
use crate::error::{AssetError, DeviceError};
use crate::transform::FixedMat4;

// Re-export display specs from the shared crate for convenience
pub use skyfly_shared::{DisplaySpecs, skyfly_specs};

/// Depth value of a freshly cleared depth buffer
pub const DEPTH_FAR: u16 = u16::MAX;

/// Read access to the depth buffer of the frame being rendered
pub trait DepthSampler {
    /// Buffer size in pixels (width, height)
    fn resolution(&self) -> (u32, u32);

    /// Raw depth at a pixel, `None` outside the buffer.
    ///
    /// 0 is the near plane, [`DEPTH_FAR`] the cleared value.
    fn sample_depth(&self, x: u32, y: u32) -> Option<u16>;

    /// Depth at a pixel mapped to 0..1
    fn sample_depth_normalized(&self, x: u32, y: u32) -> Option<f32> {
        self.sample_depth(x, y).map(|d| d as f32 / DEPTH_FAR as f32)
    }
}

/// Counters reported by a rasterizer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames presented
    pub frames: u64,
    /// Model draws executed
    pub model_draws: u64,
    /// Screen quads drawn
    pub quad_draws: u64,
    /// Triangles submitted after near-plane rejection
    pub triangles: u64,
    /// Times `attach` had to wait for a frame buffer to be released
    pub buffer_waits: u64,
}

/// Fixed-function rasterizer.
///
/// Frame lifecycle: `attach` → `frame_start` → state and draw calls →
/// `present`. Draw calls are issued by the coprocessor in command order.
pub trait Rasterizer {
    /// Acquire a frame buffer and its depth buffer.
    ///
    /// Blocks until one of the swap buffers is free.
    fn attach(&mut self) -> Result<(), DeviceError>;

    /// Begin recording the frame
    fn frame_start(&mut self);

    /// Camera placement for subsequent model draws
    fn set_view(&mut self, view: &ViewState);

    fn clear_depth(&mut self);

    fn set_mode(&mut self, change: &ModeChange);

    /// Draw a loaded model under `transform`
    fn draw_model(&mut self, model: ModelHandle, transform: &FixedMat4) -> Result<(), DeviceError>;

    fn draw_quad(&mut self, quad: &ScreenQuad);

    /// Depth buffer of the attached frame
    fn depth(&self) -> &dyn DepthSampler;

    /// Hand the attached buffer to the display
    fn present(&mut self) -> Result<(), DeviceError>;

    fn stats(&self) -> FrameStats;
}

/// Sky, clouds, and lens flare
///
/// Drawing methods only issue commands; the atmosphere never touches the
/// rasterizer directly.
pub trait Atmosphere {
    /// Seconds of day, 0 = noon
    fn set_time_of_day(&mut self, seconds: f32);

    /// Scroll clouds by elapsed milliseconds
    fn advance_clouds(&mut self, elapsed_ms: f32);

    /// Dome and clouds, drawn under the camera-following transform
    fn draw_sky(&self, queue: &mut CommandQueue);

    /// Flare quads, drawn last with the current blend state
    fn draw_lens_flare(&self, view: &ViewState, queue: &mut CommandQueue);

    /// Post-rasterization task updating flare occlusion, if any
    fn occlusion_task(&self, view: &ViewState) -> Option<DeferredTask>;
}

/// Resolves resource names to models
pub trait AssetLoader {
    fn load_model(&mut self, name: &str) -> Result<ModelHandle, AssetError>;
}

/// Source of frame timing
pub trait FrameClock {
    /// Seconds elapsed for the frame about to be simulated
    fn delta_seconds(&mut self) -> f32;

    /// Milliseconds since startup
    fn now_ms(&self) -> u64;
}

impl<T: FrameClock + ?Sized> FrameClock for Box<T> {
    fn delta_seconds(&mut self) -> f32 {
        (**self).delta_seconds()
    }

    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
