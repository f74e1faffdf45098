//! Display specifications for the Skyfly target device.
//!
//! Startup configuration of the display is a fixed constant set. Nothing in
//! the workspace changes these at runtime; they are the equivalent of the
//! values passed once to the video-mode initializer on the real hardware.

/// Colour or depth buffer bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    /// 16 bits per pixel (RGBA5551 colour, u16 depth)
    Bpp16,
    /// 32 bits per pixel (RGBA8888 colour)
    Bpp32,
}

impl ColorDepth {
    /// Bytes per pixel for this depth
    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            ColorDepth::Bpp16 => 2,
            ColorDepth::Bpp32 => 4,
        }
    }
}

/// Gamma correction applied by the video interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gamma {
    None,
    Correct,
}

/// Video interface output filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayFilter {
    Disabled,
    Resample,
    ResampleAntialias,
    ResampleAntialiasDedither,
}

/// Specifications for the display of the target device.
#[derive(Debug, Clone)]
pub struct DisplaySpecs {
    /// Device name
    pub name: &'static str,
    /// Framebuffer resolution (width, height)
    pub resolution: (u32, u32),
    /// Whether the video output is interlaced
    pub interlaced: bool,
    /// Display aspect ratio (not necessarily width / height)
    pub aspect_ratio: f32,
    /// Colour buffer depth
    pub color_depth: ColorDepth,
    /// Number of frame buffers in the swap pool
    pub buffer_count: usize,
    /// Gamma mode
    pub gamma: Gamma,
    /// Output filter
    pub filter: DisplayFilter,
}

/// Framebuffer resolution (480x320 interlaced)
pub const SKYFLY_RESOLUTION: (u32, u32) = (480, 320);

/// Frame buffers in the swap pool. Acquiring a fourth target waits for the
/// oldest presented buffer, which is what paces the frame loop.
pub const SKYFLY_BUFFER_COUNT: usize = 3;

/// Get the Skyfly display specifications.
pub const fn skyfly_specs() -> &'static DisplaySpecs {
    &DisplaySpecs {
        name: "Skyfly",
        resolution: SKYFLY_RESOLUTION,
        interlaced: true,
        aspect_ratio: 16.0 / 9.0,
        color_depth: ColorDepth::Bpp16,
        buffer_count: SKYFLY_BUFFER_COUNT,
        gamma: Gamma::None,
        filter: DisplayFilter::ResampleAntialiasDedither,
    }
}
