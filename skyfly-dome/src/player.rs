//! Headless player for Skyfly Dome
//!
//! Runs the frame loop on the reference device for a number of frames and
//! reports what the pipeline did. Used by the `skyfly-dome` binary and the
//! end-to-end tests.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glam::Vec3;
use skyfly_core::{DepthSampler, FrameClock, IdleInput, InputSource, Rasterizer};
use skyfly_shared::Rgba8;

use crate::clock::{FixedClock, SystemClock};
use crate::console::{DomeLoop, SkyflyDome};
use crate::script::ScriptedInput;

/// Player configuration passed from CLI
#[derive(Debug, Clone, Default)]
pub struct PlayerConfig {
    /// Frames to run; `None` runs until interrupted
    pub frames: Option<u64>,
    /// TOML configuration file
    pub config_path: Option<PathBuf>,
    /// TOML input script; idle input when absent
    pub script_path: Option<PathBuf>,
    /// Fixed frame step in seconds instead of wall time
    pub fixed_dt: Option<f32>,
    /// PNG written from the last presented frame
    pub screenshot: Option<PathBuf>,
}

/// What one run did
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub model_draws: u64,
    pub quad_draws: u64,
    pub triangles: u64,
    pub block_builds: u32,
    pub block_replays: u64,
    pub deferred_run: u64,
    pub buffer_waits: u64,
    pub unbalanced_frames: u64,
    pub camera_position: Vec3,
    pub time_of_day: f32,
}

type PlayerLoop = DomeLoop<Box<dyn InputSource>, Box<dyn FrameClock>>;

/// Build and run the player
pub fn run(config: &PlayerConfig) -> Result<RunSummary> {
    let settings = skyfly_core::config::load(config.config_path.as_deref()).context("Failed to load configuration")?;

    let input: Box<dyn InputSource> = match &config.script_path {
        Some(path) => Box::new(
            ScriptedInput::load(path)
                .with_context(|| format!("Failed to load input script {}", path.display()))?,
        ),
        None => Box::new(IdleInput),
    };
    let clock: Box<dyn FrameClock> = match config.fixed_dt {
        Some(step) => Box::new(FixedClock::new(step)),
        None => Box::new(SystemClock::new()),
    };

    let device = SkyflyDome::new(&settings).context("Failed to initialize device")?;
    let mut frame_loop: PlayerLoop = device
        .into_frame_loop(&settings, input, clock)
        .context("Failed to load scene")?;

    tracing::info!(
        "Running {} frames",
        config.frames.map_or("unlimited".to_string(), |n| n.to_string())
    );
    frame_loop.run(config.frames).context("Frame loop failed")?;

    if let Some(path) = &config.screenshot {
        save_screenshot(&frame_loop, path)?;
    }

    let summary = summarize(&frame_loop);
    tracing::info!(
        "{} frames, {} model draws, {} quads, {} triangles, {} block replays, {} deferred tasks, {} buffer waits",
        summary.frames,
        summary.model_draws,
        summary.quad_draws,
        summary.triangles,
        summary.block_replays,
        summary.deferred_run,
        summary.buffer_waits
    );
    if summary.unbalanced_frames > 0 {
        tracing::warn!("{} frames ended with an unbalanced transform stack", summary.unbalanced_frames);
    }
    Ok(summary)
}

fn summarize<I: InputSource, C: FrameClock>(frame_loop: &DomeLoop<I, C>) -> RunSummary {
    let raster = frame_loop.rasterizer().stats();
    let coprocessor = frame_loop.coprocessor().stats();
    RunSummary {
        frames: frame_loop.frame_count(),
        model_draws: raster.model_draws,
        quad_draws: raster.quad_draws,
        triangles: raster.triangles,
        block_builds: frame_loop.scene().geometry().build_count(),
        block_replays: coprocessor.block_replays,
        deferred_run: coprocessor.deferred_run,
        buffer_waits: raster.buffer_waits,
        unbalanced_frames: coprocessor.unbalanced_frames,
        camera_position: frame_loop.camera().position(),
        time_of_day: frame_loop.atmosphere().time_of_day(),
    }
}

/// Write the last presented frame as PNG
fn save_screenshot<I: InputSource, C: FrameClock>(frame_loop: &DomeLoop<I, C>, path: &Path) -> Result<()> {
    let raster = frame_loop.rasterizer();
    let pixels: Vec<Rgba8> = raster
        .front_rgba()
        .context("No frame presented, nothing to screenshot")?;
    let (width, height) = raster.resolution();

    image::save_buffer(
        path,
        bytemuck::cast_slice(&pixels),
        width,
        height,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("Failed to save screenshot {}", path.display()))?;

    tracing::info!("Screenshot saved: {}", path.display());
    Ok(())
}
