//! Shared test utilities for integration and unit tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use hashbrown::HashMap;
use serde::Serialize;

use crate::camera::ViewState;
use crate::command::{CommandQueue, CommandSink, ModeChange, ModelHandle, ScreenQuad};
use crate::console::{AssetLoader, Atmosphere, DEPTH_FAR, DepthSampler, FrameClock, FrameStats, Rasterizer};
use crate::deferred::DeferredTask;
use crate::error::{AssetError, DeviceError};
use crate::input::{InputFrame, InputSource};
use crate::transform::FixedMat4;

pub const TERRAIN: ModelHandle = ModelHandle(1);
pub const CITY: ModelHandle = ModelHandle(2);
pub const SKY: ModelHandle = ModelHandle(100);

/// Depth test buffer size
const DEPTH_SIZE: (u32, u32) = (8, 8);

// ============================================================================
// Test Rasterizer
// ============================================================================

/// What the rasterizer saw, in order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TraceEvent {
    FrameStart,
    ClearDepth,
    SetMode(ModeChange),
    DrawModel(ModelHandle, FixedMat4),
    DrawQuad(ScreenQuad),
    DepthSample(u32, u32),
    Present,
}

/// Rasterizer that records every call.
///
/// Drawing a model listed in `occluders` (with depth update on) fills the
/// whole depth buffer with its depth.
#[derive(Debug)]
pub struct RecordingRasterizer {
    pub occluders: HashMap<ModelHandle, u16>,
    pub fail_attach: bool,
    /// Trace of the frame in progress
    pub current: RefCell<Vec<TraceEvent>>,
    /// Traces of presented frames
    pub frames: Vec<Vec<TraceEvent>>,
    depth: Vec<u16>,
    depth_update: bool,
    attached: bool,
    stats: FrameStats,
}

impl Default for RecordingRasterizer {
    fn default() -> Self {
        Self {
            occluders: HashMap::new(),
            fail_attach: false,
            current: RefCell::new(Vec::new()),
            frames: Vec::new(),
            depth: vec![DEPTH_FAR; (DEPTH_SIZE.0 * DEPTH_SIZE.1) as usize],
            depth_update: false,
            attached: false,
            stats: FrameStats::default(),
        }
    }
}

impl RecordingRasterizer {
    /// Rasterizer whose `attach` always fails
    pub fn failing_attach() -> Self {
        Self {
            fail_attach: true,
            ..Self::default()
        }
    }

    pub fn with_occluder(model: ModelHandle, depth: u16) -> Self {
        let mut rasterizer = Self::default();
        rasterizer.occluders.insert(model, depth);
        rasterizer
    }

    fn record(&self, event: TraceEvent) {
        self.current.borrow_mut().push(event);
    }
}

impl DepthSampler for RecordingRasterizer {
    fn resolution(&self) -> (u32, u32) {
        DEPTH_SIZE
    }

    fn sample_depth(&self, x: u32, y: u32) -> Option<u16> {
        self.record(TraceEvent::DepthSample(x, y));
        if x >= DEPTH_SIZE.0 || y >= DEPTH_SIZE.1 {
            return None;
        }
        self.depth.get((y * DEPTH_SIZE.0 + x) as usize).copied()
    }
}

impl Rasterizer for RecordingRasterizer {
    fn attach(&mut self) -> Result<(), DeviceError> {
        if self.fail_attach {
            return Err(DeviceError::NotAttached);
        }
        if self.attached {
            return Err(DeviceError::AlreadyAttached);
        }
        self.attached = true;
        Ok(())
    }

    fn frame_start(&mut self) {
        self.record(TraceEvent::FrameStart);
    }

    fn set_view(&mut self, _view: &ViewState) {}

    fn clear_depth(&mut self) {
        self.depth.fill(DEPTH_FAR);
        self.record(TraceEvent::ClearDepth);
    }

    fn set_mode(&mut self, change: &ModeChange) {
        match change {
            ModeChange::Standard => self.depth_update = false,
            ModeChange::Depth { update, .. } => self.depth_update = *update,
            _ => {}
        }
        self.record(TraceEvent::SetMode(*change));
    }

    fn draw_model(&mut self, model: ModelHandle, transform: &FixedMat4) -> Result<(), DeviceError> {
        if !self.attached {
            return Err(DeviceError::NotAttached);
        }
        if self.depth_update {
            if let Some(depth) = self.occluders.get(&model) {
                self.depth.fill(*depth);
            }
        }
        self.stats.model_draws += 1;
        self.record(TraceEvent::DrawModel(model, *transform));
        Ok(())
    }

    fn draw_quad(&mut self, quad: &ScreenQuad) {
        self.stats.quad_draws += 1;
        self.record(TraceEvent::DrawQuad(*quad));
    }

    fn depth(&self) -> &dyn DepthSampler {
        self
    }

    fn present(&mut self) -> Result<(), DeviceError> {
        if !self.attached {
            return Err(DeviceError::NotAttached);
        }
        self.attached = false;
        self.record(TraceEvent::Present);
        self.frames.push(self.current.take());
        self.stats.frames += 1;
        Ok(())
    }

    fn stats(&self) -> FrameStats {
        self.stats
    }
}

// ============================================================================
// Test Atmosphere
// ============================================================================

/// Atmosphere that draws the sky model and one flare quad, and samples the
/// centre of the depth buffer after each frame
#[derive(Debug, Default)]
pub struct TestAtmosphere {
    pub time_of_day: f32,
    pub cloud_ms: f32,
    /// Depth seen by each occlusion task, in run order
    pub samples: Rc<RefCell<Vec<Option<u16>>>>,
}

impl Atmosphere for TestAtmosphere {
    fn set_time_of_day(&mut self, seconds: f32) {
        self.time_of_day = seconds;
    }

    fn advance_clouds(&mut self, elapsed_ms: f32) {
        self.cloud_ms += elapsed_ms;
    }

    fn draw_sky(&self, queue: &mut CommandQueue) {
        queue.draw_model(SKY);
    }

    fn draw_lens_flare(&self, _view: &ViewState, queue: &mut CommandQueue) {
        queue.draw_quad(ScreenQuad {
            min: [0.0, 0.0],
            max: [2.0, 2.0],
            color: skyfly_shared::Rgba8::WHITE,
            depth: 0.0,
        });
    }

    fn occlusion_task(&self, _view: &ViewState) -> Option<DeferredTask> {
        let samples = self.samples.clone();
        Some(DeferredTask::new("lens_flare", move |depth| {
            let (width, height) = depth.resolution();
            samples.borrow_mut().push(depth.sample_depth(width / 2, height / 2));
        }))
    }
}

// ============================================================================
// Test Input / Clock / Assets
// ============================================================================

/// Plays back queued frames, idle afterwards
#[derive(Debug, Default)]
pub struct ScriptedInput {
    pub frames: VecDeque<InputFrame>,
    pub polls: u64,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = InputFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            polls: 0,
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputFrame {
        self.polls += 1;
        self.frames.pop_front().unwrap_or_default()
    }
}

/// Clock advancing a fixed step per frame
#[derive(Debug)]
pub struct FixedStepClock {
    step: f32,
    elapsed_ms: f64,
}

impl FixedStepClock {
    pub fn new(step: f32) -> Self {
        Self { step, elapsed_ms: 0.0 }
    }

    /// Clock that has already run for `start_ms`
    pub fn starting_at(start_ms: u64, step: f32) -> Self {
        Self {
            step,
            elapsed_ms: start_ms as f64,
        }
    }
}

impl FrameClock for FixedStepClock {
    fn delta_seconds(&mut self) -> f32 {
        self.elapsed_ms += self.step as f64 * 1000.0;
        self.step
    }

    fn now_ms(&self) -> u64 {
        self.elapsed_ms as u64
    }
}

/// Loader knowing the stock scene names
#[derive(Debug, Default)]
pub struct TestAssets {
    pub loaded: Vec<String>,
}

impl AssetLoader for TestAssets {
    fn load_model(&mut self, name: &str) -> Result<ModelHandle, AssetError> {
        let handle = match name {
            "rom:/city_terrain.t3dm" => TERRAIN,
            "rom:/city.t3dm" => CITY,
            "rom:/skydome.t3dm" => SKY,
            _ => return Err(AssetError::NotFound(name.to_string())),
        };
        self.loaded.push(name.to_string());
        Ok(handle)
    }
}
