//! Skydome atmosphere
//!
//! Time-of-day sky gradient, two scrolling cloud layers and a lens flare whose
//! visibility is measured against the depth buffer by a deferred task. All
//! drawing goes through the command queue; nothing here touches the
//! rasterizer.

mod flare;
mod presets;

use std::cell::Cell;
use std::f32::consts::TAU;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use skyfly_core::config::AtmosphereConfig;
use skyfly_core::{
    AssetError, AssetLoader, Atmosphere, Blender, Combiner, CommandQueue, CommandSink,
    DeferredTask, ModeChange, ModelHandle, ViewState, skyfly_specs,
};
use skyfly_shared::Rgba8;
use tracing::warn;

pub use flare::{SAMPLE_RADIUS, flare_quads, sample_visibility};
pub use presets::{DAY_SECONDS, TimePreset, preset_at, wrap_time};

use crate::assets::SKYDOME_MODEL;

/// Sun elevation at noon, in degrees
const MAX_SUN_ELEVATION: f32 = 70.0;

/// Deferred task kind for flare occlusion
pub const OCCLUSION_TASK: &str = "lens_flare";

/// Two scrolling cloud layers
#[derive(Debug, Clone, PartialEq)]
pub struct Clouds {
    pub density: f32,
    pub opacity: f32,
    /// Scroll per millisecond of the far and near layer
    pub speed: [Vec2; 2],
    /// Current scroll of each layer, wrapped to 0..1
    pub offsets: [Vec2; 2],
}

impl Clouds {
    fn from_config(config: &AtmosphereConfig) -> Self {
        Self {
            density: config.cloud_density.clamp(0.0, 1.0),
            opacity: config.cloud_opacity.clamp(0.0, 1.0),
            speed: [
                Vec2::from_array(config.cloud_speed),
                Vec2::from_array(config.near_cloud_speed),
            ],
            offsets: [Vec2::ZERO; 2],
        }
    }

    fn advance(&mut self, elapsed_ms: f32) {
        for (offset, speed) in self.offsets.iter_mut().zip(self.speed) {
            *offset = (*offset + speed * elapsed_ms).rem_euclid(Vec2::ONE);
        }
    }

    fn is_visible(&self) -> bool {
        self.density > 0.0 && self.opacity > 0.0
    }
}

/// Reference [`Atmosphere`] for the skyfly device
#[derive(Debug)]
pub struct Skydome {
    dome: ModelHandle,
    time_of_day: f32,
    preset: TimePreset,
    sun_direction: Vec3,
    clouds: Clouds,
    resolution: (u32, u32),
    /// Written by the occlusion task, read when drawing the next flare
    visibility: Rc<Cell<f32>>,
}

impl Skydome {
    /// Load the dome model and apply the configured start time
    pub fn load<L: AssetLoader + ?Sized>(
        config: &AtmosphereConfig,
        loader: &mut L,
    ) -> Result<Self, AssetError> {
        let dome = loader.load_model(SKYDOME_MODEL)?;
        let mut skydome = Self {
            dome,
            time_of_day: 0.0,
            preset: TimePreset::NOON,
            sun_direction: Vec3::Y,
            clouds: Clouds::from_config(config),
            resolution: skyfly_specs().resolution,
            visibility: Rc::new(Cell::new(1.0)),
        };
        skydome.set_time_of_day(config.initial_time_of_day);
        Ok(skydome)
    }

    /// Screen size used to place flare quads
    pub fn set_viewport(&mut self, resolution: (u32, u32)) {
        self.resolution = resolution;
    }

    /// Current time of day in `[0, DAY_SECONDS)`
    pub fn time_of_day(&self) -> f32 {
        self.time_of_day
    }

    pub fn preset(&self) -> &TimePreset {
        &self.preset
    }

    pub fn clouds(&self) -> &Clouds {
        &self.clouds
    }

    /// Unit vector toward the sun
    pub fn sun_direction(&self) -> Vec3 {
        self.sun_direction
    }

    /// Flare visibility measured by the last occlusion task
    pub fn flare_visibility(&self) -> f32 {
        self.visibility.get()
    }

    /// Sun position in pixels, if it is above the horizon and on screen
    pub fn sun_on_screen(&self, view: &ViewState) -> Option<Vec2> {
        if self.sun_direction.y <= 0.0 {
            return None;
        }
        let world = view.eye + self.sun_direction * (view.projection.far * 0.5);
        let (screen, _) = view.to_screen(world, self.resolution)?;
        let (width, height) = (self.resolution.0 as f32, self.resolution.1 as f32);
        (screen.x >= 0.0 && screen.x < width && screen.y >= 0.0 && screen.y < height)
            .then_some(screen)
    }
}

/// Sun direction for a time of day: azimuth follows the day, elevation peaks
/// at noon and bottoms out at midnight
fn sun_direction_at(seconds: f32) -> Vec3 {
    let angle = seconds / DAY_SECONDS * TAU;
    let elevation = (angle.cos() * MAX_SUN_ELEVATION).to_radians();
    let (sin_el, cos_el) = elevation.sin_cos();
    let (sin_az, cos_az) = angle.sin_cos();
    Vec3::new(sin_az * cos_el, sin_el, cos_az * cos_el)
}

impl Atmosphere for Skydome {
    fn set_time_of_day(&mut self, seconds: f32) {
        if !seconds.is_finite() {
            warn!("set_time_of_day: {seconds} is not finite, keeping {}", self.time_of_day);
            return;
        }
        self.time_of_day = wrap_time(seconds);
        self.preset = preset_at(self.time_of_day);
        self.sun_direction = sun_direction_at(self.time_of_day);
    }

    fn advance_clouds(&mut self, elapsed_ms: f32) {
        if !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
            warn!("advance_clouds: elapsed must be >= 0.0, got {elapsed_ms}");
            return;
        }
        self.clouds.advance(elapsed_ms);
    }

    fn draw_sky(&self, queue: &mut CommandQueue) {
        queue.set_mode(ModeChange::Depth {
            compare: false,
            update: false,
        });
        queue.set_mode(ModeChange::Blender(Blender::Opaque));
        queue.set_mode(ModeChange::Combiner(Combiner::Gradient));
        queue.set_mode(ModeChange::EnvColor(self.preset.horizon));
        queue.set_mode(ModeChange::PrimColor(self.preset.zenith));
        queue.draw_model(self.dome);

        if self.clouds.is_visible() {
            let density = (self.clouds.density * 255.0).round() as u8;
            let opacity = (self.clouds.opacity * 255.0).round() as u8;
            queue.set_mode(ModeChange::Blender(Blender::Multiply));
            queue.set_mode(ModeChange::Combiner(Combiner::Clouds));
            queue.set_mode(ModeChange::EnvColor(Rgba8 {
                a: density,
                ..self.preset.horizon
            }));
            queue.set_mode(ModeChange::PrimColor(Rgba8 {
                a: opacity,
                ..self.preset.cloud
            }));
            for (tile, offset) in self.clouds.offsets.iter().enumerate() {
                queue.set_mode(ModeChange::TexOffset {
                    tile: tile as u8,
                    offset: offset.to_array(),
                });
            }
            queue.draw_model(self.dome);
        }

        queue.set_mode(ModeChange::Blender(Blender::Opaque));
    }

    fn draw_lens_flare(&self, view: &ViewState, queue: &mut CommandQueue) {
        let Some(sun) = self.sun_on_screen(view) else {
            return;
        };
        let strength = self.preset.sun_intensity * self.visibility.get();
        for quad in flare_quads(sun, self.resolution, self.preset.sun, strength) {
            queue.draw_quad(quad);
        }
    }

    fn occlusion_task(&self, view: &ViewState) -> Option<DeferredTask> {
        let sun = self.sun_on_screen(view)?;
        let pixel = (sun.x as i32, sun.y as i32);
        let visibility = Rc::clone(&self.visibility);
        Some(DeferredTask::new(OCCLUSION_TASK, move |depth| {
            let measured = sample_visibility(depth, pixel);
            tracing::trace!("sun at {pixel:?} visibility {measured:.2}");
            visibility.set(measured);
        }))
    }
}
