//! Frame loop
//!
//! One tick is an Update phase (input, atmosphere, camera, transforms)
//! followed by a Draw phase that issues the frame's command stream and hands
//! it to the coprocessor at present.

use glam::Vec3;
use skyfly_shared::Rgba8;

use crate::cache::StaticGeometry;
use crate::camera::CameraController;
use crate::command::{Antialias, Blender, Combiner, CommandQueue, CommandSink, Filter, ModeChange};
use crate::config::{Config, SceneConfig};
use crate::console::{AssetLoader, Atmosphere, FrameClock, Rasterizer, skyfly_specs};
use crate::coprocessor::Coprocessor;
use crate::error::CoreError;
use crate::input::InputSource;
use crate::transform::{DeviceMemory, MatrixSlot, Srt};

/// Length of the day cycle in seconds of day
const DAY_SECONDS: f64 = 86_400.0;

/// Environment colour used by the flare combiner
const FLARE_ENV_COLOR: Rgba8 = Rgba8::new(0xFF, 0xFF, 0xFF, 0x80);

/// Loaded models and the matrices they are drawn with
#[derive(Debug)]
pub struct Scene {
    memory: DeviceMemory,
    sky_slot: MatrixSlot,
    sky_scale: f32,
    static_slot: MatrixSlot,
    static_srt: Srt,
    geometry: StaticGeometry,
}

impl Scene {
    /// Load the scene models and allocate their transforms.
    ///
    /// Fails if either model cannot be loaded.
    pub fn load<L: AssetLoader + ?Sized>(
        config: &SceneConfig,
        loader: &mut L,
        camera_position: Vec3,
    ) -> Result<Self, CoreError> {
        let terrain = loader.load_model(&config.terrain)?;
        let model = loader.load_model(&config.model)?;

        let mut memory = DeviceMemory::new();
        let sky_slot = memory.alloc_srt(&Srt::uniform(config.sky_scale, camera_position));
        let static_srt = Srt::uniform(config.static_scale, Vec3::ZERO);
        let static_slot = memory.alloc_srt(&static_srt);

        tracing::debug!("scene loaded: terrain '{}', model '{}'", config.terrain, config.model);

        Ok(Self {
            memory,
            sky_slot,
            sky_scale: config.sky_scale,
            static_slot,
            static_srt,
            geometry: StaticGeometry::new(terrain, model, static_slot),
        })
    }

    /// Rewrite both matrix slots for this frame
    pub fn update_transforms(&mut self, camera_position: Vec3) {
        self.memory
            .write_srt(self.sky_slot, &Srt::uniform(self.sky_scale, camera_position));
        self.memory.write_srt(self.static_slot, &self.static_srt);
    }

    pub fn memory(&self) -> &DeviceMemory {
        &self.memory
    }

    /// Camera-following sky transform
    pub fn sky_slot(&self) -> MatrixSlot {
        self.sky_slot
    }

    pub fn static_slot(&self) -> MatrixSlot {
        self.static_slot
    }

    pub fn geometry(&self) -> &StaticGeometry {
        &self.geometry
    }
}

/// Drives one device through Update and Draw every tick
pub struct FrameLoop<R, A, I, C> {
    rasterizer: R,
    atmosphere: A,
    input: I,
    clock: C,
    camera: CameraController,
    scene: Scene,
    queue: CommandQueue,
    coprocessor: Coprocessor,
    /// Seconds of day per clock millisecond
    time_scale: f32,
    frame: u64,
}

impl<R, A, I, C> FrameLoop<R, A, I, C>
where
    R: Rasterizer,
    A: Atmosphere,
    I: InputSource,
    C: FrameClock,
{
    /// Build the loop, loading the scene models through `loader`.
    pub fn new<L: AssetLoader + ?Sized>(
        config: &Config,
        rasterizer: R,
        atmosphere: A,
        input: I,
        clock: C,
        loader: &mut L,
    ) -> Result<Self, CoreError> {
        let camera = CameraController::from_config(&config.camera, skyfly_specs().aspect_ratio);
        let scene = Scene::load(&config.scene, loader, camera.position())?;

        Ok(Self {
            rasterizer,
            atmosphere,
            input,
            clock,
            camera,
            scene,
            queue: CommandQueue::new(),
            coprocessor: Coprocessor::new(),
            time_scale: config.atmosphere.time_scale,
            frame: 0,
        })
    }

    /// Run one Update + Draw
    pub fn tick(&mut self) -> Result<(), CoreError> {
        self.update();
        self.draw()?;
        self.frame += 1;
        Ok(())
    }

    /// Tick `frames` times, or until an error when `None`.
    ///
    /// Returns the number of frames run.
    pub fn run(&mut self, frames: Option<u64>) -> Result<u64, CoreError> {
        let mut ran = 0;
        while frames.is_none_or(|limit| ran < limit) {
            self.tick()?;
            ran += 1;
        }
        Ok(ran)
    }

    fn update(&mut self) {
        let input = self.input.poll();
        let dt = self.clock.delta_seconds();

        self.atmosphere.set_time_of_day(self.time_of_day());
        self.atmosphere.advance_clouds(dt * 1000.0);

        self.camera.update(&input, dt);
        self.scene.update_transforms(self.camera.position());
    }

    /// Clock time mapped onto the day cycle, reduced before narrowing to f32
    fn time_of_day(&self) -> f32 {
        let seconds = self.clock.now_ms() as f64 * self.time_scale as f64;
        seconds.rem_euclid(DAY_SECONDS) as f32
    }

    fn draw(&mut self) -> Result<(), CoreError> {
        let view = self.camera.view();
        let queue = &mut self.queue;

        self.rasterizer.attach()?;
        self.coprocessor.frame_start(&mut self.rasterizer);
        self.rasterizer.set_view(&view);
        queue.clear_depth();

        queue.push_matrix(self.scene.sky_slot());
        self.atmosphere.draw_sky(queue);
        queue.pop_matrix(1);

        queue.set_mode(ModeChange::Combiner(Combiner::TexShade));
        queue.set_mode(ModeChange::Depth {
            compare: true,
            update: true,
        });
        queue.set_mode(ModeChange::Antialias(Antialias::Standard));
        self.scene.geometry().run(queue)?;

        queue.set_mode(ModeChange::Standard);
        queue.set_mode(ModeChange::Filter(Filter::Bilinear));
        queue.set_mode(ModeChange::Antialias(Antialias::Standard));
        queue.set_mode(ModeChange::EnvColor(FLARE_ENV_COLOR));
        queue.set_mode(ModeChange::Combiner(Combiner::Flare));
        queue.set_mode(ModeChange::Blender(Blender::Multiply));
        self.atmosphere.draw_lens_flare(&view, queue);

        if let Some(task) = self.atmosphere.occlusion_task(&view) {
            queue.call_deferred(task);
        }

        self.coprocessor
            .present(queue, self.scene.memory(), &mut self.rasterizer)?;
        Ok(())
    }

    /// Frames completed
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn coprocessor(&self) -> &Coprocessor {
        &self.coprocessor
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    pub fn rasterizer_mut(&mut self) -> &mut R {
        &mut self.rasterizer
    }

    pub fn atmosphere(&self) -> &A {
        &self.atmosphere
    }
}
