//! Free-fly camera controller
//!
//! Owns the camera pose and turns per-tick input plus elapsed time into
//! camera displacement. The look-at target is derived from the position every
//! tick and never stored independently of it.

use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;
use crate::input::{Buttons, InputFrame};
use crate::math::{Euler, dir_from_euler, strafe_from_euler};

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn from_degrees(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y: fov_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    /// Right-handed perspective matrix with depth mapped to 0..1
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

/// Everything the device needs to place the camera for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub projection: Projection,
}

impl ViewState {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection.matrix() * self.view_matrix()
    }

    /// Project a world point to pixel coordinates and 0..1 depth.
    ///
    /// Returns `None` for points behind the eye. Points outside the screen
    /// are still returned so callers can decide how to clip.
    pub fn to_screen(&self, world: Vec3, resolution: (u32, u32)) -> Option<(Vec2, f32)> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let (width, height) = (resolution.0 as f32, resolution.1 as f32);
        let screen = Vec2::new(
            (ndc.x * 0.5 + 0.5) * width,
            (1.0 - (ndc.y * 0.5 + 0.5)) * height,
        );
        Some((screen, ndc.z))
    }
}

/// Camera pose.
///
/// Mutated once per tick by the controller. Orientation is free running:
/// pitch passes through ±90° without clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub target: Vec3,
    pub rotation: Euler,
}

/// Free-fly camera driven by stick and d-pad input
#[derive(Debug, Clone)]
pub struct CameraController {
    state: CameraState,
    /// Units per second
    speed: f32,
    /// Degrees per stick unit per second
    sensitivity: f32,
    look_ahead: f32,
    projection: Projection,
}

impl CameraController {
    pub fn new(
        position: Vec3,
        rotation: Euler,
        speed: f32,
        sensitivity: f32,
        look_ahead: f32,
        projection: Projection,
    ) -> Self {
        let target = position + dir_from_euler(rotation).normalize_or_zero() * look_ahead;
        Self {
            state: CameraState {
                position,
                target,
                rotation,
            },
            speed,
            sensitivity,
            look_ahead,
            projection,
        }
    }

    /// Build from configuration for a display with the given aspect ratio
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self::new(
            Vec3::from_array(config.position),
            Euler::from_degrees(config.pitch_degrees, config.yaw_degrees),
            config.speed,
            config.sensitivity,
            config.look_ahead,
            Projection::from_degrees(config.fov_degrees, aspect, config.near, config.far),
        )
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn target(&self) -> Vec3 {
        self.state.target
    }

    pub fn rotation(&self) -> Euler {
        self.state.rotation
    }

    /// Advance the camera by one tick.
    ///
    /// Stick X turns (yaw decreases for positive X), stick Y looks up/down.
    /// D-pad up/down moves along the view direction, left/right strafes
    /// without changing altitude, L/Z move straight up/down.
    pub fn update(&mut self, input: &InputFrame, dt: f32) {
        let turn = (self.sensitivity * dt).to_radians();
        self.state.rotation.yaw -= turn * input.stick_x as f32;
        self.state.rotation.pitch += turn * input.stick_y as f32;

        let step = self.speed * dt;
        let forward_dir = dir_from_euler(self.state.rotation).normalize_or_zero();
        let forward = forward_dir * step;
        let mut strafe = strafe_from_euler(self.state.rotation).normalize_or_zero() * step;
        strafe.y = 0.0;

        let position = &mut self.state.position;
        if input.is_held(Buttons::D_LEFT) {
            *position += strafe;
        }
        if input.is_held(Buttons::D_RIGHT) {
            *position -= strafe;
        }
        if input.is_held(Buttons::D_UP) {
            *position += forward;
        }
        if input.is_held(Buttons::D_DOWN) {
            *position -= forward;
        }
        if input.is_held(Buttons::L) {
            position.y += step;
        }
        if input.is_held(Buttons::Z) {
            position.y -= step;
        }

        self.state.target = self.state.position + forward_dir * self.look_ahead;
    }

    /// View for the current pose
    pub fn view(&self) -> ViewState {
        ViewState {
            eye: self.state.position,
            target: self.state.target,
            up: Vec3::Y,
            projection: self.projection,
        }
    }
}
