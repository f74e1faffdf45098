//! Orientation math
//!
//! Converts a pitch/yaw pair into a direction vector. The convention matches
//! the device's camera: yaw 0 looks down -Z, positive pitch looks up.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Camera orientation in radians.
///
/// Both angles are free running: nothing wraps yaw or clamps pitch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Euler {
    /// Rotation about X (look up/down)
    pub pitch: f32,
    /// Rotation about Y (look left/right)
    pub yaw: f32,
}

impl Euler {
    pub const fn new(pitch: f32, yaw: f32) -> Self {
        Self { pitch, yaw }
    }

    /// Build from degrees
    pub fn from_degrees(pitch: f32, yaw: f32) -> Self {
        Self {
            pitch: pitch.to_radians(),
            yaw: yaw.to_radians(),
        }
    }

    /// Same orientation turned a quarter turn in yaw
    #[inline]
    pub fn quarter_turn(self) -> Self {
        Self {
            pitch: self.pitch,
            yaw: self.yaw + std::f32::consts::FRAC_PI_2,
        }
    }
}

/// Direction for a pitch/yaw pair:
/// `(-sin(yaw)·cos(pitch), sin(pitch), -cos(yaw)·cos(pitch))`.
///
/// This is a geometric construction, not a normalization routine. Callers
/// normalize the result.
#[inline]
pub fn dir_from_euler(rotation: Euler) -> Vec3 {
    let (sin_yaw, cos_yaw) = rotation.yaw.sin_cos();
    let (sin_pitch, cos_pitch) = rotation.pitch.sin_cos();
    Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
}

/// Strafe direction: [`dir_from_euler`] with yaw offset by +90°.
///
/// With yaw 0 this points down -X, so it is added for a left strafe.
#[inline]
pub fn strafe_from_euler(rotation: Euler) -> Vec3 {
    dir_from_euler(rotation.quarter_turn())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_yaw_zero_looks_down_negative_z() {
        let dir = dir_from_euler(Euler::new(0.0, 0.0));
        assert!(dir.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn test_yaw_half_turn_looks_down_positive_z() {
        let dir = dir_from_euler(Euler::from_degrees(0.0, 180.0));
        assert!(dir.abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn test_positive_pitch_looks_up() {
        let dir = dir_from_euler(Euler::new(PI / 2.0, 0.0));
        assert!(dir.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_normalized_direction_is_unit_length() {
        let steps = 48;
        for i in 0..steps {
            for j in 0..steps {
                let yaw = (i as f32 / steps as f32) * 4.0 * PI - 2.0 * PI;
                let pitch = (j as f32 / steps as f32) * 4.0 * PI - 2.0 * PI;
                let dir = dir_from_euler(Euler::new(pitch, yaw)).normalize();
                assert!(
                    (dir.length() - 1.0).abs() < 1e-5,
                    "yaw={yaw} pitch={pitch} len={}",
                    dir.length()
                );
            }
        }
    }

    #[test]
    fn test_strafe_is_perpendicular_on_the_ground_plane() {
        let rotation = Euler::from_degrees(0.0, 37.0);
        let forward = dir_from_euler(rotation);
        let strafe = strafe_from_euler(rotation);
        assert!(forward.dot(strafe).abs() < 1e-6);
        assert!(strafe_from_euler(Euler::new(0.0, 0.0)).abs_diff_eq(Vec3::NEG_X, 1e-6));
    }
}
