//! Scale / rotate / translate transforms

use glam::{Mat4, Vec3};

/// Human-authored transform: scale, euler rotation (radians), translation.
///
/// Composed as scale, then rotate (Z, then Y, then X applied to the point),
/// then translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srt {
    pub scale: Vec3,
    pub rotation: Vec3,
    pub translation: Vec3,
}

impl Srt {
    pub const IDENTITY: Srt = Srt {
        scale: Vec3::ONE,
        rotation: Vec3::ZERO,
        translation: Vec3::ZERO,
    };

    pub fn new(scale: Vec3, rotation: Vec3, translation: Vec3) -> Self {
        Self {
            scale,
            rotation,
            translation,
        }
    }

    /// Uniform scale at `translation`, no rotation
    pub fn uniform(scale: f32, translation: Vec3) -> Self {
        Self {
            scale: Vec3::splat(scale),
            rotation: Vec3::ZERO,
            translation,
        }
    }

    /// Float affine matrix for this transform
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_rotation_z(self.rotation.z)
            * Mat4::from_scale(self.scale)
    }
}

impl Default for Srt {
    fn default() -> Self {
        Self::IDENTITY
    }
}
