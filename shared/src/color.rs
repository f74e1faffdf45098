//! RGBA colour type shared between the pipeline and the device
//!
//! Colours travel through the command stream as 8-bit channels. The device
//! framebuffer stores them as RGBA5551, so packing helpers live here too.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 8-bit per channel RGBA colour (POD type)
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Rgba8 = Rgba8::new(0xFF, 0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgba8 = Rgba8::new(0x00, 0x00, 0x00, 0xFF);
    pub const TRANSPARENT: Rgba8 = Rgba8::new(0x00, 0x00, 0x00, 0x00);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create from packed 0xRRGGBBAA
    #[inline]
    pub const fn from_u32(rgba: u32) -> Self {
        Self {
            r: (rgba >> 24) as u8,
            g: (rgba >> 16) as u8,
            b: (rgba >> 8) as u8,
            a: rgba as u8,
        }
    }

    /// Pack to 0xRRGGBBAA
    #[inline]
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | self.a as u32
    }

    /// Linear interpolation per channel (`t` clamped to 0..=1)
    pub fn lerp(self, other: Rgba8, t: f32) -> Rgba8 {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 { (a as f32 + (b as f32 - a as f32) * t).round() as u8 };
        Rgba8 {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Channel-wise multiply (both colours treated as 0..=1)
    pub fn modulate(self, other: Rgba8) -> Rgba8 {
        let mul = |a: u8, b: u8| -> u8 { ((a as u16 * b as u16 + 127) / 255) as u8 };
        Rgba8 {
            r: mul(self.r, other.r),
            g: mul(self.g, other.g),
            b: mul(self.b, other.b),
            a: mul(self.a, other.a),
        }
    }

    /// Scale RGB by `factor` (alpha untouched, result saturates)
    pub fn scale_rgb(self, factor: f32) -> Rgba8 {
        let scale = |c: u8| -> u8 { (c as f32 * factor).round().clamp(0.0, 255.0) as u8 };
        Rgba8 {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }

    /// Pack into RGBA5551 (alpha bit set when alpha >= 128)
    #[inline]
    pub const fn to_5551(self) -> u16 {
        let r = (self.r as u16 >> 3) << 11;
        let g = (self.g as u16 >> 3) << 6;
        let b = (self.b as u16 >> 3) << 1;
        let a = (self.a >= 0x80) as u16;
        r | g | b | a
    }

    /// Unpack from RGBA5551, replicating high bits into the low bits
    #[inline]
    pub const fn from_5551(packed: u16) -> Self {
        Self {
            r: expand5((packed >> 11) & 0x1F),
            g: expand5((packed >> 6) & 0x1F),
            b: expand5((packed >> 1) & 0x1F),
            a: if packed & 1 != 0 { 0xFF } else { 0x00 },
        }
    }
}

/// Widen a 5-bit channel to 8 bits
#[inline]
const fn expand5(v: u16) -> u8 {
    ((v << 3) | (v >> 2)) as u8
}
