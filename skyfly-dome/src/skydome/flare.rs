//! Lens flare
//!
//! Flare elements sit on the line from the sun's screen position through the
//! screen centre. Visibility comes from sampling the depth buffer around the
//! sun pixel after the frame has been rasterized: only samples still at the
//! cleared depth see open sky.

use glam::Vec2;
use skyfly_core::{DEPTH_FAR, DepthSampler, ScreenQuad};
use skyfly_shared::Rgba8;

/// Height the element sizes are authored for
const REFERENCE_HEIGHT: f32 = 320.0;

/// Half-width of the depth sample block around the sun pixel
pub const SAMPLE_RADIUS: i32 = 1;

/// One flare element
#[derive(Debug, Clone, Copy)]
struct FlareElement {
    /// Position along the sun → centre axis (0 = sun, 1 = centre)
    offset: f32,
    /// Half size in pixels at the reference height
    half_size: f32,
    /// Peak alpha
    alpha: u8,
}

const ELEMENTS: [FlareElement; 6] = [
    FlareElement {
        offset: 0.0,
        half_size: 24.0,
        alpha: 0xC0,
    },
    FlareElement {
        offset: 0.45,
        half_size: 6.0,
        alpha: 0x50,
    },
    FlareElement {
        offset: 0.8,
        half_size: 10.0,
        alpha: 0x40,
    },
    FlareElement {
        offset: 1.2,
        half_size: 4.0,
        alpha: 0x60,
    },
    FlareElement {
        offset: 1.5,
        half_size: 14.0,
        alpha: 0x30,
    },
    FlareElement {
        offset: 1.9,
        half_size: 8.0,
        alpha: 0x48,
    },
];

/// Flare quads for a sun at `sun` pixels.
///
/// `strength` (0..1) scales every element's alpha; elements that end up
/// fully transparent are skipped.
pub fn flare_quads(sun: Vec2, resolution: (u32, u32), color: Rgba8, strength: f32) -> Vec<ScreenQuad> {
    let strength = strength.clamp(0.0, 1.0);
    let center = Vec2::new(resolution.0 as f32, resolution.1 as f32) * 0.5;
    let scale = resolution.1 as f32 / REFERENCE_HEIGHT;

    ELEMENTS
        .iter()
        .filter_map(|element| {
            let alpha = (element.alpha as f32 * strength).round() as u8;
            if alpha == 0 {
                return None;
            }
            let position = sun + (center - sun) * element.offset;
            let half = Vec2::splat(element.half_size * scale);
            Some(ScreenQuad {
                min: (position - half).to_array(),
                max: (position + half).to_array(),
                color: Rgba8 { a: alpha, ..color },
                depth: 0.0,
            })
        })
        .collect()
}

/// Fraction of the depth samples around `pixel` that see open sky.
///
/// Samples falling outside the buffer are ignored; with none inside the
/// result is 0.
pub fn sample_visibility(depth: &dyn DepthSampler, pixel: (i32, i32)) -> f32 {
    let mut inside = 0u32;
    let mut open = 0u32;
    for dy in -SAMPLE_RADIUS..=SAMPLE_RADIUS {
        for dx in -SAMPLE_RADIUS..=SAMPLE_RADIUS {
            let (x, y) = (pixel.0 + dx, pixel.1 + dy);
            if x < 0 || y < 0 {
                continue;
            }
            if let Some(value) = depth.sample_depth(x as u32, y as u32) {
                inside += 1;
                if value == DEPTH_FAR {
                    open += 1;
                }
            }
        }
    }

    if inside == 0 {
        0.0
    } else {
        open as f32 / inside as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Depth buffer with one occluded column
    struct ColumnDepth {
        column: u32,
    }

    impl DepthSampler for ColumnDepth {
        fn resolution(&self) -> (u32, u32) {
            (8, 8)
        }

        fn sample_depth(&self, x: u32, y: u32) -> Option<u16> {
            if x >= 8 || y >= 8 {
                return None;
            }
            Some(if x == self.column { 100 } else { DEPTH_FAR })
        }
    }

    #[test]
    fn test_open_sky_is_fully_visible() {
        let depth = ColumnDepth { column: 7 };
        assert_eq!(sample_visibility(&depth, (3, 3)), 1.0);
    }

    #[test]
    fn test_partial_occlusion() {
        let depth = ColumnDepth { column: 4 };
        let visibility = sample_visibility(&depth, (3, 3));
        assert!((visibility - 6.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_corner_ignores_outside_samples() {
        let depth = ColumnDepth { column: 1 };
        // (0,0) block: 4 inside samples, 2 of them in the occluded column
        assert_eq!(sample_visibility(&depth, (0, 0)), 0.5);
        assert_eq!(sample_visibility(&depth, (-5, -5)), 0.0);
    }

    #[test]
    fn test_quads_follow_axis_through_center() {
        let quads = flare_quads(Vec2::new(40.0, 40.0), (480, 320), Rgba8::WHITE, 1.0);
        assert_eq!(quads.len(), ELEMENTS.len());

        let first = &quads[0];
        let center = (Vec2::from_array(first.min) + Vec2::from_array(first.max)) * 0.5;
        assert!(center.abs_diff_eq(Vec2::new(40.0, 40.0), 1e-4));

        // Element at offset 1.2 lies past the screen centre
        let past = &quads[3];
        let past_center = (Vec2::from_array(past.min) + Vec2::from_array(past.max)) * 0.5;
        assert!(past_center.x > 240.0 && past_center.y > 160.0);
    }

    #[test]
    fn test_zero_strength_draws_nothing() {
        assert!(flare_quads(Vec2::new(10.0, 10.0), (480, 320), Rgba8::WHITE, 0.0).is_empty());
        let faint = flare_quads(Vec2::new(10.0, 10.0), (480, 320), Rgba8::WHITE, 0.5);
        assert_eq!(faint[0].color.a, 0x60);
    }
}
