//! Time-of-day colour keyframes
//!
//! Four presets spaced a quarter day apart, starting with noon at 0 seconds.
//! Times in between blend the neighbouring presets linearly.

use skyfly_shared::Rgba8;

/// Seconds in one day
pub const DAY_SECONDS: f32 = 86_400.0;

/// Sky colours and sun strength at one time of day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimePreset {
    pub zenith: Rgba8,
    pub horizon: Rgba8,
    pub sun: Rgba8,
    pub cloud: Rgba8,
    /// Flare strength in 0..1
    pub sun_intensity: f32,
}

impl TimePreset {
    pub const NOON: TimePreset = TimePreset {
        zenith: Rgba8::new(0x2A, 0x6F, 0xD6, 0xFF),
        horizon: Rgba8::new(0xA8, 0xCF, 0xF0, 0xFF),
        sun: Rgba8::new(0xFF, 0xF6, 0xE0, 0xFF),
        cloud: Rgba8::new(0xFF, 0xFF, 0xFF, 0xFF),
        sun_intensity: 1.0,
    };

    pub const SUNSET: TimePreset = TimePreset {
        zenith: Rgba8::new(0x3B, 0x3F, 0x8C, 0xFF),
        horizon: Rgba8::new(0xF2, 0x8A, 0x46, 0xFF),
        sun: Rgba8::new(0xFF, 0x9A, 0x40, 0xFF),
        cloud: Rgba8::new(0xF0, 0xB0, 0x90, 0xFF),
        sun_intensity: 0.7,
    };

    pub const MIDNIGHT: TimePreset = TimePreset {
        zenith: Rgba8::new(0x02, 0x04, 0x12, 0xFF),
        horizon: Rgba8::new(0x10, 0x18, 0x30, 0xFF),
        sun: Rgba8::new(0x40, 0x48, 0x60, 0xFF),
        cloud: Rgba8::new(0x30, 0x34, 0x44, 0xFF),
        sun_intensity: 0.0,
    };

    pub const SUNRISE: TimePreset = TimePreset {
        zenith: Rgba8::new(0x46, 0x5A, 0xA8, 0xFF),
        horizon: Rgba8::new(0xF5, 0xB0, 0x8C, 0xFF),
        sun: Rgba8::new(0xFF, 0xC8, 0x80, 0xFF),
        cloud: Rgba8::new(0xF8, 0xD0, 0xC0, 0xFF),
        sun_intensity: 0.7,
    };

    /// Blend toward `other` by `t` in 0..1
    pub fn lerp(&self, other: &TimePreset, t: f32) -> TimePreset {
        TimePreset {
            zenith: self.zenith.lerp(other.zenith, t),
            horizon: self.horizon.lerp(other.horizon, t),
            sun: self.sun.lerp(other.sun, t),
            cloud: self.cloud.lerp(other.cloud, t),
            sun_intensity: self.sun_intensity + (other.sun_intensity - self.sun_intensity) * t,
        }
    }
}

/// Keyframes in day order, each a quarter day after the previous
const KEYFRAMES: [TimePreset; 4] = [
    TimePreset::NOON,
    TimePreset::SUNSET,
    TimePreset::MIDNIGHT,
    TimePreset::SUNRISE,
];

/// Wrap any time into `[0, DAY_SECONDS)`
pub fn wrap_time(seconds: f32) -> f32 {
    let wrapped = seconds.rem_euclid(DAY_SECONDS);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if wrapped >= DAY_SECONDS { 0.0 } else { wrapped }
}

/// Interpolated preset for a time of day in seconds
pub fn preset_at(seconds: f32) -> TimePreset {
    let quarter = DAY_SECONDS / KEYFRAMES.len() as f32;
    let position = wrap_time(seconds) / quarter;
    let index = (position.floor() as usize).min(KEYFRAMES.len() - 1);
    let next = (index + 1) % KEYFRAMES.len();
    KEYFRAMES[index].lerp(&KEYFRAMES[next], position - index as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyframes_hit_exactly() {
        assert_eq!(preset_at(0.0), TimePreset::NOON);
        assert_eq!(preset_at(21_600.0), TimePreset::SUNSET);
        assert_eq!(preset_at(43_200.0), TimePreset::MIDNIGHT);
        assert_eq!(preset_at(64_800.0), TimePreset::SUNRISE);
    }

    #[test]
    fn test_day_wraps_back_to_noon() {
        assert_eq!(preset_at(DAY_SECONDS), TimePreset::NOON);
        assert_eq!(preset_at(-21_600.0), TimePreset::SUNRISE);
        assert_eq!(wrap_time(90_000.0), 3_600.0);
    }

    #[test]
    fn test_halfway_blends_neighbours() {
        let mid = preset_at(10_800.0);
        assert!((mid.sun_intensity - 0.85).abs() < 1e-5);
        assert_eq!(mid.zenith, TimePreset::NOON.zenith.lerp(TimePreset::SUNSET.zenith, 0.5));
    }

    #[test]
    fn test_late_night_heads_to_noon() {
        let dawn = preset_at(DAY_SECONDS - 1.0);
        assert!(dawn.sun_intensity > 0.99);
    }
}
