//! Scene configuration (TOML)
//!
//! Tuning values for the camera, scene transforms and atmosphere. Every field
//! has a default equal to the values the demo scene ships with, so a missing
//! file section (or no file at all) behaves exactly like the stock scene.
//!
//! Display setup (resolution, buffering depth, colour depth) is not part of
//! this file: those are fixed constants in `skyfly_shared::console`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Scene configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Camera start pose and controls
    #[serde(default)]
    pub camera: CameraConfig,
    /// Model resources and transforms
    #[serde(default)]
    pub scene: SceneConfig,
    /// Time of day and cloud motion
    #[serde(default)]
    pub atmosphere: AtmosphereConfig,
}

/// Camera configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Start position (default: [0, 155, 90])
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    /// Start pitch in degrees (default: 0)
    #[serde(default)]
    pub pitch_degrees: f32,
    /// Start yaw in degrees (default: 180)
    #[serde(default = "default_yaw_degrees")]
    pub yaw_degrees: f32,
    /// Movement speed in units per second (default: 15)
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Degrees of rotation per stick unit per second (default: 0.28)
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Distance from position to look-at target (default: 10)
    #[serde(default = "default_look_ahead")]
    pub look_ahead: f32,
    /// Vertical field of view in degrees (default: 90)
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    /// Near clip plane (default: 9)
    #[serde(default = "default_near")]
    pub near: f32,
    /// Far clip plane (default: 1100)
    #[serde(default = "default_far")]
    pub far: f32,
}

/// Scene configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Terrain model resource
    #[serde(default = "default_terrain")]
    pub terrain: String,
    /// Foreground model resource
    #[serde(default = "default_model")]
    pub model: String,
    /// Uniform scale of the camera-following sky transform (default: 0.2)
    #[serde(default = "default_sky_scale")]
    pub sky_scale: f32,
    /// Uniform scale of the static geometry transform (default: 1)
    #[serde(default = "default_static_scale")]
    pub static_scale: f32,
}

/// Atmosphere configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereConfig {
    /// Time of day before the first tick, in seconds (0 = noon, default: 100)
    #[serde(default = "default_initial_time")]
    pub initial_time_of_day: f32,
    /// Seconds of day advanced per wall-clock millisecond (default: 0.5)
    #[serde(default = "default_time_scale")]
    pub time_scale: f32,
    /// Cloud density (default: 1)
    #[serde(default = "default_one")]
    pub cloud_density: f32,
    /// Cloud opacity (default: 1)
    #[serde(default = "default_one")]
    pub cloud_opacity: f32,
    /// Far cloud layer scroll per millisecond (default: [-0.002, -0.001])
    #[serde(default = "default_cloud_speed")]
    pub cloud_speed: [f32; 2],
    /// Near cloud layer scroll per millisecond (default: [-0.01, 0])
    #[serde(default = "default_near_cloud_speed")]
    pub near_cloud_speed: [f32; 2],
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 155.0, 90.0]
}
fn default_yaw_degrees() -> f32 {
    180.0
}
fn default_speed() -> f32 {
    15.0
}
fn default_sensitivity() -> f32 {
    0.28
}
fn default_look_ahead() -> f32 {
    10.0
}
fn default_fov() -> f32 {
    90.0
}
fn default_near() -> f32 {
    9.0
}
fn default_far() -> f32 {
    1100.0
}

fn default_terrain() -> String {
    "rom:/city_terrain.t3dm".to_string()
}
fn default_model() -> String {
    "rom:/city.t3dm".to_string()
}
fn default_sky_scale() -> f32 {
    0.2
}
fn default_static_scale() -> f32 {
    1.0
}

fn default_initial_time() -> f32 {
    100.0
}
fn default_time_scale() -> f32 {
    0.5
}
fn default_one() -> f32 {
    1.0
}
fn default_cloud_speed() -> [f32; 2] {
    [-0.002, -0.001]
}
fn default_near_cloud_speed() -> [f32; 2] {
    [-0.01, 0.0]
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            pitch_degrees: 0.0,
            yaw_degrees: default_yaw_degrees(),
            speed: default_speed(),
            sensitivity: default_sensitivity(),
            look_ahead: default_look_ahead(),
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            terrain: default_terrain(),
            model: default_model(),
            sky_scale: default_sky_scale(),
            static_scale: default_static_scale(),
        }
    }
}

impl Default for AtmosphereConfig {
    fn default() -> Self {
        Self {
            initial_time_of_day: default_initial_time(),
            time_scale: default_time_scale(),
            cloud_density: default_one(),
            cloud_opacity: default_one(),
            cloud_speed: default_cloud_speed(),
            near_cloud_speed: default_near_cloud_speed(),
        }
    }
}

/// Loads the configuration.
///
/// With no path the stock defaults are returned. An explicit path that cannot
/// be read or parsed is an error: configuration is only loaded at startup and
/// a broken file should stop the program before the loop starts.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_matches_stock_scene() {
        let config = Config::default();
        assert_eq!(config.camera.position, [0.0, 155.0, 90.0]);
        assert_eq!(config.camera.yaw_degrees, 180.0);
        assert_eq!(config.camera.speed, 15.0);
        assert_eq!(config.camera.look_ahead, 10.0);
        assert_eq!(config.scene.sky_scale, 0.2);
        assert_eq!(config.atmosphere.time_scale, 0.5);
    }

    #[test]
    fn test_load_without_path_is_default() {
        let config = load(None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skyfly.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[camera]\nspeed = 30.0\n\n[atmosphere]\ncloud_density = 0.5").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.camera.speed, 30.0);
        assert_eq!(config.camera.look_ahead, 10.0);
        assert_eq!(config.atmosphere.cloud_density, 0.5);
        assert_eq!(config.atmosphere.cloud_opacity, 1.0);
        assert_eq!(config.scene, SceneConfig::default());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[camera\nspeed = ").unwrap();
        let err = load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
