//! # Application Configuration
//!
//! Window, camera, renderer and orbit-control settings. Every field has a
//! default, so a TOML file only needs to name the values it changes:
//!
//! ```toml
//! log_filter = "vignette=debug"
//!
//! [window]
//! title = "Shapes"
//!
//! [camera]
//! fov_degrees = 75.0
//! position = [0.0, 3.0, 8.0]
//!
//! [renderer]
//! shadows_enabled = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Top level configuration for an [`App`](crate::App)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `env_logger` filter used when `RUST_LOG` is not set
    pub log_filter: String,
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub renderer: RendererConfig,
    pub controls: ControlsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            renderer: RendererConfig::default(),
            controls: ControlsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parses a configuration from TOML text and validates it
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Loads `path` if it exists, otherwise returns the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            log::info!("Loading configuration from {}", path.display());
            Self::load(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                cam.fov_degrees
            )));
        }
        if !(cam.near > 0.0 && cam.far > cam.near && cam.far.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "camera clip planes must satisfy 0 < near < far, got near={} far={}",
                cam.near, cam.far
            )));
        }
        if !self.renderer.shadow_map_size.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "renderer.shadow_map_size must be a power of two, got {}",
                self.renderer.shadow_map_size
            )));
        }
        let extent = self.renderer.shadow_extent;
        if !(extent.is_finite() && extent > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "renderer.shadow_extent must be positive and finite, got {}",
                extent
            )));
        }
        let ctl = &self.controls;
        for (name, speed) in [
            ("rotate_speed", ctl.rotate_speed),
            ("zoom_speed", ctl.zoom_speed),
            ("pan_speed", ctl.pan_speed),
        ] {
            if !(speed.is_finite() && speed >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "controls.{} must be non-negative and finite, got {}",
                    name, speed
                )));
            }
        }
        if !(ctl.min_distance > 0.0
            && ctl.max_distance >= ctl.min_distance
            && ctl.max_distance.is_finite())
        {
            return Err(ConfigError::Invalid(format!(
                "controls distance range is empty: [{}, {}]",
                ctl.min_distance, ctl.max_distance
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "vignette".to_string(),
            width: 1200,
            height: 800,
        }
    }
}

/// Initial perspective camera parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.1,
            far: 100.0,
            position: [0.0, 1.0, 5.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Linear RGBA clear colour
    pub clear_color: [f64; 4],
    pub shadows_enabled: bool,
    /// Square shadow map resolution in texels
    pub shadow_map_size: u32,
    /// Half-width of the orthographic light camera used for directional shadows
    pub shadow_extent: f32,
    pub vsync: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            shadows_enabled: true,
            shadow_map_size: 2048,
            shadow_extent: 10.0,
            vsync: true,
        }
    }
}

/// Orbit control sensitivities and limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub enabled: bool,
    /// Radians per pixel of drag
    pub rotate_speed: f32,
    /// Fraction of the current distance per wheel line
    pub zoom_speed: f32,
    /// Fraction of the current distance per pixel of drag
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.002,
            min_distance: 0.5,
            max_distance: 50.0,
        }
    }
}
