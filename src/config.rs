//! Render configuration
//!
//! Uses RON (Rusty Object Notation) for a human-readable settings file.
//! Every field has a default, so a file only needs the keys it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::rasterizer::Color;

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(e: ron::Error) -> Self {
        ConfigError::SerializeError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Which shading program draws the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadingMode {
    /// Grey Lambert term from a point light
    Diffuse,
    /// World-space normal mapped to RGB
    Normals,
    /// Screen-space gradient, drawn through the screen-triangle path
    ScreenGradient,
}

/// Camera placement and projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub up: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [5.0, 5.0, 5.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// OBJ file to draw; the built-in cube when unset
    pub model_path: Option<PathBuf>,
    /// RGBA
    pub clear_color: [u8; 4],
    pub clear_depth: f32,
    pub camera: CameraConfig,
    pub model_scale: f32,
    pub spin_axis: [f32; 3],
    /// Radians per second
    pub spin_speed: f32,
    pub light_position: [f32; 3],
    pub shading: ShadingMode,
    pub show_fps: bool,
    pub log_filter: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "softraster".to_string(),
            width: 400,
            height: 300,
            model_path: None,
            clear_color: Color::WHITE.to_bytes(),
            clear_depth: 1.0,
            camera: CameraConfig::default(),
            model_scale: 2.0,
            spin_axis: [0.0, 1.0, 0.0],
            spin_speed: 1.0,
            light_position: [10.0, 5.0, 10.0],
            shading: ShadingMode::Diffuse,
            show_fps: true,
            log_filter: None,
        }
    }
}

impl RenderConfig {
    pub fn clear_color(&self) -> Color {
        Color::from(self.clear_color)
    }
}

/// Load a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RenderConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Load a config from a RON string
pub fn load_config_from_str(s: &str) -> Result<RenderConfig, ConfigError> {
    Ok(ron::from_str(s)?)
}

/// Save a config to a RON file
pub fn save_config<P: AsRef<Path>>(config: &RenderConfig, path: P) -> Result<(), ConfigError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path, contents)?;
    Ok(())
}
