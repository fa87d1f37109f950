//! Game configuration loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable config files.
//! Values are validated on both load and save so a bad file fails fast at
//! startup instead of producing a degenerate window or world.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::backend::Color;
use crate::{WIN_TITLE, WORLD_HEIGHT, WORLD_WIDTH};

/// Validation limits for config values
pub mod limits {
    /// Maximum window or world dimension, in pixels
    pub const MAX_DIM: i32 = 16_384;
    /// Maximum length of the window title
    pub const MAX_TITLE_LEN: usize = 256;
}

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    ValidationError(String),
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
            ConfigError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

/// Window and world settings consumed at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub title: String,
    pub window_width: i32,
    pub window_height: i32,
    /// Logical space the collision border checks against. Usually the
    /// window size, but scrolling games make it larger.
    pub world_width: i32,
    pub world_height: i32,
    pub bg_color: Color,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: WIN_TITLE.to_string(),
            window_width: WORLD_WIDTH,
            window_height: WORLD_HEIGHT,
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            bg_color: Color::WHITE,
        }
    }
}

/// Validate config values against the limits
pub fn validate_config(config: &GameConfig) -> Result<(), ConfigError> {
    if config.title.len() > limits::MAX_TITLE_LEN {
        return Err(ConfigError::ValidationError(format!(
            "title too long ({} > {})",
            config.title.len(),
            limits::MAX_TITLE_LEN
        )));
    }
    for (name, value) in [
        ("window_width", config.window_width),
        ("window_height", config.window_height),
        ("world_width", config.world_width),
        ("world_height", config.world_height),
    ] {
        if value <= 0 || value > limits::MAX_DIM {
            return Err(ConfigError::ValidationError(format!(
                "{} out of range: {} (expected 1..={})",
                name,
                value,
                limits::MAX_DIM
            )));
        }
    }
    Ok(())
}

/// Load and validate a config file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GameConfig, ConfigError> {
    let text = fs::read_to_string(path)?;
    let config: GameConfig = ron::from_str(&text)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate and write a config file as pretty-printed RON.
pub fn save_config<P: AsRef<Path>>(config: &GameConfig, path: P) -> Result<(), ConfigError> {
    validate_config(config)?;
    let text = ron::ser::to_string_pretty(config, ron::ser::PrettyConfig::default())?;
    fs::write(path, text)?;
    Ok(())
}
