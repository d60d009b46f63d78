//! Game configuration
//!
//! Timings, tilt constants and colors. Loaded from `accelesnake.toml` in the
//! working directory, then `~/.accelesnake.toml`; anything missing keeps its
//! default. The board size is fixed and not configurable.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::hal::Palette;

const CONFIG_FILE: &str = "accelesnake.toml";
const HOME_CONFIG_FILE: &str = ".accelesnake.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Sleep between two Play ticks
    pub tick_ms: u32,
    /// Fixed pause after drawing the title, game over and new game screens
    pub transition_pause_ms: u32,
    /// Sleep between two button polls while waiting for Start
    pub poll_interval_ms: u32,
    /// Scaled tilt needed to steer
    pub tilt_threshold: i16,
    /// Raw sensor units per scaled tilt unit
    pub tilt_scale: i16,
    pub palette: Palette,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_ms: 150,
            transition_pause_ms: 2000,
            poll_interval_ms: 10,
            tilt_threshold: 6,
            tilt_scale: 500,
            palette: Palette::default(),
        }
    }
}

impl GameConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        for path in config_paths() {
            match Self::from_file(&path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
            }
        }

        log::debug!("Using default config");
        Self::default()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(content)?;
        Ok(config.sanitized())
    }

    /// Replace tilt constants that would flip the axes or overflow with
    /// their defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut config = self;

        // Division must never see 0, and -1 overflows on i16::MIN.
        if config.tilt_scale <= 0 {
            log::warn!(
                "tilt_scale must be positive, got {}; using {}",
                config.tilt_scale,
                defaults.tilt_scale
            );
            config.tilt_scale = defaults.tilt_scale;
        }
        if config.tilt_threshold < 0 {
            log::warn!(
                "tilt_threshold must not be negative, got {}; using {}",
                config.tilt_threshold,
                defaults.tilt_threshold
            );
            config.tilt_threshold = defaults.tilt_threshold;
        }

        config
    }
}

fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(home) = env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(HOME_CONFIG_FILE));
    }
    paths
}
