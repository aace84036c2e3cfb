//! Configuration module - environment variable parsing

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::entities::FireMode;

/// Render quality presets: rays per frame and view distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GraphicsPreset {
    Potato,
    VeryLow,
    Low,
    #[default]
    Medium,
    High,
    Ultra,
}

impl GraphicsPreset {
    pub fn num_rays(self) -> usize {
        match self {
            GraphicsPreset::Potato => 60,
            GraphicsPreset::VeryLow => 120,
            GraphicsPreset::Low => 180,
            GraphicsPreset::Medium => 240,
            GraphicsPreset::High => 320,
            GraphicsPreset::Ultra => 480,
        }
    }

    /// View distance in cells.
    pub fn max_depth(self) -> f32 {
        match self {
            GraphicsPreset::Potato => 8.0,
            GraphicsPreset::VeryLow => 12.0,
            GraphicsPreset::Low => 16.0,
            GraphicsPreset::Medium => 20.0,
            GraphicsPreset::High => 24.0,
            GraphicsPreset::Ultra => 30.0,
        }
    }
}

impl FromStr for GraphicsPreset {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "potato" => Ok(GraphicsPreset::Potato),
            "very_low" | "very-low" | "verylow" => Ok(GraphicsPreset::VeryLow),
            "low" => Ok(GraphicsPreset::Low),
            "medium" => Ok(GraphicsPreset::Medium),
            "high" => Ok(GraphicsPreset::High),
            "ultra" => Ok(GraphicsPreset::Ultra),
            _ => Err(()),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    pub graphics: GraphicsPreset,
    /// Pointer rotation, radians per pixel of drag
    pub sensitivity: f32,
    pub fire_mode: FireMode,
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Log filter directive (trace, debug, info, warn, error)
    pub log_filter: String,
    pub log_file: PathBuf,
    /// Where high scores and unlocked weapons are kept
    pub progress_file: PathBuf,
}

impl Config {
    pub const DEFAULT_SENSITIVITY: f32 = 0.003;
    pub const DEFAULT_TICK_RATE: u32 = 60;

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let graphics = match lookup("RAYCAST_GRAPHICS") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::invalid("RAYCAST_GRAPHICS", &value))?,
            None => GraphicsPreset::default(),
        };

        let sensitivity = match lookup("RAYCAST_SENSITIVITY") {
            Some(value) => value
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|s| s.is_finite() && *s > 0.0)
                .ok_or_else(|| ConfigError::invalid("RAYCAST_SENSITIVITY", &value))?,
            None => Self::DEFAULT_SENSITIVITY,
        };

        let fire_mode = match lookup("RAYCAST_FIRE_MODE").as_deref().map(str::trim) {
            None => FireMode::default(),
            Some(v) if v.eq_ignore_ascii_case("projectile") => FireMode::Projectile,
            Some(v) if v.eq_ignore_ascii_case("hitscan") => FireMode::Hitscan,
            Some(v) => return Err(ConfigError::invalid("RAYCAST_FIRE_MODE", v)),
        };

        let tick_rate = match lookup("RAYCAST_TICK_RATE") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|r| (1..=1000).contains(r))
                .ok_or_else(|| ConfigError::invalid("RAYCAST_TICK_RATE", &value))?,
            None => Self::DEFAULT_TICK_RATE,
        };

        let log_filter = lookup("RAYCAST_LOG").unwrap_or_else(|| "info".to_string());
        let log_file = lookup("RAYCAST_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("raycast_shooter.log"));

        let progress_file = lookup("RAYCAST_PROGRESS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let home = lookup("HOME").unwrap_or_else(|| ".".to_string());
                PathBuf::from(home).join(".raycast_shooter.json")
            });

        Ok(Self {
            graphics,
            sensitivity,
            fire_mode,
            tick_rate,
            log_filter,
            log_file,
            progress_file,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for environment variable {var}")]
    Invalid { var: &'static str, value: String },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str) -> Self {
        ConfigError::Invalid {
            var,
            value: value.to_string(),
        }
    }
}
