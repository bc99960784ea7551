// =============================================================================
// CONFIGURATION - Load settings from config.toml
// =============================================================================
//
// Settings for the demo binary: where shader sources live, which attribute
// offset rule to use, and logging/debug switches. Missing file or broken
// sections fall back to defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::backend::OffsetRule;

/// Root configuration structure
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub shaders: ShaderConfig,
    pub layout: LayoutConfig,
    pub debug: DebugConfig,
}

/// Shader source locations. `None` means use the built-in sources.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ShaderConfig {
    pub vertex: Option<PathBuf>,
    pub fragment: Option<PathBuf>,
}

/// Attribute layout settings
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LayoutConfig {
    pub offset_rule: OffsetRule,
}

/// Debug settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub log_level: String,
    /// Read the context error flag after each frame.
    pub check_errors: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            check_errors: true,
        }
    }
}

impl DebugConfig {
    /// The configured level, or `None` if `log_level` isn't a level name.
    pub fn parsed_level(&self) -> Option<log::LevelFilter> {
        self.log_level.parse().ok()
    }

    /// The configured level, falling back to info. Silent: this runs before
    /// the logger exists, so the caller reports the fallback.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.parsed_level().unwrap_or(log::LevelFilter::Info)
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults if not found
    pub fn load() -> Self {
        Self::load_from_path("config.toml").unwrap_or_else(|e| {
            log::warn!("Failed to load config.toml: {:#}. Using defaults.", e);
            Config::default()
        })
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        log::info!("Loaded configuration from {:?}", path);
        log::debug!("Config: {:?}", config);

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
