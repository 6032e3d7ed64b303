//! Configuration file handling for ~/.terrainmesh/config.ini.
//!
//! Loads and saves user configuration with sensible defaults. Parsing lives
//! in [`super::parser`] and serialization in [`super::writer`].

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::assembly::{
    AssemblyOptions, DEFAULT_CONCURRENCY, DEFAULT_ELEVATION_DIM, DEFAULT_MAX_TILES,
    DEFAULT_RENDER_BOX_SIZE,
};
use crate::provider::DEFAULT_TIMEOUT_SECS;

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "terrainmesh.log";

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

/// `[mapbox]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapboxSettings {
    pub access_token: Option<String>,
}

/// `[assembly]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblySettings {
    pub concurrency: usize,
    pub max_tiles: usize,
    pub render_box_size: f64,
    pub clip: bool,
    pub elevation_dim: u32,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            max_tiles: DEFAULT_MAX_TILES,
            render_box_size: DEFAULT_RENDER_BOX_SIZE,
            clip: false,
            elevation_dim: DEFAULT_ELEVATION_DIM,
        }
    }
}

/// `[download]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSettings {
    /// Per-request timeout in seconds
    pub timeout: u64,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: config_directory().join("logs"),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

/// Parsed contents of `config.ini`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub mapbox: MapboxSettings,
    pub assembly: AssemblySettings,
    pub download: DownloadSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load configuration from the default path (~/.terrainmesh/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Assembly options seeded from the `[assembly]` and `[mapbox]` sections.
    pub fn assembly_options(&self) -> AssemblyOptions {
        AssemblyOptions {
            clip: self.assembly.clip,
            render_box_size: self.assembly.render_box_size,
            api_token: self.mapbox.access_token.clone().unwrap_or_default(),
            concurrency: self.assembly.concurrency,
            max_tiles: self.assembly.max_tiles,
            elevation_dim: self.assembly.elevation_dim,
        }
    }
}

/// Get the path to the config directory (~/.terrainmesh).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".terrainmesh")
}

/// Get the path to the config file (~/.terrainmesh/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
