//! CLI runner for common setup.
//!
//! Encapsulates config loading and logging initialization so every command
//! starts the same way.

use std::path::Path;

use terrainmesh::config::ConfigFile;
use terrainmesh::logging::{init_logging, LoggingGuard};
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Loads the config (default path unless `config_path` is given) and
    /// initializes logging into the configured directory.
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file, verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("terrainmesh v{}", terrainmesh::VERSION);
        info!(
            log_file = %self.logging_guard.log_path().display(),
            "terrainmesh CLI: {} command", command
        );
    }
}
