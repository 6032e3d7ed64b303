//! Init command - write a config file with the current settings.

use std::path::{Path, PathBuf};

use terrainmesh::config::{config_file_path, ConfigFile};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the init command.
///
/// Writes the effective settings (file values over defaults) to
/// `config_path`, or to `~/.terrainmesh/config.ini` when none is given.
pub fn run(runner: &CliRunner, config_path: Option<&Path>, force: bool) -> Result<(), CliError> {
    runner.log_startup("init");

    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path);
    write_config(runner.config(), &path, force)?;

    println!("Wrote {}", path.display());
    Ok(())
}

fn write_config(config: &ConfigFile, path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::ConfigExists(PathBuf::from(path)));
    }
    config.save_to(path)?;
    Ok(())
}
