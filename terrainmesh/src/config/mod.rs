//! User configuration
//!
//! Settings are read from `~/.terrainmesh/config.ini`. Missing files and
//! missing keys fall back to the built-in defaults; command-line flags are
//! applied on top by the front end.

mod file;
mod parser;
mod writer;

pub use file::{
    config_directory, config_file_path, AssemblySettings, ConfigFile, ConfigFileError,
    DownloadSettings, LoggingSettings, MapboxSettings, DEFAULT_LOG_FILE,
};
