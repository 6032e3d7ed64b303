//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use terrainmesh::assembly::AssemblyError;
use terrainmesh::config::ConfigFileError;
use terrainmesh::provider::ProviderError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be read
    Config(ConfigFileError),
    /// Refused to overwrite an existing configuration file
    ConfigExists(PathBuf),
    /// No MapBox access token from flags or config
    MissingToken,
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Failed to create the HTTP client
    HttpClient(ProviderError),
    /// Assembly run failed
    Assembly(AssemblyError),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::MissingToken => {
                eprintln!();
                eprintln!("Provide a MapBox access token in one of these ways:");
                eprintln!("  1. Pass --token <TOKEN>");
                eprintln!("  2. Set access_token in the [mapbox] section of config.ini");
            }
            CliError::ConfigExists(_) => {
                eprintln!();
                eprintln!("Pass --force to replace it.");
            }
            CliError::Assembly(AssemblyError::TooManyTiles { .. }) => {
                eprintln!();
                eprintln!("Try one of:");
                eprintln!("  1. A smaller --radius");
                eprintln!("  2. A lower --zoom");
                eprintln!("  3. Raising --max-tiles (more tiles means more downloads)");
            }
            CliError::Assembly(AssemblyError::Provider(ProviderError::HttpStatus {
                status: 401 | 403,
                ..
            })) => {
                eprintln!();
                eprintln!("MapBox rejected the request; check that your access token is valid.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::ConfigExists(path) => {
                write!(f, "Configuration file already exists: {}", path.display())
            }
            CliError::MissingToken => write!(f, "No MapBox access token configured"),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Assembly(e) => write!(f, "Terrain assembly failed: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::HttpClient(e) => Some(e),
            CliError::Assembly(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<AssemblyError> for CliError {
    fn from(e: AssemblyError) -> Self {
        CliError::Assembly(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = CliError::Assembly(AssemblyError::TooManyTiles { count: 50, max: 36 });
        assert!(err.to_string().starts_with("Terrain assembly failed: Too many tiles"));

        let err = CliError::FileWrite {
            path: "out.obj".to_string(),
            error: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to write file 'out.obj': denied");
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;

        let err = CliError::from(AssemblyError::NoTiles);
        assert!(err.source().is_some());
        assert!(CliError::MissingToken.source().is_none());
    }
}
