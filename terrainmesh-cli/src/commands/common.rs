//! Common argument types and resolution shared across CLI commands.

use clap::Args;
use terrainmesh::assembly::{AssemblyConfig, AssemblyOptions};
use terrainmesh::config::ConfigFile;
use terrainmesh::provider::{AsyncReqwestClient, MapboxTerrainSource};

use crate::error::CliError;

/// The area to cover.
#[derive(Debug, Clone, Args)]
pub struct AreaArgs {
    /// Origin latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Origin longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Tile zoom level (max 15)
    #[arg(long, default_value = "13")]
    pub zoom: u8,

    /// Distance from the origin to each corner of the area, in km
    #[arg(long, default_value = "3")]
    pub radius: f64,
}

/// Overrides for values otherwise taken from config.ini.
#[derive(Debug, Clone, Default, Args)]
pub struct TuningArgs {
    /// MapBox access token (overrides [mapbox] access_token)
    #[arg(long)]
    pub token: Option<String>,

    /// Tiles processed concurrently per phase, 0 for all at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Reject runs covering more tiles than this
    #[arg(long)]
    pub max_tiles: Option<usize>,

    /// Edge length of the render box
    #[arg(long)]
    pub render_box_size: Option<f64>,

    /// Attach clip planes bounding the render box to every mesh
    #[arg(long)]
    pub clip: bool,

    /// HTTP request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Builds the assembly configuration: CLI flags, then config file, then defaults.
pub fn resolve_assembly(
    area: &AreaArgs,
    tuning: &TuningArgs,
    config: &ConfigFile,
) -> AssemblyConfig {
    let from_file = config.assembly_options();
    let options = AssemblyOptions {
        clip: tuning.clip || from_file.clip,
        render_box_size: tuning.render_box_size.unwrap_or(from_file.render_box_size),
        api_token: tuning.token.clone().unwrap_or(from_file.api_token),
        concurrency: tuning.concurrency.unwrap_or(from_file.concurrency),
        max_tiles: tuning.max_tiles.unwrap_or(from_file.max_tiles),
        elevation_dim: from_file.elevation_dim,
    };

    AssemblyConfig::new(area.lat, area.lon, area.zoom, area.radius).with_options(options)
}

/// Creates the MapBox source with the resolved HTTP timeout.
pub fn mapbox_source(
    tuning: &TuningArgs,
    config: &ConfigFile,
) -> Result<MapboxTerrainSource<AsyncReqwestClient>, CliError> {
    let timeout = tuning.timeout.unwrap_or(config.download.timeout);
    let client = AsyncReqwestClient::with_timeout(timeout).map_err(CliError::HttpClient)?;
    Ok(MapboxTerrainSource::new(client))
}

/// Fails unless an access token was resolved.
pub fn require_token(config: &AssemblyConfig) -> Result<(), CliError> {
    if config.options.api_token.trim().is_empty() {
        return Err(CliError::MissingToken);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> AreaArgs {
        AreaArgs {
            lat: 46.55,
            lon: 7.98,
            zoom: 13,
            radius: 3.0,
        }
    }

    #[test]
    fn test_config_values_used_without_flags() {
        let mut config = ConfigFile::default();
        config.mapbox.access_token = Some("pk.file".to_string());
        config.assembly.concurrency = 6;
        config.assembly.clip = true;

        let resolved = resolve_assembly(&area(), &TuningArgs::default(), &config);

        assert_eq!(resolved.options.api_token, "pk.file");
        assert_eq!(resolved.options.concurrency, 6);
        assert!(resolved.options.clip);
        assert_eq!(resolved.zoom, 13);
        assert_eq!(resolved.radius_km, 3.0);
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = ConfigFile::default();
        config.mapbox.access_token = Some("pk.file".to_string());
        config.assembly.max_tiles = 10;

        let tuning = TuningArgs {
            token: Some("pk.flag".to_string()),
            max_tiles: Some(20),
            render_box_size: Some(4.0),
            clip: true,
            ..Default::default()
        };
        let resolved = resolve_assembly(&area(), &tuning, &config);

        assert_eq!(resolved.options.api_token, "pk.flag");
        assert_eq!(resolved.options.max_tiles, 20);
        assert_eq!(resolved.options.render_box_size, 4.0);
        assert!(resolved.options.clip);
    }

    #[test]
    fn test_require_token() {
        let config = ConfigFile::default();
        let resolved = resolve_assembly(&area(), &TuningArgs::default(), &config);
        assert!(matches!(require_token(&resolved), Err(CliError::MissingToken)));

        let tuning = TuningArgs {
            token: Some("pk.x".to_string()),
            ..Default::default()
        };
        let resolved = resolve_assembly(&area(), &tuning, &config);
        assert!(require_token(&resolved).is_ok());
    }
}
