//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::Ini;

use super::file::{ConfigFile, ConfigFileError};

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [mapbox] section
    if let Some(section) = ini.section(Some("mapbox")) {
        if let Some(v) = section.get("access_token") {
            let v = v.trim();
            if !v.is_empty() {
                config.mapbox.access_token = Some(v.to_string());
            }
        }
    }

    // [assembly] section
    if let Some(section) = ini.section(Some("assembly")) {
        if let Some(v) = section.get("concurrency") {
            config.assembly.concurrency =
                parse_value("assembly", "concurrency", v, "expected a non-negative integer")?;
        }
        if let Some(v) = section.get("max_tiles") {
            let max_tiles: usize =
                parse_value("assembly", "max_tiles", v, "expected a positive integer")?;
            if max_tiles == 0 {
                return Err(invalid("assembly", "max_tiles", v, "must be at least 1"));
            }
            config.assembly.max_tiles = max_tiles;
        }
        if let Some(v) = section.get("render_box_size") {
            let size: f64 =
                parse_value("assembly", "render_box_size", v, "expected a number")?;
            if !(size.is_finite() && size > 0.0) {
                return Err(invalid("assembly", "render_box_size", v, "must be positive"));
            }
            config.assembly.render_box_size = size;
        }
        if let Some(v) = section.get("clip") {
            config.assembly.clip = parse_bool("assembly", "clip", v)?;
        }
        if let Some(v) = section.get("elevation_dim") {
            let dim: u32 =
                parse_value("assembly", "elevation_dim", v, "expected a pixel count")?;
            if dim < 2 {
                return Err(invalid("assembly", "elevation_dim", v, "must be at least 2"));
            }
            config.assembly.elevation_dim = dim;
        }
    }

    // [download] section
    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = section.get("timeout") {
            config.download.timeout =
                parse_value("download", "timeout", v, "expected seconds as an integer")?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigFileError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(invalid(section, key, value, "expected true or false")),
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~` to the home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
