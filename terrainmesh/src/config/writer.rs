//! INI serialization logic for converting `ConfigFile` → INI string.

use super::file::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let access_token = config.mapbox.access_token.as_deref().unwrap_or("");
    let clip = if config.assembly.clip { "true" } else { "false" };

    format!(
        r#"[mapbox]
; MapBox access token used for terrain-RGB and satellite tiles
; Get one at: https://account.mapbox.com/access-tokens/
access_token = {}

[assembly]
; Tiles fetched/built concurrently per phase (0 = all at once)
concurrency = {}
; Runs covering more tiles than this are rejected before any download
max_tiles = {}
; Edge length of the render box tiles are projected into
render_box_size = {}
; Attach clip planes bounding the render box to every mesh
clip = {}
; Edge length in pixels of the elevation rasters (512 for @2x terrain-RGB)
elevation_dim = {}

[download]
; HTTP request timeout in seconds
timeout = {}

[logging]
directory = {}
file = {}
"#,
        access_token,
        config.assembly.concurrency,
        config.assembly.max_tiles,
        config.assembly.render_box_size,
        clip,
        config.assembly.elevation_dim,
        config.download.timeout,
        config.logging.directory.display(),
        config.logging.file,
    )
}
