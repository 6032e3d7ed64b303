//! Provider types and traits

use std::future::Future;

use thiserror::Error;

use crate::coord::TilePosition;

/// Errors that can occur while fetching tile data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Zoom level not supported by this provider
    #[error("Zoom level {0} not supported by provider")]
    UnsupportedZoom(u8),

    /// Response body could not be decoded as an image
    #[error("Failed to decode tile {tile}: {reason}")]
    DecodeError { tile: TilePosition, reason: String },
}

/// Source of per-tile elevation rasters and imagery.
///
/// Implementations fetch the terrain-RGB raster for a tile and return it as
/// interleaved RGBA bytes, and fetch the imagery used as the tile's texture.
/// The access token is passed with each call so the same source can serve
/// runs with different credentials.
pub trait TerrainSource: Send + Sync {
    /// Fetches and decodes the terrain-RGB raster for `tile` into RGBA bytes.
    fn fetch_elevation_pixels(
        &self,
        tile: TilePosition,
        access_token: &str,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Fetches the encoded imagery (texture) for `tile`.
    fn fetch_imagery(
        &self,
        tile: TilePosition,
        access_token: &str,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Returns the source's name for logging and identification.
    fn name(&self) -> &str;

    /// Returns the maximum supported zoom level.
    fn max_zoom(&self) -> u8;

    /// Checks if this source supports the given zoom level.
    fn supports_zoom(&self, zoom: u8) -> bool {
        zoom <= self.max_zoom()
    }
}
