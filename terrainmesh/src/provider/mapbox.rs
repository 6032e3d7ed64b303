//! MapBox terrain and satellite provider.
//!
//! Elevation comes from the Terrain-RGB tileset, delivered as lossless PNG
//! at 512×512 (`@2x`). Texture imagery comes from the Satellite style tiles.
//!
//! # URL Patterns
//!
//! - Terrain: `{base}/v4/mapbox.terrain-rgb/{z}/{x}/{y}@2x.pngraw?access_token={token}`
//! - Imagery: `{base}/styles/v1/mapbox/satellite-v9/tiles/{z}/{x}/{y}?access_token={token}`
//!
//! Both use standard XYZ tile coordinates (x west to east, y north to south).

use tracing::debug;

use crate::coord::TilePosition;
use crate::provider::{AsyncHttpClient, ProviderError, TerrainSource};

/// Base URL for the MapBox API.
const MAPBOX_BASE_URL: &str = "https://api.mapbox.com";

/// Highest zoom level the Terrain-RGB tileset is published at.
const MAX_ZOOM: u8 = 15;

/// MapBox terrain source.
///
/// # Example
///
/// ```ignore
/// use terrainmesh::provider::{AsyncReqwestClient, MapboxTerrainSource};
///
/// let client = AsyncReqwestClient::new()?;
/// let source = MapboxTerrainSource::new(client);
/// ```
pub struct MapboxTerrainSource<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
}

impl<C: AsyncHttpClient> MapboxTerrainSource<C> {
    /// Creates a source talking to the public MapBox API.
    pub fn new(http_client: C) -> Self {
        Self {
            http_client,
            base_url: MAPBOX_BASE_URL.to_string(),
        }
    }

    /// Points the source at another host serving the same URL layout.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn elevation_url(&self, tile: &TilePosition, access_token: &str) -> String {
        format!(
            "{}/v4/mapbox.terrain-rgb/{}/{}/{}@2x.pngraw?access_token={}",
            self.base_url, tile.zoom, tile.x, tile.y, access_token
        )
    }

    fn imagery_url(&self, tile: &TilePosition, access_token: &str) -> String {
        format!(
            "{}/styles/v1/mapbox/satellite-v9/tiles/{}/{}/{}?access_token={}",
            self.base_url, tile.zoom, tile.x, tile.y, access_token
        )
    }
}

impl<C: AsyncHttpClient> TerrainSource for MapboxTerrainSource<C> {
    async fn fetch_elevation_pixels(
        &self,
        tile: TilePosition,
        access_token: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        if !self.supports_zoom(tile.zoom) {
            return Err(ProviderError::UnsupportedZoom(tile.zoom));
        }

        let url = self.elevation_url(&tile, access_token);
        let encoded = self.http_client.get(&url).await?;
        let pixels = decode_rgba(tile, &encoded)?;

        debug!(tile = %tile, bytes = pixels.len(), "Elevation raster decoded");
        Ok(pixels)
    }

    async fn fetch_imagery(
        &self,
        tile: TilePosition,
        access_token: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let url = self.imagery_url(&tile, access_token);
        self.http_client.get(&url).await
    }

    fn name(&self) -> &str {
        "MapBox"
    }

    fn max_zoom(&self) -> u8 {
        MAX_ZOOM
    }
}

/// Decodes an encoded raster (PNG, JPEG) into interleaved RGBA bytes.
pub fn decode_rgba(tile: TilePosition, encoded: &[u8]) -> Result<Vec<u8>, ProviderError> {
    image::load_from_memory(encoded)
        .map(|img| img.to_rgba8().into_raw())
        .map_err(|e| ProviderError::DecodeError {
            tile,
            reason: e.to_string(),
        })
}
