//! Terrain data provider abstraction
//!
//! This module provides the traits and implementations used to retrieve the
//! raw inputs of an assembly run: the terrain-RGB elevation raster and the
//! imagery texture for each tile.
//!
//! Network access is isolated behind [`AsyncHttpClient`], an injected
//! `url → bytes` fetcher, so sources can be exercised without a network:
//!
//! ```ignore
//! use terrainmesh::provider::{AsyncReqwestClient, MapboxTerrainSource};
//!
//! let http_client = AsyncReqwestClient::new()?;
//! let source = MapboxTerrainSource::new(http_client);
//! ```

mod http;
mod mapbox;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use mapbox::{decode_rgba, MapboxTerrainSource};
pub use types::{ProviderError, TerrainSource};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
