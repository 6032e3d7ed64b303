//! Assembly configuration, phases and errors

use std::fmt;

use thiserror::Error;

use crate::coord::{BoundingBox, TilePosition};
use crate::mesh::MeshError;
use crate::provider::ProviderError;
use crate::scene::SceneError;

use super::AssemblyContext;

/// Default number of tiles processed concurrently in each phase.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default cap on the number of tiles in one run.
pub const DEFAULT_MAX_TILES: usize = 36;

/// Default render box edge length.
pub const DEFAULT_RENDER_BOX_SIZE: f64 = 1.0;

/// Edge length of a `@2x` terrain-RGB raster.
pub const DEFAULT_ELEVATION_DIM: u32 = 512;

/// Tunables of an assembly run.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyOptions {
    /// Attach clip planes bounding the render box to every mesh
    pub clip: bool,
    /// Edge length of the render box all tiles are projected into
    pub render_box_size: f64,
    /// Access token passed to the terrain source
    pub api_token: String,
    /// Tiles in flight per phase; 0 runs every tile at once
    pub concurrency: usize,
    /// Runs enumerating more tiles than this are rejected
    pub max_tiles: usize,
    /// Expected edge length of every elevation raster
    pub elevation_dim: u32,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            clip: false,
            render_box_size: DEFAULT_RENDER_BOX_SIZE,
            api_token: String::new(),
            concurrency: DEFAULT_CONCURRENCY,
            max_tiles: DEFAULT_MAX_TILES,
            elevation_dim: DEFAULT_ELEVATION_DIM,
        }
    }
}

/// Inputs of one assembly run.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyConfig {
    /// Origin latitude in degrees
    pub origin_lat: f64,
    /// Origin longitude in degrees
    pub origin_lon: f64,
    pub zoom: u8,
    /// Distance from the origin to each bounding box corner
    pub radius_km: f64,
    pub options: AssemblyOptions,
}

impl AssemblyConfig {
    /// Creates a configuration with default options.
    pub fn new(origin_lat: f64, origin_lon: f64, zoom: u8, radius_km: f64) -> Self {
        Self {
            origin_lat,
            origin_lon,
            zoom,
            radius_km,
            options: AssemblyOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AssemblyOptions) -> Self {
        self.options = options;
        self
    }

    /// Rejects values the geometry cannot work with.
    pub fn validate(&self) -> Result<(), AssemblyError> {
        let invalid = |reason: String| Err(AssemblyError::InvalidConfig(reason));

        if !self.origin_lat.is_finite() || self.origin_lat.abs() >= 90.0 {
            return invalid(format!("latitude {} out of range", self.origin_lat));
        }
        if !self.origin_lon.is_finite() || self.origin_lon.abs() > 180.0 {
            return invalid(format!("longitude {} out of range", self.origin_lon));
        }
        if !(self.radius_km.is_finite() && self.radius_km > 0.0) {
            return invalid(format!("radius must be positive, got {}", self.radius_km));
        }
        let size = self.options.render_box_size;
        if !(size.is_finite() && size > 0.0) {
            return invalid(format!("render box size must be positive, got {}", size));
        }
        if self.options.elevation_dim < 2 {
            return invalid(format!(
                "elevation rasters need at least 2px, got {}",
                self.options.elevation_dim
            ));
        }
        Ok(())
    }
}

/// The two pool phases of a run, reported with progress updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssemblyPhase {
    /// Fetching, decoding and building tile vertex grids
    Fetch,
    /// Fetching imagery and building meshes from stitched grids
    Build,
}

impl fmt::Display for AssemblyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyPhase::Fetch => write!(f, "fetch"),
            AssemblyPhase::Build => write!(f, "build"),
        }
    }
}

/// Result of planning a run: the per-run context and the tiles to fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyPlan {
    pub context: AssemblyContext,
    /// Row-major tile list
    pub tiles: Vec<TilePosition>,
}

impl AssemblyPlan {
    pub fn bbox(&self) -> &BoundingBox {
        self.context.bbox()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}

/// Errors that abort an assembly run.
///
/// A run either yields a complete group or one of these; partial groups are
/// never returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssemblyError {
    /// Configuration values the geometry cannot use
    #[error("Invalid assembly configuration: {0}")]
    InvalidConfig(String),

    /// Bounding box covers more tiles than allowed
    #[error("Too many tiles: {count} exceeds the limit of {max}; reduce radius or zoom")]
    TooManyTiles { count: usize, max: usize },

    /// Bounding box enumerates to no tiles
    #[error("No tiles cover the requested area")]
    NoTiles,

    /// Fetching or decoding a tile failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Building or stitching a vertex grid failed
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// The mesh builder rejected a tile
    #[error(transparent)]
    Scene(#[from] SceneError),
}
