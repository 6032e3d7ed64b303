//! Tile vertex grids and seam stitching.
//!
//! [`build_tile_record`] turns one tile's elevation raster into a flat XYZ
//! vertex buffer in render-box units. [`stitch_seams`] then closes the gaps
//! between adjacent tiles of a batch so that the per-tile meshes join
//! without cracks.
//!
//! ```text
//! ElevationGrid ──► build_tile_record ──► TileRecord (dim × dim)
//!                                              │
//!                        stitch_seams(batch) ◄─┘
//!                                              │
//!                                              ▼
//!                                   TileRecord (≤ (dim+1) × (dim+1))
//! ```

mod record;
mod seams;

pub use record::{build_tile_record, TileRecord, FLOATS_PER_VERTEX};
pub use seams::{append_south_east_corner, append_south_row, insert_east_column, stitch_seams};

use thiserror::Error;

use crate::coord::TilePosition;
use crate::elevation::ElevationError;

/// Errors raised while building or stitching tile grids.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// Elevation raster has an unusable shape.
    #[error("Invalid elevation raster: {0}")]
    Elevation(#[from] ElevationError),

    /// Raster size differs from the size configured for the run.
    #[error("Tile {position} has a {actual}px raster, expected {expected}px")]
    UnexpectedDimension {
        position: TilePosition,
        expected: u32,
        actual: u32,
    },

    /// A record handed to the stitcher is not a plain `dim × dim` grid.
    #[error("Tile {position} has {actual} vertices, expected {expected}")]
    IncompleteRecord {
        position: TilePosition,
        expected: usize,
        actual: usize,
    },

    /// Two adjacent tiles were built from rasters of different sizes.
    #[error(
        "Cannot stitch tile {base} ({base_dim}px) to neighbor {neighbor} ({neighbor_dim}px)"
    )]
    NeighborDimensionMismatch {
        base: TilePosition,
        base_dim: u32,
        neighbor: TilePosition,
        neighbor_dim: u32,
    },
}
