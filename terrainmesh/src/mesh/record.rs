//! Tile vertex records and the per-tile vertex builder.

use crate::assembly::AssemblyContext;
use crate::coord::{tile_pixel_to_lon_lat, TilePosition};
use crate::elevation::ElevationGrid;

use super::MeshError;

/// Floats per vertex (X, Y, Z).
pub const FLOATS_PER_VERTEX: usize = 3;

/// Flat XYZ vertex grid for one tile.
///
/// Vertices are stored row-major, top row first, which is the layout a grid
/// mesh with `x_segments × y_segments` quads expects. A freshly built record
/// is `dim × dim` vertices with `dim - 1` segments on each axis; seam
/// stitching adds at most one row and one column.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRecord {
    /// Tile this grid was built from
    pub position: TilePosition,
    /// Flattened XYZ triples
    pub vertices: Vec<f32>,
    /// Quads along X
    pub x_segments: u32,
    /// Quads along Y
    pub y_segments: u32,
    /// Edge length of the source raster
    pub dim: u32,
}

impl TileRecord {
    /// Wraps a `dim × dim` vertex buffer.
    pub fn new(position: TilePosition, vertices: Vec<f32>, dim: u32) -> Self {
        Self {
            position,
            vertices,
            x_segments: dim.saturating_sub(1),
            y_segments: dim.saturating_sub(1),
            dim,
        }
    }

    /// Number of vertices in the buffer.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    /// Vertices per row of the grid.
    #[inline]
    pub fn columns(&self) -> usize {
        self.x_segments as usize + 1
    }

    /// Rows of the grid.
    #[inline]
    pub fn rows(&self) -> usize {
        self.y_segments as usize + 1
    }

    /// XYZ of the vertex at (`row`, `col`).
    pub fn vertex(&self, row: usize, col: usize) -> Option<[f32; 3]> {
        let start = (row * self.columns() + col) * FLOATS_PER_VERTEX;
        self.vertices
            .get(start..start + FLOATS_PER_VERTEX)
            .map(|v| [v[0], v[1], v[2]])
    }

    /// Whether the buffer holds exactly one vertex per grid point.
    pub fn is_consistent(&self) -> bool {
        self.vertices.len() % FLOATS_PER_VERTEX == 0
            && self.vertex_count() == self.columns() * self.rows()
    }
}

/// Builds the vertex grid for one tile.
///
/// Each raster pixel is located geographically (inverse Mercator at pixel
/// resolution), projected into the render box, and lifted by its elevation
/// scaled with the projection's `units_per_meter`.
pub fn build_tile_record(
    position: TilePosition,
    elevations: &ElevationGrid,
    ctx: &AssemblyContext,
) -> Result<TileRecord, MeshError> {
    let dim = elevations.dimension()?;
    if dim != ctx.elevation_dim() {
        return Err(MeshError::UnexpectedDimension {
            position,
            expected: ctx.elevation_dim(),
            actual: dim,
        });
    }

    let projection = ctx.projection();
    let scale = projection.units_per_meter();
    let mut vertices = Vec::with_capacity(dim as usize * dim as usize * FLOATS_PER_VERTEX);

    for (index, elevation) in elevations.as_slice().iter().enumerate() {
        let row = index as u32 / dim;
        let col = index as u32 % dim;

        let point = tile_pixel_to_lon_lat(&position, row, col, dim);
        let (x, y) = projection.lon_lat_to_xy(point);
        vertices.extend_from_slice(&[x as f32, y as f32, (elevation * scale) as f32]);
    }

    Ok(TileRecord::new(position, vertices, dim))
}
