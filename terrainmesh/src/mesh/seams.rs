//! Seam stitching between adjacent tile grids.
//!
//! Tiles are built independently, so neighbouring grids never share their
//! border vertices and a gap opens between them. Each tile is closed against
//! its south, east and south-east neighbours by borrowing their first row,
//! first column and first vertex:
//!
//! ```text
//!   b b b │ e        b = base tile
//!   b b b │ e        e = east neighbour, first column
//!   b b b │ e        s = south neighbour, top row
//!   ──────┼──        c = south-east neighbour, top-left vertex
//!   s s s │ c
//! ```
//!
//! Joins happen in that order: the south row is appended first, the east
//! column is then inserted at the end of every original row, and the corner
//! is appended last. Neighbours are always read from their unstitched
//! buffers, so the result does not depend on the order of the batch.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::coord::TilePosition;

use super::record::{TileRecord, FLOATS_PER_VERTEX};
use super::MeshError;

/// Stitches every tile in the batch against its neighbours in the batch.
///
/// Tiles outside the batch are never considered, so tiles on the south or
/// east edge of the batch keep their segment count on that side.
pub fn stitch_seams(tiles: Vec<TileRecord>) -> Result<Vec<TileRecord>, MeshError> {
    if tiles.len() < 2 {
        return Ok(tiles);
    }

    if let Some(tile) = tiles.iter().find(|t| !is_unstitched_grid(t)) {
        return Err(MeshError::IncompleteRecord {
            position: tile.position,
            expected: tile.dim as usize * tile.dim as usize,
            actual: tile.vertex_count(),
        });
    }

    let index: HashMap<TilePosition, usize> = tiles
        .iter()
        .enumerate()
        .map(|(i, tile)| (tile.position, i))
        .collect();
    let lookup = |position: TilePosition| index.get(&position).map(|&i| &tiles[i]);

    let stitched = tiles
        .iter()
        .map(|base| stitch_tile(base, &lookup))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(tiles = stitched.len(), "Seams stitched");
    Ok(stitched)
}

fn stitch_tile<'a>(
    base: &TileRecord,
    lookup: &impl Fn(TilePosition) -> Option<&'a TileRecord>,
) -> Result<TileRecord, MeshError> {
    let south = lookup(base.position.south());
    let east = lookup(base.position.east());
    let south_east = lookup(base.position.south_east());

    for neighbor in [south, east, south_east].into_iter().flatten() {
        check_dimensions(base, neighbor)?;
    }

    let mut record = base.clone();
    if let Some(south) = south {
        record = append_south_row(&record, south);
    }
    if let Some(east) = east {
        record = insert_east_column(&record, east);
    }
    // The corner only exists once both the south row and east column joined.
    if south.is_some() && east.is_some() {
        record = match south_east {
            Some(corner) => append_south_east_corner(&record, corner),
            None => fill_south_east_corner(&record),
        };
    }

    trace!(
        tile = %base.position,
        south = south.is_some(),
        east = east.is_some(),
        south_east = south_east.is_some(),
        x_segments = record.x_segments,
        y_segments = record.y_segments,
        "Tile stitched"
    );
    Ok(record)
}

fn is_unstitched_grid(tile: &TileRecord) -> bool {
    let dim = tile.dim as usize;
    tile.vertices.len() == dim * dim * FLOATS_PER_VERTEX && tile.columns() == dim
}

fn check_dimensions(base: &TileRecord, neighbor: &TileRecord) -> Result<(), MeshError> {
    if base.dim != neighbor.dim {
        return Err(MeshError::NeighborDimensionMismatch {
            base: base.position,
            base_dim: base.dim,
            neighbor: neighbor.position,
            neighbor_dim: neighbor.dim,
        });
    }
    Ok(())
}

/// Appends the south neighbour's top row below the base grid.
pub fn append_south_row(base: &TileRecord, south: &TileRecord) -> TileRecord {
    let row_len = base.dim as usize * FLOATS_PER_VERTEX;

    let mut vertices = Vec::with_capacity(base.vertices.len() + row_len);
    vertices.extend_from_slice(&base.vertices);
    vertices.extend_from_slice(&south.vertices[..row_len]);

    TileRecord {
        vertices,
        y_segments: base.y_segments + 1,
        ..base.clone()
    }
}

/// Inserts the east neighbour's first column after each of the base's
/// original `dim` rows.
///
/// Rows are copied at the base's current width, so a south row appended
/// earlier is carried over unchanged (it has no east vertex until the
/// corner is added).
pub fn insert_east_column(base: &TileRecord, east: &TileRecord) -> TileRecord {
    let row_len = base.columns() * FLOATS_PER_VERTEX;
    let east_row_len = east.columns() * FLOATS_PER_VERTEX;

    let mut vertices =
        Vec::with_capacity(base.vertices.len() + base.dim as usize * FLOATS_PER_VERTEX);
    for (row, chunk) in base.vertices.chunks(row_len).enumerate() {
        vertices.extend_from_slice(chunk);
        if row < base.dim as usize {
            let start = row * east_row_len;
            vertices.extend_from_slice(&east.vertices[start..start + FLOATS_PER_VERTEX]);
        }
    }

    TileRecord {
        vertices,
        x_segments: base.x_segments + 1,
        ..base.clone()
    }
}

/// Appends the south-east neighbour's top-left vertex as the final corner.
pub fn append_south_east_corner(base: &TileRecord, corner: &TileRecord) -> TileRecord {
    let mut vertices = Vec::with_capacity(base.vertices.len() + FLOATS_PER_VERTEX);
    vertices.extend_from_slice(&base.vertices);
    vertices.extend_from_slice(&corner.vertices[..FLOATS_PER_VERTEX]);

    TileRecord {
        vertices,
        ..base.clone()
    }
}

/// Closes the corner gap when the south-east tile is not in the batch by
/// repeating the last vertex of the appended south row.
fn fill_south_east_corner(base: &TileRecord) -> TileRecord {
    let mut vertices = base.vertices.clone();
    let last = vertices.len() - FLOATS_PER_VERTEX;
    vertices.extend_from_within(last..);

    TileRecord {
        vertices,
        ..base.clone()
    }
}
