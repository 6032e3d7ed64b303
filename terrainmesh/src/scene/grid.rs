//! Default mesh builder producing indexed grid meshes.

use serde::Serialize;
use tracing::trace;

use super::{ClipPlane, MeshBuilder, MeshRequest, SceneError};
use crate::coord::TilePosition;
use crate::mesh::FLOATS_PER_VERTEX;

/// Indexed triangle grid for one tile.
///
/// `uvs` map the top-left vertex to `(0, 1)` and the bottom-right one to
/// `(1, 0)` so an image drawn top row first lands the right way up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridMesh {
    pub position: TilePosition,
    pub x_segments: u32,
    pub y_segments: u32,
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    pub uvs: Vec<f32>,
    #[serde(skip)]
    pub texture: Vec<u8>,
    pub clip_planes: Vec<ClipPlane>,
}

impl GridMesh {
    /// Number of vertices in the grid.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    /// Number of triangles in the grid.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Builds [`GridMesh`] values; holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridMeshBuilder;

impl GridMeshBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core of [`MeshBuilder::build`].
    pub fn build_grid(&self, request: MeshRequest) -> Result<GridMesh, SceneError> {
        let MeshRequest {
            position,
            vertices,
            x_segments,
            y_segments,
            texture,
            clip_planes,
        } = request;

        if x_segments == 0 || y_segments == 0 {
            return Err(SceneError::DegenerateGrid {
                position,
                x_segments,
                y_segments,
            });
        }

        let columns = x_segments + 1;
        let rows = y_segments + 1;
        let expected = columns as usize * rows as usize * FLOATS_PER_VERTEX;
        if vertices.len() != expected {
            return Err(SceneError::VertexCountMismatch {
                position,
                columns,
                rows,
                actual: vertices.len() / FLOATS_PER_VERTEX,
            });
        }

        let indices = grid_indices(x_segments, y_segments);
        let uvs = grid_uvs(x_segments, y_segments);
        trace!(
            tile = %position,
            vertices = expected / FLOATS_PER_VERTEX,
            triangles = indices.len() / 3,
            "Grid mesh built"
        );

        Ok(GridMesh {
            position,
            x_segments,
            y_segments,
            vertices,
            indices,
            uvs,
            texture,
            clip_planes,
        })
    }
}

impl MeshBuilder for GridMeshBuilder {
    type Mesh = GridMesh;

    async fn build(&self, request: MeshRequest) -> Result<GridMesh, SceneError> {
        self.build_grid(request)
    }
}

fn grid_indices(x_segments: u32, y_segments: u32) -> Vec<u32> {
    let stride = x_segments + 1;
    let mut indices = Vec::with_capacity(x_segments as usize * y_segments as usize * 6);

    for iy in 0..y_segments {
        for ix in 0..x_segments {
            let a = ix + stride * iy;
            let b = ix + stride * (iy + 1);
            let c = ix + 1 + stride * (iy + 1);
            let d = ix + 1 + stride * iy;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    indices
}

fn grid_uvs(x_segments: u32, y_segments: u32) -> Vec<f32> {
    let mut uvs = Vec::with_capacity((x_segments as usize + 1) * (y_segments as usize + 1) * 2);

    for iy in 0..=y_segments {
        let v = 1.0 - iy as f32 / y_segments as f32;
        for ix in 0..=x_segments {
            uvs.push(ix as f32 / x_segments as f32);
            uvs.push(v);
        }
    }
    uvs
}
