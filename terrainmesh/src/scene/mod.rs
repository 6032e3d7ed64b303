//! Mesh-building collaborator.
//!
//! The assembler hands every stitched tile to a [`MeshBuilder`] together with
//! its imagery bytes and the optional clip planes, and collects the built
//! meshes into a [`TerrainGroup`]. The crate ships [`GridMeshBuilder`], which
//! produces a renderer-agnostic indexed grid ([`GridMesh`]); front ends that
//! drive a real scene graph implement the trait themselves.
//!
//! # Grid layout
//!
//! Vertices arrive row-major, top row first, `(x_segments + 1) × (y_segments + 1)`
//! of them. Indices and UVs follow the usual plane-geometry convention:
//!
//! ```text
//!  a ─── d        a = ix     + (x_segments + 1) * iy
//!  │ ╲   │        b = ix     + (x_segments + 1) * (iy + 1)
//!  │   ╲ │        c = ix + 1 + (x_segments + 1) * (iy + 1)
//!  b ─── c        d = ix + 1 + (x_segments + 1) * iy
//!                 faces: (a, b, d) and (b, c, d)
//! ```

mod grid;
mod group;

pub use grid::{GridMesh, GridMeshBuilder};
pub use group::{SceneManifest, TerrainGroup, TileManifestEntry, TERRAIN_GROUP_NAME};

use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use crate::coord::TilePosition;
use crate::mesh::TileRecord;

/// Errors raised by a mesh builder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// The vertex buffer does not match the declared segment counts.
    #[error("Tile {position}: {actual} vertices for a {columns}×{rows} grid")]
    VertexCountMismatch {
        position: TilePosition,
        columns: u32,
        rows: u32,
        actual: usize,
    },

    /// A grid needs at least one segment on each axis.
    #[error("Tile {position} has a degenerate {x_segments}×{y_segments} grid")]
    DegenerateGrid {
        position: TilePosition,
        x_segments: u32,
        y_segments: u32,
    },
}

/// A clipping plane `normal · p + constant >= 0`, in render-box units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClipPlane {
    pub normal: [f32; 3],
    pub constant: f32,
}

impl ClipPlane {
    pub const fn new(normal: [f32; 3], constant: f32) -> Self {
        Self { normal, constant }
    }

    /// Signed distance of `point` from the plane; negative means clipped.
    pub fn distance_to(&self, point: [f32; 3]) -> f32 {
        self.normal[0] * point[0]
            + self.normal[1] * point[1]
            + self.normal[2] * point[2]
            + self.constant
    }

    /// The four planes bounding the render box on X and Y.
    ///
    /// Stitched tiles overhang the box at the batch's south and east edges;
    /// these planes cut everything outside `[-s/2, s/2]` on both axes.
    pub fn render_box(render_box_size: f64) -> Vec<ClipPlane> {
        let half = (render_box_size / 2.0) as f32;
        vec![
            ClipPlane::new([1.0, 0.0, 0.0], half),
            ClipPlane::new([-1.0, 0.0, 0.0], half),
            ClipPlane::new([0.0, 1.0, 0.0], half),
            ClipPlane::new([0.0, -1.0, 0.0], half),
        ]
    }
}

/// Everything a builder needs to turn one tile into a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRequest {
    pub position: TilePosition,
    /// Flattened XYZ triples, row-major
    pub vertices: Vec<f32>,
    pub x_segments: u32,
    pub y_segments: u32,
    /// Encoded imagery used as the tile's texture
    pub texture: Vec<u8>,
    /// Empty unless clipping is enabled for the run
    pub clip_planes: Vec<ClipPlane>,
}

impl MeshRequest {
    /// Builds a request from a (stitched) tile record.
    pub fn from_record(record: TileRecord, texture: Vec<u8>, clip_planes: Vec<ClipPlane>) -> Self {
        Self {
            position: record.position,
            vertices: record.vertices,
            x_segments: record.x_segments,
            y_segments: record.y_segments,
            texture,
            clip_planes,
        }
    }
}

/// Builds a renderable mesh from a tile's vertex grid.
pub trait MeshBuilder: Send + Sync {
    /// Mesh type produced by this builder.
    type Mesh: Send;

    /// Builds the mesh for one tile.
    fn build(
        &self,
        request: MeshRequest,
    ) -> impl Future<Output = Result<Self::Mesh, SceneError>> + Send;
}
