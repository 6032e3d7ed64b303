//! Per-run context shared read-only by every assembly stage.

use crate::coord::{bounding_box_from_origin, BoundingBox};
use crate::projection::Projection;

/// Bounding box, projection and raster size for one assembly run.
///
/// Built once from the run configuration and then passed by reference to
/// the vertex builder and the mesh collaborator. Nothing mutates it after
/// construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblyContext {
    bbox: BoundingBox,
    projection: Projection,
    elevation_dim: u32,
}

impl AssemblyContext {
    /// Builds the context for an origin (degrees) and radius (km).
    pub fn new(
        origin_lat: f64,
        origin_lon: f64,
        radius_km: f64,
        render_box_size: f64,
        elevation_dim: u32,
    ) -> Self {
        let bbox = bounding_box_from_origin(origin_lat, origin_lon, radius_km);
        Self {
            bbox,
            projection: Projection::new(bbox, radius_km, render_box_size),
            elevation_dim,
        }
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Edge length, in pixels, of every elevation raster in this run.
    pub fn elevation_dim(&self) -> u32 {
        self.elevation_dim
    }
}
