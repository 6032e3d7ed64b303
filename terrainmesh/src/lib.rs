//! terrainmesh - seamless 3D terrain meshes from slippy-map tiles
//!
//! This library assembles a terrain mesh for a square area around a
//! geographic origin. Every covering tile is fetched independently (a
//! terrain-RGB elevation raster plus satellite imagery), turned into a vertex
//! grid in a shared local coordinate system, and stitched to its south and
//! east neighbors so the per-tile meshes join without cracks.
//!
//! # Modules
//!
//! - [`coord`] - geodesy and tile index math
//! - [`elevation`] - terrain-RGB decoding
//! - [`projection`] - local planar projection into the render box
//! - [`mesh`] - per-tile vertex grids and seam stitching
//! - [`pool`] - bounded, order-preserving async task pool
//! - [`provider`] - tile sources (MapBox)
//! - [`scene`] - mesh-building collaborator and output group
//! - [`assembly`] - end-to-end orchestration
//! - [`config`] - `~/.terrainmesh/config.ini`
//! - [`logging`] - tracing setup

pub mod assembly;
pub mod config;
pub mod coord;
pub mod elevation;
pub mod logging;
pub mod mesh;
pub mod pool;
pub mod projection;
pub mod provider;
pub mod scene;

/// Version of the terrainmesh library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
