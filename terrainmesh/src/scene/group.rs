//! Named group of per-tile meshes and its serializable manifest.

use serde::Serialize;

use super::GridMesh;
use crate::coord::{BoundingBox, TilePosition};

/// Name given to every assembled terrain group.
pub const TERRAIN_GROUP_NAME: &str = "terrain-tile-group";

/// The output of an assembly run: one mesh per tile, in tile order.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainGroup<M> {
    name: String,
    meshes: Vec<M>,
}

impl<M> TerrainGroup<M> {
    pub fn new(meshes: Vec<M>) -> Self {
        Self {
            name: TERRAIN_GROUP_NAME.to_string(),
            meshes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn meshes(&self) -> &[M] {
        &self.meshes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.meshes.iter()
    }

    pub fn into_meshes(self) -> Vec<M> {
        self.meshes
    }
}

impl<'a, M> IntoIterator for &'a TerrainGroup<M> {
    type Item = &'a M;
    type IntoIter = std::slice::Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.meshes.iter()
    }
}

/// Per-tile line of a [`SceneManifest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileManifestEntry {
    /// `zoom/x/y`
    pub key: String,
    pub position: TilePosition,
    pub x_segments: u32,
    pub y_segments: u32,
    pub vertex_count: usize,
    pub texture_bytes: usize,
}

/// JSON-friendly summary of an assembled group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneManifest {
    pub name: String,
    pub bbox: BoundingBox,
    pub render_box_size: f64,
    pub units_per_meter: f64,
    pub tiles: Vec<TileManifestEntry>,
}

impl SceneManifest {
    /// Summarises a group of grid meshes built for `bbox`.
    pub fn from_group(
        group: &TerrainGroup<GridMesh>,
        bbox: BoundingBox,
        render_box_size: f64,
        units_per_meter: f64,
    ) -> Self {
        let tiles = group
            .iter()
            .map(|mesh| TileManifestEntry {
                key: mesh.position.key(),
                position: mesh.position,
                x_segments: mesh.x_segments,
                y_segments: mesh.y_segments,
                vertex_count: mesh.vertex_count(),
                texture_bytes: mesh.texture.len(),
            })
            .collect();

        Self {
            name: group.name().to_string(),
            bbox,
            render_box_size,
            units_per_meter,
            tiles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::GeoPoint;
    use crate::scene::{GridMeshBuilder, MeshRequest};

    fn mesh(x: u32, y: u32) -> GridMesh {
        GridMeshBuilder::new()
            .build_grid(MeshRequest {
                position: TilePosition::new(12, x, y),
                vertices: vec![0.0; 4 * 3],
                x_segments: 1,
                y_segments: 1,
                texture: vec![0; 10],
                clip_planes: Vec::new(),
            })
            .unwrap()
    }

    #[test]
    fn test_group_is_named() {
        let group = TerrainGroup::new(vec![1, 2, 3]);
        assert_eq!(group.name(), "terrain-tile-group");
        assert_eq!(group.len(), 3);
        assert_eq!((&group).into_iter().sum::<i32>(), 6);
        assert_eq!(group.into_meshes(), vec![1, 2, 3]);
    }

    #[test]
    fn test_manifest_serializes_tiles_in_order() {
        let group = TerrainGroup::new(vec![mesh(100, 7), mesh(101, 7)]);
        let bbox = BoundingBox {
            nw: GeoPoint::new(47.0, 7.0),
            se: GeoPoint::new(46.0, 8.0),
        };

        let manifest = SceneManifest::from_group(&group, bbox, 1.0, 0.0001);
        let json = serde_json::to_value(&manifest).unwrap();

        assert_eq!(json["name"], "terrain-tile-group");
        assert_eq!(json["tiles"][0]["key"], "12/100/7");
        assert_eq!(json["tiles"][1]["position"]["x"], 101);
        assert_eq!(json["tiles"][1]["vertex_count"], 4);
        assert_eq!(json["tiles"][1]["texture_bytes"], 10);
        assert_eq!(json["bbox"]["nw"]["lat"], 47.0);
    }
}
