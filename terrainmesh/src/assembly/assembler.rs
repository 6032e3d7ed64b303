//! Terrain assembler implementation

use tracing::{debug, info, warn};

use crate::coord::{count_tiles, enumerate_tiles, BoundingBox, TilePosition};
use crate::elevation::decode_elevations;
use crate::mesh::{build_tile_record, stitch_seams, TileRecord};
use crate::pool::{run_bounded, PoolProgress};
use crate::provider::{ProviderError, TerrainSource};
use crate::scene::{ClipPlane, MeshBuilder, MeshRequest, TerrainGroup};

use super::{AssemblyConfig, AssemblyContext, AssemblyError, AssemblyPhase, AssemblyPlan};

/// Assembles a seamless terrain group from independently fetched tiles.
///
/// Generic over the terrain source and the mesh builder so that either can
/// be replaced in tests or by a front end with its own scene graph.
///
/// # Example
///
/// ```ignore
/// use terrainmesh::assembly::{AssemblyConfig, TerrainAssembler};
/// use terrainmesh::provider::{AsyncReqwestClient, MapboxTerrainSource};
/// use terrainmesh::scene::GridMeshBuilder;
///
/// let source = MapboxTerrainSource::new(AsyncReqwestClient::new()?);
/// let config = AssemblyConfig::new(46.55, 7.98, 13, 3.0);
/// let assembler = TerrainAssembler::new(source, GridMeshBuilder::new(), config);
///
/// let group = assembler.assemble(|phase, progress| {
///     println!("{}: {}/{}", phase, progress.completed, progress.total);
/// }).await?;
/// ```
pub struct TerrainAssembler<S: TerrainSource, B: MeshBuilder> {
    source: S,
    builder: B,
    config: AssemblyConfig,
}

impl<S: TerrainSource, B: MeshBuilder> TerrainAssembler<S, B> {
    pub fn new(source: S, builder: B, config: AssemblyConfig) -> Self {
        Self {
            source,
            builder,
            config,
        }
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Computes the bounding box and tile list and checks the run limits.
    ///
    /// Nothing is fetched. [`assemble`](Self::assemble) calls this first, so
    /// every error returned here is raised before any network traffic.
    pub fn plan(&self) -> Result<AssemblyPlan, AssemblyError> {
        let config = &self.config;
        config.validate()?;

        if !self.source.supports_zoom(config.zoom) {
            return Err(ProviderError::UnsupportedZoom(config.zoom).into());
        }

        let context = AssemblyContext::new(
            config.origin_lat,
            config.origin_lon,
            config.radius_km,
            config.options.render_box_size,
            config.options.elevation_dim,
        );
        let tiles = tiles_within_limit(context.bbox(), config.zoom, config.options.max_tiles)?;

        debug!(
            zoom = config.zoom,
            tiles = tiles.len(),
            nw_lat = context.bbox().nw.lat,
            nw_lon = context.bbox().nw.lon,
            se_lat = context.bbox().se.lat,
            se_lon = context.bbox().se.lon,
            "Assembly planned"
        );
        Ok(AssemblyPlan { context, tiles })
    }

    /// Runs the whole assembly.
    ///
    /// `on_progress` is called once per completed tile in each phase.
    pub async fn assemble<P>(
        &self,
        mut on_progress: P,
    ) -> Result<TerrainGroup<B::Mesh>, AssemblyError>
    where
        P: FnMut(AssemblyPhase, PoolProgress),
    {
        let AssemblyPlan { context, tiles } = self.plan()?;
        let concurrency = self.config.options.concurrency;
        let ctx = &context;

        info!(
            source = self.source.name(),
            tiles = tiles.len(),
            concurrency,
            "Fetching elevation tiles"
        );
        let mut records = run_bounded(
            tiles,
            concurrency,
            move |tile, _| self.fetch_tile(tile, ctx),
            |progress| on_progress(AssemblyPhase::Fetch, progress),
        )
        .await
        .inspect_err(|e| warn!(error = %e, "Elevation phase failed"))?;

        records.sort_by(|a, b| a.position.cmp(&b.position));
        let stitched = stitch_seams(records)?;

        let clip_planes = if self.config.options.clip {
            ClipPlane::render_box(self.config.options.render_box_size)
        } else {
            Vec::new()
        };
        let planes = &clip_planes;

        info!(tiles = stitched.len(), clip = !planes.is_empty(), "Building meshes");
        let meshes = run_bounded(
            stitched,
            concurrency,
            move |record, _| self.build_mesh(record, planes.clone()),
            |progress| on_progress(AssemblyPhase::Build, progress),
        )
        .await
        .inspect_err(|e| warn!(error = %e, "Mesh phase failed"))?;

        info!(meshes = meshes.len(), "Terrain assembled");
        Ok(TerrainGroup::new(meshes))
    }

    async fn fetch_tile(
        &self,
        tile: TilePosition,
        ctx: &AssemblyContext,
    ) -> Result<TileRecord, AssemblyError> {
        let token = &self.config.options.api_token;
        let pixels = self.source.fetch_elevation_pixels(tile, token).await?;
        let elevations = decode_elevations(&pixels);
        let record = build_tile_record(tile, &elevations, ctx)?;

        debug!(tile = %tile, vertices = record.vertex_count(), "Tile grid built");
        Ok(record)
    }

    async fn build_mesh(
        &self,
        record: TileRecord,
        clip_planes: Vec<ClipPlane>,
    ) -> Result<B::Mesh, AssemblyError> {
        let token = &self.config.options.api_token;
        let texture = self.source.fetch_imagery(record.position, token).await?;

        debug!(
            tile = %record.position,
            x_segments = record.x_segments,
            y_segments = record.y_segments,
            texture_bytes = texture.len(),
            "Building mesh"
        );
        let request = MeshRequest::from_record(record, texture, clip_planes);
        Ok(self.builder.build(request).await?)
    }
}

/// Enumerates the tiles of `bbox` once their count is known to fit `max_tiles`.
///
/// The count comes from the corner indices, so an oversized box is rejected
/// without allocating its tile list. An overflowing count is reported as
/// `usize::MAX`.
fn tiles_within_limit(
    bbox: &BoundingBox,
    zoom: u8,
    max_tiles: usize,
) -> Result<Vec<TilePosition>, AssemblyError> {
    let count = count_tiles(bbox, zoom).unwrap_or(usize::MAX);
    if count == 0 {
        return Err(AssemblyError::NoTiles);
    }
    if count > max_tiles {
        return Err(AssemblyError::TooManyTiles {
            count,
            max: max_tiles,
        });
    }
    Ok(enumerate_tiles(bbox, zoom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::AssemblyOptions;
    use crate::coord::GeoPoint;
    use crate::scene::{GridMesh, GridMeshBuilder};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves flat sea-level rasters and records how often it was asked.
    struct FlatSource {
        dim: u32,
        fail_on: Option<TilePosition>,
        elevation_calls: AtomicUsize,
        imagery_calls: AtomicUsize,
    }

    impl FlatSource {
        fn new(dim: u32) -> Self {
            Self {
                dim,
                fail_on: None,
                elevation_calls: AtomicUsize::new(0),
                imagery_calls: AtomicUsize::new(0),
            }
        }
    }

    impl TerrainSource for FlatSource {
        async fn fetch_elevation_pixels(
            &self,
            tile: TilePosition,
            _access_token: &str,
        ) -> Result<Vec<u8>, ProviderError> {
            self.elevation_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(tile) {
                return Err(ProviderError::HttpStatus {
                    status: 404,
                    url: tile.key(),
                });
            }
            // (1, 134, 160) encodes 0 m
            Ok([1, 134, 160, 255].repeat((self.dim * self.dim) as usize))
        }

        async fn fetch_imagery(
            &self,
            _tile: TilePosition,
            _access_token: &str,
        ) -> Result<Vec<u8>, ProviderError> {
            self.imagery_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![0xFF, 0xD8])
        }

        fn name(&self) -> &str {
            "flat"
        }

        fn max_zoom(&self) -> u8 {
            15
        }
    }

    fn config(zoom: u8, radius_km: f64) -> AssemblyConfig {
        AssemblyConfig::new(46.55, 7.98, zoom, radius_km).with_options(AssemblyOptions {
            elevation_dim: 4,
            ..Default::default()
        })
    }

    fn assembler(config: AssemblyConfig) -> TerrainAssembler<FlatSource, GridMeshBuilder> {
        TerrainAssembler::new(FlatSource::new(4), GridMeshBuilder::new(), config)
    }

    #[test]
    fn test_plan_lists_enumerated_tiles() {
        let assembler = assembler(config(13, 3.0));
        let plan = assembler.plan().unwrap();

        assert_eq!(plan.tiles, enumerate_tiles(plan.bbox(), 13));
        assert!(plan.tile_count() >= 1);
        assert_eq!(assembler.source().elevation_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_plan_rejects_unsupported_zoom() {
        let result = assembler(config(18, 1.0)).plan();
        assert_eq!(
            result,
            Err(AssemblyError::Provider(ProviderError::UnsupportedZoom(18)))
        );
    }

    #[tokio::test]
    async fn test_too_many_tiles_fails_before_fetch() {
        let assembler = assembler(config(15, 40.0));

        let result = assembler.assemble(|_, _| {}).await;

        assert!(matches!(result, Err(AssemblyError::TooManyTiles { max: 36, .. })));
        assert_eq!(assembler.source().elevation_calls.load(Ordering::SeqCst), 0);
        assert_eq!(assembler.source().imagery_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_oversized_area_is_rejected_from_corner_indices() {
        let result = assembler(AssemblyConfig::new(10.0, 0.0, 15, 2500.0)).plan();

        match result {
            Err(AssemblyError::TooManyTiles { count, max }) => {
                assert_eq!(max, 36);
                assert!(count > 8_000_000);
            }
            other => panic!("expected TooManyTiles, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_box_has_no_tiles() {
        let bbox = BoundingBox {
            nw: GeoPoint::new(46.0, 8.0),
            se: GeoPoint::new(47.0, 7.0),
        };
        assert_eq!(tiles_within_limit(&bbox, 13, 36), Err(AssemblyError::NoTiles));
    }

    #[test]
    fn test_tile_limit_is_inclusive() {
        let bbox = *AssemblyContext::new(46.55, 7.98, 3.0, 1.0, 4).bbox();
        let count = enumerate_tiles(&bbox, 13).len();

        assert_eq!(tiles_within_limit(&bbox, 13, count).unwrap().len(), count);
        assert_eq!(
            tiles_within_limit(&bbox, 13, count - 1),
            Err(AssemblyError::TooManyTiles {
                count,
                max: count - 1,
            })
        );
    }

    #[tokio::test]
    async fn test_assemble_builds_one_mesh_per_tile_in_key_order() {
        let assembler = assembler(config(13, 3.0));
        let plan = assembler.plan().unwrap();
        let mut reports: Vec<(AssemblyPhase, PoolProgress)> = Vec::new();

        let group = assembler
            .assemble(|phase, progress| reports.push((phase, progress)))
            .await
            .unwrap();

        let mut expected: Vec<_> = plan.tiles.clone();
        expected.sort();
        let positions: Vec<_> = group.iter().map(|m: &GridMesh| m.position).collect();
        assert_eq!(positions, expected);
        assert_eq!(group.name(), "terrain-tile-group");

        for mesh in &group {
            let grid = (mesh.x_segments as usize + 1) * (mesh.y_segments as usize + 1);
            assert_eq!(mesh.vertex_count(), grid);
            assert!(mesh.clip_planes.is_empty());
        }

        let n = plan.tile_count();
        let fetch = reports.iter().filter(|(p, _)| *p == AssemblyPhase::Fetch).count();
        let build = reports.iter().filter(|(p, _)| *p == AssemblyPhase::Build).count();
        assert_eq!((fetch, build), (n, n));
        assert_eq!(assembler.source().imagery_calls.load(Ordering::SeqCst), n);
    }

    #[tokio::test]
    async fn test_clip_option_attaches_planes() {
        let mut cfg = config(13, 3.0);
        cfg.options.clip = true;
        cfg.options.render_box_size = 2.0;

        let group = assembler(cfg).assemble(|_, _| {}).await.unwrap();

        for mesh in &group {
            assert_eq!(mesh.clip_planes, ClipPlane::render_box(2.0));
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_run() {
        let cfg = config(13, 3.0);
        let mut source = FlatSource::new(4);
        let first = TerrainAssembler::new(FlatSource::new(4), GridMeshBuilder::new(), cfg.clone())
            .plan()
            .unwrap()
            .tiles[0];
        source.fail_on = Some(first);

        let assembler = TerrainAssembler::new(source, GridMeshBuilder::new(), cfg);
        let result = assembler.assemble(|_, _| {}).await;

        assert!(matches!(
            result,
            Err(AssemblyError::Provider(ProviderError::HttpStatus { status: 404, .. }))
        ));
        assert_eq!(assembler.source().imagery_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_raster_size_mismatch_is_reported() {
        let mut cfg = config(13, 3.0);
        cfg.options.elevation_dim = 8;

        let result = assembler(cfg).assemble(|_, _| {}).await;

        assert!(matches!(
            result,
            Err(AssemblyError::Mesh(crate::mesh::MeshError::UnexpectedDimension {
                expected: 8,
                actual: 4,
                ..
            }))
        ));
    }
}
