//! Assemble command - build the terrain and write it to disk.

use std::path::PathBuf;
use std::time::Instant;

use terrainmesh::assembly::TerrainAssembler;
use terrainmesh::scene::{GridMeshBuilder, SceneManifest};
use tracing::info;

use super::common::{mapbox_source, require_token, resolve_assembly, AreaArgs, TuningArgs};
use crate::error::CliError;
use crate::output::write_scene;
use crate::progress::PhaseBars;
use crate::runner::CliRunner;

/// Arguments for the assemble command.
pub struct AssembleArgs {
    pub area: AreaArgs,
    pub tuning: TuningArgs,
    pub output: PathBuf,
}

/// Run the assemble command.
pub fn run(runner: &CliRunner, args: AssembleArgs) -> Result<(), CliError> {
    runner.log_startup("assemble");
    let config = runner.config();

    let assembly = resolve_assembly(&args.area, &args.tuning, config);
    require_token(&assembly)?;

    let source = mapbox_source(&args.tuning, config)?;
    let assembler = TerrainAssembler::new(source, GridMeshBuilder::new(), assembly);
    let plan = assembler.plan()?;

    println!("Assembling terrain for:");
    println!("  Location: {}, {}", args.area.lat, args.area.lon);
    println!("  Zoom: {}", args.area.zoom);
    println!("  Radius: {} km", args.area.radius);
    println!("  Tiles: {}", plan.tile_count());
    println!();

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    let bars = PhaseBars::new(plan.tile_count());
    let start = Instant::now();

    let group = runtime
        .block_on(assembler.assemble(|phase, progress| bars.update(phase, progress)))
        .inspect_err(|_| bars.abandon())?;

    let elapsed = start.elapsed();
    info!(tiles = group.len(), elapsed_ms = elapsed.as_millis() as u64, "Assembly complete");
    println!();
    println!("Assembled {} tiles in {:.2}s", group.len(), elapsed.as_secs_f64());

    let projection = plan.context.projection();
    let manifest = SceneManifest::from_group(
        &group,
        *plan.bbox(),
        projection.render_box_size(),
        projection.units_per_meter(),
    );
    let files = write_scene(&args.output, &group, &manifest)?;

    println!("Wrote:");
    println!("  {}", files.obj.display());
    println!("  {}", files.mtl.display());
    println!("  {}", files.manifest.display());
    println!(
        "  {} ({} textures)",
        files.texture_dir.display(),
        files.textures_written
    );

    Ok(())
}
