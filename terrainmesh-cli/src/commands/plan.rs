//! Plan command - show the area and tiles an assembly would cover.

use terrainmesh::assembly::TerrainAssembler;
use terrainmesh::scene::GridMeshBuilder;

use super::common::{mapbox_source, resolve_assembly, AreaArgs, TuningArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the plan command.
///
/// Nothing is downloaded, so no access token is needed.
pub fn run(runner: &CliRunner, area: AreaArgs, tuning: TuningArgs) -> Result<(), CliError> {
    runner.log_startup("plan");
    let config = runner.config();

    let assembly = resolve_assembly(&area, &tuning, config);
    let source = mapbox_source(&tuning, config)?;
    let assembler = TerrainAssembler::new(source, GridMeshBuilder::new(), assembly);
    let plan = assembler.plan()?;

    let bbox = plan.bbox();
    let projection = plan.context.projection();

    println!("Area:");
    println!("  Origin: {}, {}", area.lat, area.lon);
    println!("  Radius: {} km", area.radius);
    println!("  NW corner: {:.6}, {:.6}", bbox.nw.lat, bbox.nw.lon);
    println!("  SE corner: {:.6}, {:.6}", bbox.se.lat, bbox.se.lon);
    println!("  Render units per metre: {:.3e}", projection.units_per_meter());
    println!();
    println!(
        "Tiles at zoom {} ({} of max {}):",
        area.zoom,
        plan.tile_count(),
        assembler.config().options.max_tiles
    );
    for tile in &plan.tiles {
        println!("  {}", tile);
    }

    Ok(())
}
