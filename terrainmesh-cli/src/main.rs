//! terrainmesh CLI - Command-line interface
//!
//! This binary provides a command-line interface to the terrainmesh library.

mod commands;
mod error;
mod output;
mod progress;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::assemble::AssembleArgs;
use commands::common::{AreaArgs, TuningArgs};
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "terrainmesh")]
#[command(version, about = "Assemble seamless 3D terrain meshes from map tiles", long_about = None)]
struct Cli {
    /// Read settings from this file instead of ~/.terrainmesh/config.ini
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download tiles around a point and write the stitched terrain mesh
    Assemble {
        #[command(flatten)]
        area: AreaArgs,

        #[command(flatten)]
        tuning: TuningArgs,

        /// Output OBJ path; MTL, manifest and textures are written beside it
        #[arg(short, long, default_value = "terrain.obj")]
        output: PathBuf,
    },

    /// Write a config file (default ~/.terrainmesh/config.ini) with the current settings
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the bounding box and tiles an assembly would cover
    Plan {
        #[command(flatten)]
        area: AreaArgs,

        #[command(flatten)]
        tuning: TuningArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let runner = CliRunner::new(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Assemble {
            area,
            tuning,
            output,
        } => commands::assemble::run(
            &runner,
            AssembleArgs {
                area,
                tuning,
                output,
            },
        ),
        Commands::Init { force } => commands::init::run(&runner, cli.config.as_deref(), force),
        Commands::Plan { area, tuning } => commands::plan::run(&runner, area, tuning),
    }
}
