//! Terminal progress bars for the two assembly phases.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use terrainmesh::assembly::AssemblyPhase;
use terrainmesh::pool::PoolProgress;

const TEMPLATE: &str = "{prefix:>9} [{bar:40.cyan/blue}] {pos}/{len} tiles ({elapsed})";

/// One bar per phase, stacked.
pub struct PhaseBars {
    _multi: MultiProgress,
    fetch: ProgressBar,
    build: ProgressBar,
}

impl PhaseBars {
    pub fn new(tile_count: usize) -> Self {
        let multi = MultiProgress::new();
        let fetch = multi.add(phase_bar(tile_count, "elevation"));
        let build = multi.add(phase_bar(tile_count, "meshes"));

        Self {
            _multi: multi,
            fetch,
            build,
        }
    }

    /// Progress callback for `TerrainAssembler::assemble`.
    pub fn update(&self, phase: AssemblyPhase, progress: PoolProgress) {
        let bar = self.bar(phase);
        bar.set_length(progress.total as u64);
        bar.set_position(progress.completed as u64);
        if progress.completed == progress.total {
            bar.finish();
        }
    }

    /// Stops both bars where they are after a failed run.
    pub fn abandon(&self) {
        self.fetch.abandon();
        self.build.abandon();
    }

    fn bar(&self, phase: AssemblyPhase) -> &ProgressBar {
        match phase {
            AssemblyPhase::Fetch => &self.fetch,
            AssemblyPhase::Build => &self.build,
        }
    }
}

fn phase_bar(len: usize, prefix: &'static str) -> ProgressBar {
    let style = ProgressStyle::with_template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    ProgressBar::new(len as u64).with_style(style).with_prefix(prefix)
}
