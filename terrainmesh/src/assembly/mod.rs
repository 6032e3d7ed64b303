//! Terrain assembly orchestration
//!
//! Sequences one run end to end:
//!
//! ```text
//! origin + radius ─► bbox ─► tile list ─► [pool] fetch + decode + build grid
//!                                               │
//!                       sort by "zoom/x/y" ◄────┘
//!                               │
//!                          stitch seams
//!                               │
//!                               ▼
//!                     [pool] fetch imagery + build mesh ─► TerrainGroup
//! ```
//!
//! The tile count is checked against the configured cap before anything is
//! fetched. Any failure aborts the whole run.

mod assembler;
mod context;
mod types;

pub use assembler::TerrainAssembler;
pub use context::AssemblyContext;
pub use types::{
    AssemblyConfig, AssemblyError, AssemblyOptions, AssemblyPhase, AssemblyPlan,
    DEFAULT_CONCURRENCY, DEFAULT_ELEVATION_DIM, DEFAULT_MAX_TILES, DEFAULT_RENDER_BOX_SIZE,
};
