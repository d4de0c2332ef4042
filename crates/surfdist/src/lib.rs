//! Surface-distance metrics between triangle meshes.
//!
//! Compares two segmentations of the same structure through their isosurfaces:
//! per-vertex distances to the other surface, the mean average symmetric
//! surface distance (MASD) and the Hausdorff distance (HD).
//!
//! API Policy
//! - Internal to the analysis pipeline. There is no stable public API; prefer
//!   the curated re-exports in `api` and `prelude`.
//! - Inputs (vertex/face arrays) come from an external marching-cubes step.
//!   This crate never reads volumes or files.

pub mod api;
pub mod cfg;
pub mod distance;
pub mod geom3;
pub mod rand3;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::{ExecutionMode, ScanCfg};
pub use geom3::{Face, Mesh, SurfaceMesh, Vec3};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::{ExecutionMode, ScanCfg};
    pub use crate::distance::{
        calculate_surface_metrics, calculate_surface_metrics_with, surface_distances,
        surface_distances_with, CancelToken, Completion, HausdorffWitness, LogProgress,
        NoProgress, ProgressSink, SurfaceDistances, SymmetricReport, SymmetricSurfaceMetrics,
    };
    pub use crate::geom3::{Face, Mesh, SurfaceMesh, Vec3};
}
