//! Surface distances between two meshes: per-vertex fields, MASD and Hausdorff.
//!
//! Purpose
//! - For every vertex of a source mesh, find the minimum Euclidean distance to
//!   the target surface (brute force over all faces), then reduce the field to
//!   a mean and a maximum. Running both directions gives the symmetric metrics.
//!
//! Layout
//! - `search`: one vertex against all target faces.
//! - `scan`: an ordered batch of vertices (pure; safe on any thread).
//! - `aggregate`: single-owner reduction of batch results (mean, max, witness).
//! - `orchestrator`: sequential vs. pooled execution, progress, cancellation.
//! - `metrics`: the bidirectional MASD / HD combination.
//!
//! Concurrency
//! - Workers only read the target mesh and own their batch. All mutation of the
//!   aggregate happens on the collecting thread.

mod aggregate;
mod cancel;
mod metrics;
mod orchestrator;
mod progress;
mod scan;
mod search;

pub use aggregate::{Aggregator, Completion, HausdorffWitness, SurfaceDistances};
pub use cancel::CancelToken;
pub use metrics::{
    calculate_surface_metrics, calculate_surface_metrics_with, SymmetricReport,
    SymmetricSurfaceMetrics,
};
pub use orchestrator::{surface_distances, surface_distances_with};
pub use progress::{LogProgress, NoProgress, ProgressSink};
pub use scan::{scan_batch, scan_batch_until, DistanceSample};
pub use search::nearest_point_on_mesh;

#[cfg(test)]
mod tests;
