//! Symmetric surface metrics: mean average symmetric surface distance and
//! Hausdorff distance.

use super::aggregate::{Completion, SurfaceDistances};
use super::cancel::CancelToken;
use super::orchestrator::surface_distances_with;
use super::progress::LogProgress;
use crate::cfg::ScanCfg;
use crate::geom3::Mesh;

/// MASD / HD pair for one mesh comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SymmetricSurfaceMetrics {
    /// `(mean(A→B) + mean(B→A)) / 2`.
    pub avg_symm_surface_dist: f64,
    /// `max(max(A→B), max(B→A))`.
    pub hausdorff_dist: f64,
}

/// Metrics plus both directional scans they were derived from.
#[derive(Clone, Debug, PartialEq)]
pub struct SymmetricReport {
    pub metrics: SymmetricSurfaceMetrics,
    /// A → B.
    pub forward: SurfaceDistances,
    /// B → A.
    pub backward: SurfaceDistances,
}

impl SymmetricReport {
    fn absent() -> Self {
        Self {
            metrics: SymmetricSurfaceMetrics::default(),
            forward: SurfaceDistances::empty(),
            backward: SurfaceDistances::empty(),
        }
    }

    /// `Cancelled` if either direction stopped early; counts cover both.
    pub fn completion(&self) -> Completion {
        if self.forward.completion.is_finished() && self.backward.completion.is_finished() {
            return Completion::Finished;
        }
        let count = |d: &SurfaceDistances| match d.completion {
            Completion::Finished => (d.distances.len(), d.distances.len()),
            Completion::Cancelled { processed, total } => (processed, total),
        };
        let (pf, tf) = count(&self.forward);
        let (pb, tb) = count(&self.backward);
        Completion::Cancelled {
            processed: pf + pb,
            total: tf + tb,
        }
    }
}

/// Symmetric metrics with default scheduling. Absent meshes give zeros.
pub fn calculate_surface_metrics(a: &Mesh, b: &Mesh) -> SymmetricSurfaceMetrics {
    calculate_surface_metrics_with(a, b, &ScanCfg::default(), &CancelToken::new()).metrics
}

/// Symmetric metrics with explicit scheduling and cancellation.
///
/// Directions run one after the other unless `cfg.concurrent_directions` is
/// set, in which case they run under `rayon::join`. A cancelled direction
/// still contributes its partial mean and max; check `completion()`.
pub fn calculate_surface_metrics_with(
    a: &Mesh,
    b: &Mesh,
    cfg: &ScanCfg,
    cancel: &CancelToken,
) -> SymmetricReport {
    if a.is_absent() || b.is_absent() {
        return SymmetricReport::absent();
    }
    let inf = f64::INFINITY;
    let run = |src: &Mesh, tgt: &Mesh, label: &str| {
        let mut progress = LogProgress::new(label);
        surface_distances_with(src, tgt, inf, cfg, cancel, &mut progress)
    };
    let (forward, backward) = if cfg.concurrent_directions {
        rayon::join(|| run(a, b, "a->b"), || run(b, a, "b->a"))
    } else {
        (run(a, b, "a->b"), run(b, a, "b->a"))
    };
    let metrics = SymmetricSurfaceMetrics {
        avg_symm_surface_dist: (forward.mean + backward.mean) / 2.0,
        hausdorff_dist: forward.max.max(backward.max),
    };
    SymmetricReport {
        metrics,
        forward,
        backward,
    }
}
