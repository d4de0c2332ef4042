//! One-directional surface distances: sequential scan or a bounded worker pool.
//!
//! Why two paths
//! - Below `ScanCfg::sequential_threshold` query vertices, pool setup costs
//!   more than the O(V·F) scan it would split, so we stay on the caller's
//!   thread.
//! - Above it, the vertex list is cut into contiguous batches (≈4 per worker)
//!   and scanned on a dedicated rayon pool. Finished batches travel back over a
//!   channel and are folded into one `Aggregator` on the calling thread, which
//!   is also the only place progress is reported.
//!
//! Cancellation
//! - The `CancelToken` stops dispatch, makes queued batches return without
//!   work, and stops in-flight batches before their next vertex. Everything
//!   already computed is kept and reported as `Completion::Cancelled`.

use std::sync::mpsc;

use rayon::ThreadPoolBuilder;

use super::aggregate::{Aggregator, SurfaceDistances};
use super::cancel::CancelToken;
use super::progress::{NoProgress, ProgressSink};
use super::scan::{scan_batch_until, DistanceSample};
use super::search::nearest_point_on_mesh;
use crate::cfg::ScanCfg;
use crate::geom3::{Mesh, SurfaceMesh};

/// Distances from every vertex of `source` to the surface of `target`.
///
/// Uses default scheduling, no cancellation and no progress output.
pub fn surface_distances(source: &Mesh, target: &Mesh, max_dist: f64) -> SurfaceDistances {
    surface_distances_with(
        source,
        target,
        max_dist,
        &ScanCfg::default(),
        &CancelToken::new(),
        &mut NoProgress,
    )
}

/// Distances from every vertex of `source` to the surface of `target`.
///
/// Pre: face indices of both meshes are in range.
/// Post: `mean` and `max` are reductions over `distances`; `witness` is the
/// vertex pair behind `max`. Absent meshes give `SurfaceDistances::empty()`.
pub fn surface_distances_with(
    source: &Mesh,
    target: &Mesh,
    max_dist: f64,
    cfg: &ScanCfg,
    cancel: &CancelToken,
    progress: &mut dyn ProgressSink,
) -> SurfaceDistances {
    let (src, tgt) = match (source, target) {
        (Mesh::Present(s), Mesh::Present(t)) => (s, t),
        _ => return SurfaceDistances::empty(),
    };
    let n = src.vertex_count();
    progress.start(n);
    let result = if cfg.use_pool(n) {
        scan_pooled(src, tgt, max_dist, cfg, cancel, progress)
    } else {
        scan_sequential(src, tgt, max_dist, cfg, cancel, progress)
    };
    progress.finish(result.distances.len(), n);
    result
}

fn scan_sequential(
    src: &SurfaceMesh,
    tgt: &SurfaceMesh,
    max_dist: f64,
    cfg: &ScanCfg,
    cancel: &CancelToken,
    progress: &mut dyn ProgressSink,
) -> SurfaceDistances {
    let n = src.vertex_count();
    let report = n > cfg.progress_min_vertices;
    tracing::debug!(vertices = n, faces = tgt.face_count(), "sequential surface scan");
    let mut agg = Aggregator::new(n);
    for &v in &src.vertices {
        if cancel.is_cancelled() {
            break;
        }
        let (distance, closest) = nearest_point_on_mesh(v, tgt, max_dist);
        agg.push(&DistanceSample {
            distance,
            closest,
            source: v,
        });
        if report {
            progress.advance(agg.processed(), n);
        }
    }
    agg.finish(cancel.is_cancelled())
}

fn scan_pooled(
    src: &SurfaceMesh,
    tgt: &SurfaceMesh,
    max_dist: f64,
    cfg: &ScanCfg,
    cancel: &CancelToken,
    progress: &mut dyn ProgressSink,
) -> SurfaceDistances {
    let n = src.vertex_count();
    let workers = cfg.worker_count();
    let batch_size = cfg.batch_size(n, workers);
    let pool = match ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("surfdist-{i}"))
        .build()
    {
        Ok(pool) => pool,
        Err(err) => {
            tracing::warn!(%err, "worker pool unavailable, scanning sequentially");
            return scan_sequential(src, tgt, max_dist, cfg, cancel, progress);
        }
    };
    tracing::debug!(
        vertices = n,
        faces = tgt.face_count(),
        workers,
        batch_size,
        batches = n.div_ceil(batch_size),
        "pooled surface scan"
    );

    let mut agg = Aggregator::new(n);
    let (tx, rx) = mpsc::channel::<Vec<DistanceSample>>();
    pool.in_place_scope(|scope| {
        for batch in src.vertices.chunks(batch_size) {
            if cancel.is_cancelled() {
                break;
            }
            let tx = tx.clone();
            scope.spawn(move |_| {
                // Queued batches that start after cancellation do no work.
                if cancel.is_cancelled() {
                    return;
                }
                let samples = scan_batch_until(batch, tgt, max_dist, cancel);
                // The receiver outlives the scope; a send error cannot occur.
                let _ = tx.send(samples);
            });
        }
        drop(tx);
        // Single collection point: the only writer of `agg` and `progress`.
        for samples in rx.iter() {
            agg.ingest(&samples);
            progress.advance(agg.processed(), n);
        }
    });
    agg.finish(cancel.is_cancelled())
}
