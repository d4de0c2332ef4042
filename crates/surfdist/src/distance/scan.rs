//! Ordered batch scans.

use super::cancel::CancelToken;
use super::search::nearest_point_on_mesh;
use crate::geom3::{SurfaceMesh, Vec3};

/// One entry of a distance field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceSample {
    /// Minimum distance to the target surface (or the cap).
    pub distance: f64,
    /// Closest point on the target; `None` when nothing beat the cap.
    pub closest: Option<Vec3>,
    /// The query vertex this sample belongs to.
    pub source: Vec3,
}

/// Nearest-surface search for each vertex of `batch`, in order.
///
/// Pure: no shared state, so batches can be scanned on any thread.
pub fn scan_batch(batch: &[Vec3], target: &SurfaceMesh, max_dist: f64) -> Vec<DistanceSample> {
    batch.iter().map(|&v| sample(v, target, max_dist)).collect()
}

/// Like `scan_batch`, but checks `cancel` before each vertex and returns the
/// prefix computed so far once it fires.
pub fn scan_batch_until(
    batch: &[Vec3],
    target: &SurfaceMesh,
    max_dist: f64,
    cancel: &CancelToken,
) -> Vec<DistanceSample> {
    batch
        .iter()
        .take_while(|_| !cancel.is_cancelled())
        .map(|&v| sample(v, target, max_dist))
        .collect()
}

#[inline]
fn sample(source: Vec3, target: &SurfaceMesh, max_dist: f64) -> DistanceSample {
    let (distance, closest) = nearest_point_on_mesh(source, target, max_dist);
    DistanceSample {
        distance,
        closest,
        source,
    }
}
