//! Reduction of batch results into mean, maximum and the Hausdorff witness.

use super::scan::DistanceSample;
use crate::geom3::Vec3;

/// Vertex pair realizing a directional maximum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HausdorffWitness {
    /// Query vertex on the source mesh.
    pub source: Vec3,
    /// Its closest point on the target (`None` if only the cap was reached).
    pub target: Option<Vec3>,
}

/// Whether a scan covered every query vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Finished,
    /// Stopped by a `CancelToken`; the result covers `processed` vertices.
    Cancelled { processed: usize, total: usize },
}

impl Completion {
    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self, Completion::Finished)
    }
}

/// One-directional result (source → target).
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceDistances {
    /// Per-vertex minimum distances. Order follows batch completion once the
    /// pool is used, so do not index it by vertex.
    pub distances: Vec<f64>,
    pub mean: f64,
    pub max: f64,
    /// Pair achieving `max`; `None` when no distance exceeded zero.
    pub witness: Option<HausdorffWitness>,
    pub completion: Completion,
}

impl SurfaceDistances {
    /// Result for an absent source or target mesh.
    pub fn empty() -> Self {
        Self {
            distances: Vec::new(),
            mean: 0.0,
            max: 0.0,
            witness: None,
            completion: Completion::Finished,
        }
    }
}

/// Single-owner accumulator for batch results.
///
/// Only the collecting thread holds it; workers never touch it.
#[derive(Clone, Debug)]
pub struct Aggregator {
    distances: Vec<f64>,
    sum: f64,
    max: f64,
    witness: Option<HausdorffWitness>,
    total: usize,
}

impl Aggregator {
    /// `total` is the number of query vertices the scan was asked to cover.
    pub fn new(total: usize) -> Self {
        Self {
            distances: Vec::with_capacity(total),
            sum: 0.0,
            max: 0.0,
            witness: None,
            total,
        }
    }

    /// Merge one sample; the witness moves only on a strictly larger distance.
    #[inline]
    pub fn push(&mut self, s: &DistanceSample) {
        self.distances.push(s.distance);
        self.sum += s.distance;
        if s.distance > self.max {
            self.max = s.distance;
            self.witness = Some(HausdorffWitness {
                source: s.source,
                target: s.closest,
            });
        }
    }

    /// Merge a completed batch.
    pub fn ingest(&mut self, batch: &[DistanceSample]) {
        for s in batch {
            self.push(s);
        }
    }

    #[inline]
    pub fn processed(&self) -> usize {
        self.distances.len()
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn finish(self, cancelled: bool) -> SurfaceDistances {
        let processed = self.distances.len();
        let mean = if processed == 0 {
            0.0
        } else {
            self.sum / processed as f64
        };
        let completion = if cancelled && processed < self.total {
            Completion::Cancelled {
                processed,
                total: self.total,
            }
        } else {
            Completion::Finished
        };
        SurfaceDistances {
            distances: self.distances,
            mean,
            max: self.max,
            witness: self.witness,
            completion,
        }
    }
}
