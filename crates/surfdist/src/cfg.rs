//! Tolerances and scheduling defaults for the surface-distance engine.
//!
//! Policy
//! - Geometric tolerances are fixed constants; they match the thresholds the
//!   metric values in existing result tables were produced with, so changing
//!   them changes published numbers.
//! - Scheduling knobs live in `ScanCfg` so tests and the CLI can force either
//!   execution path without touching call sites.

/// Squared segment length below which a segment is treated as a single point.
pub const SEGMENT_DEGENERACY_EPS: f64 = 1e-10;
/// Normal-equation determinant below which a triangle is treated as degenerate.
pub const TRIANGLE_DEGENERACY_EPS: f64 = 1e-10;

/// Query meshes with fewer vertices than this are scanned sequentially.
pub const SEQUENTIAL_THRESHOLD: usize = 1000;
/// Upper bound on pool threads, regardless of available parallelism.
pub const MAX_WORKERS: usize = 20;
/// Batches created per worker; more batches give finer progress and balance.
pub const BATCHES_PER_WORKER: usize = 4;
/// Sequential scans only report per-vertex progress above this size.
pub const PROGRESS_MIN_VERTICES: usize = 100;

/// Which branch of the orchestrator runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Sequential below `sequential_threshold`, pooled otherwise.
    #[default]
    Auto,
    /// Always a single sequential batch.
    Sequential,
    /// Always the worker pool, even for tiny meshes.
    Parallel,
}

/// Scan configuration (scheduling only; geometry tolerances are constants).
#[derive(Clone, Copy, Debug)]
pub struct ScanCfg {
    pub mode: ExecutionMode,
    pub sequential_threshold: usize,
    pub max_workers: usize,
    pub batches_per_worker: usize,
    pub progress_min_vertices: usize,
    /// Run A→B and B→A under `rayon::join` instead of one after the other.
    pub concurrent_directions: bool,
}

impl Default for ScanCfg {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Auto,
            sequential_threshold: SEQUENTIAL_THRESHOLD,
            max_workers: MAX_WORKERS,
            batches_per_worker: BATCHES_PER_WORKER,
            progress_min_vertices: PROGRESS_MIN_VERTICES,
            concurrent_directions: false,
        }
    }
}

impl ScanCfg {
    #[inline]
    pub fn sequential() -> Self {
        Self {
            mode: ExecutionMode::Sequential,
            ..Self::default()
        }
    }

    #[inline]
    pub fn parallel() -> Self {
        Self {
            mode: ExecutionMode::Parallel,
            ..Self::default()
        }
    }

    /// Whether a query mesh of `n` vertices goes through the worker pool.
    #[inline]
    pub fn use_pool(&self, n: usize) -> bool {
        match self.mode {
            ExecutionMode::Sequential => false,
            ExecutionMode::Parallel => n > 0,
            ExecutionMode::Auto => n >= self.sequential_threshold,
        }
    }

    /// Pool size: available parallelism capped by `max_workers` (at least one).
    pub fn worker_count(&self) -> usize {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        available.min(self.max_workers).max(1)
    }

    /// Contiguous batch length for `n` vertices on `workers` threads.
    #[inline]
    pub fn batch_size(&self, n: usize, workers: usize) -> usize {
        let slots = workers.max(1) * self.batches_per_worker.max(1);
        (n / slots).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_mode_switches_at_threshold() {
        let cfg = ScanCfg::default();
        assert!(!cfg.use_pool(999));
        assert!(cfg.use_pool(1000));
        assert!(!ScanCfg::sequential().use_pool(50_000));
        assert!(ScanCfg::parallel().use_pool(3));
        assert!(!ScanCfg::parallel().use_pool(0));
    }

    #[test]
    fn batch_size_targets_four_batches_per_worker() {
        let cfg = ScanCfg::default();
        assert_eq!(cfg.batch_size(8000, 20), 100);
        assert_eq!(cfg.batch_size(1000, 4), 62);
        // Never zero, even when there are more slots than vertices.
        assert_eq!(cfg.batch_size(5, 20), 1);
    }

    #[test]
    fn worker_count_is_capped() {
        let cfg = ScanCfg {
            max_workers: 2,
            ..ScanCfg::default()
        };
        let w = cfg.worker_count();
        assert!((1..=2).contains(&w));
    }
}
