use super::*;
use crate::cfg::ScanCfg;
use crate::geom3::{Mesh, SurfaceMesh, Vec3};
use crate::rand3::{cube, cube_grid, jittered_sphere, unit_cube, ReplayToken, SphereCfg};
use nalgebra::vector;

const TOL: f64 = 1e-9;

fn sphere(rings: usize, segments: usize, index: u64) -> SurfaceMesh {
    let cfg = SphereCfg {
        rings,
        segments,
        radial_jitter: 0.05,
        ..SphereCfg::default()
    };
    jittered_sphere(cfg, ReplayToken { seed: 11, index }).unwrap()
}

/// Records every progress callback.
#[derive(Default)]
struct Recorder {
    started: Option<usize>,
    calls: Vec<(usize, usize)>,
    finished: Option<(usize, usize)>,
}

impl ProgressSink for Recorder {
    fn start(&mut self, total: usize) {
        self.started = Some(total);
    }
    fn advance(&mut self, done: usize, total: usize) {
        self.calls.push((done, total));
    }
    fn finish(&mut self, done: usize, total: usize) {
        self.finished = Some((done, total));
    }
}

/// Cancels its token on the first progress callback.
struct CancelOnFirstBatch {
    token: CancelToken,
}

impl ProgressSink for CancelOnFirstBatch {
    fn advance(&mut self, _done: usize, _total: usize) {
        self.token.cancel();
    }
}

#[test]
fn nearest_point_respects_cap_and_empty_target() {
    let target = unit_cube();
    let far = vector![10.0, 0.5, 0.5];
    let (d, q) = nearest_point_on_mesh(far, &target, f64::INFINITY);
    assert!((d - 9.0).abs() < TOL);
    assert!((q.unwrap() - vector![1.0, 0.5, 0.5]).norm() < TOL);

    let (d, q) = nearest_point_on_mesh(far, &target, 0.5);
    assert_eq!((d, q), (0.5, None));

    let no_faces = SurfaceMesh::new(target.vertices.clone(), Vec::new());
    assert_eq!(nearest_point_on_mesh(far, &no_faces, 3.0), (3.0, None));
}

#[test]
fn scan_batch_keeps_order_and_sources() {
    let target = unit_cube();
    let batch = vec![
        vector![0.5, 0.5, 3.0],
        vector![0.5, 0.5, 0.5],
        vector![-2.0, 0.5, 0.5],
    ];
    let out = scan_batch(&batch, &target, f64::INFINITY);
    assert_eq!(out.len(), 3);
    for (s, v) in out.iter().zip(&batch) {
        assert_eq!(s.source, *v);
    }
    assert!((out[0].distance - 2.0).abs() < TOL);
    assert!((out[1].distance - 0.5).abs() < TOL);
    assert!((out[2].distance - 2.0).abs() < TOL);

    let cancelled = CancelToken::new();
    cancelled.cancel();
    assert!(scan_batch_until(&batch, &target, f64::INFINITY, &cancelled).is_empty());
    let live = scan_batch_until(&batch, &target, f64::INFINITY, &CancelToken::new());
    assert_eq!(live, out);
}

#[test]
fn mesh_against_itself_is_zero() {
    let m = Mesh::from(cube_grid(Vec3::zeros(), 2.0, 4));
    for cfg in [ScanCfg::sequential(), ScanCfg::parallel()] {
        let out = surface_distances_with(&m, &m, f64::INFINITY, &cfg, &CancelToken::new(), &mut NoProgress);
        assert_eq!(out.distances.len(), m.vertex_count());
        assert!(out.distances.iter().all(|&d| d < 1e-12));
        assert!(out.mean < 1e-12 && out.max < 1e-12);
        assert!(out.completion.is_finished());
    }
}

#[test]
fn absent_meshes_give_zero_metrics() {
    let b = Mesh::from(unit_cube());
    let zero = SymmetricSurfaceMetrics {
        avg_symm_surface_dist: 0.0,
        hausdorff_dist: 0.0,
    };
    assert_eq!(calculate_surface_metrics(&Mesh::Absent, &b), zero);
    assert_eq!(calculate_surface_metrics(&b, &Mesh::Absent), zero);
    assert_eq!(calculate_surface_metrics(&Mesh::Absent, &Mesh::Absent), zero);
    let out = surface_distances(&Mesh::Absent, &b, f64::INFINITY);
    assert_eq!(out, SurfaceDistances::empty());
}

#[test]
fn coincident_unit_cubes() {
    let a = Mesh::from(unit_cube());
    let b = Mesh::from(unit_cube());
    let m = calculate_surface_metrics(&a, &b);
    assert!(m.avg_symm_surface_dist.abs() < 1e-12);
    assert!(m.hausdorff_dist.abs() < 1e-12);
}

#[test]
fn offset_unit_cubes_have_analytic_distances() {
    // B = A shifted by 2.5 along x: the far faces are 2.5 apart, near faces 1.5.
    let a = Mesh::from(unit_cube());
    let b = Mesh::from(cube(vector![2.5, 0.0, 0.0], 1.0));
    let m = calculate_surface_metrics(&a, &b);
    assert!((m.hausdorff_dist - 2.5).abs() < TOL);
    assert!((m.avg_symm_surface_dist - 2.0).abs() < TOL);

    let fwd = surface_distances(&a, &b, f64::INFINITY);
    let w = fwd.witness.unwrap();
    assert_eq!(w.source.x, 0.0);
    assert!((w.target.unwrap().x - 2.5).abs() < TOL);
}

#[test]
fn offset_grid_cubes_on_the_pool() {
    let grid = cube_grid(Vec3::zeros(), 1.0, 13);
    assert!(grid.vertex_count() >= 1000);
    let shift = vector![2.5, 0.0, 0.0];
    let a = Mesh::from(grid.clone());
    let b = Mesh::from(grid.translated(shift));
    let report = calculate_surface_metrics_with(&a, &b, &ScanCfg::default(), &CancelToken::new());
    // Every A vertex is nearest to B's x = 2.5 face.
    let mean_x = grid.vertices.iter().map(|v| v.x).sum::<f64>() / grid.vertex_count() as f64;
    assert!((report.forward.mean - (2.5 - mean_x)).abs() < TOL);
    assert!((report.forward.mean - report.backward.mean).abs() < TOL);
    assert!((report.metrics.hausdorff_dist - 2.5).abs() < TOL);
    assert_eq!(report.completion(), Completion::Finished);
}

#[test]
fn metrics_are_symmetric() {
    let a = Mesh::from(sphere(10, 12, 1));
    let b = Mesh::from(sphere(12, 10, 2));
    let ab = calculate_surface_metrics(&a, &b);
    let ba = calculate_surface_metrics(&b, &a);
    assert_eq!(ab, ba);
    assert!(ab.hausdorff_dist > 0.0);
    assert!(ab.avg_symm_surface_dist <= ab.hausdorff_dist);
}

#[test]
fn sequential_and_pooled_paths_agree() {
    let a = Mesh::from(sphere(32, 36, 1));
    let b = Mesh::from(sphere(30, 40, 2));
    assert!(a.vertex_count() >= 1000);
    let cancel = CancelToken::new();
    let seq = surface_distances_with(&a, &b, f64::INFINITY, &ScanCfg::sequential(), &cancel, &mut NoProgress);
    let par = surface_distances_with(&a, &b, f64::INFINITY, &ScanCfg::parallel(), &cancel, &mut NoProgress);
    assert!((seq.mean - par.mean).abs() < TOL);
    assert!((seq.max - par.max).abs() < TOL);
    let sorted = |mut v: Vec<f64>| {
        v.sort_by(|x, y| x.total_cmp(y));
        v
    };
    assert_eq!(sorted(seq.distances), sorted(par.distances));
}

#[test]
fn concurrent_directions_match_sequential_directions() {
    let a = Mesh::from(sphere(16, 18, 3));
    let b = Mesh::from(sphere(18, 16, 4));
    let cancel = CancelToken::new();
    let serial = calculate_surface_metrics_with(&a, &b, &ScanCfg::default(), &cancel);
    let joined = calculate_surface_metrics_with(
        &a,
        &b,
        &ScanCfg {
            concurrent_directions: true,
            ..ScanCfg::default()
        },
        &cancel,
    );
    assert_eq!(serial.metrics, joined.metrics);
}

#[test]
fn finite_cap_truncates_and_drops_witness_target() {
    let a = Mesh::from(unit_cube());
    let b = Mesh::from(cube(vector![5.0, 0.0, 0.0], 1.0));
    let out = surface_distances(&a, &b, 1.0);
    assert!(out.distances.iter().all(|&d| d == 1.0));
    assert_eq!(out.max, 1.0);
    let w = out.witness.unwrap();
    assert_eq!(w.target, None);
}

#[test]
fn progress_is_reported_per_vertex_or_per_batch() {
    let small = Mesh::from(cube_grid(Vec3::zeros(), 1.0, 2)); // 26 vertices
    let target = Mesh::from(unit_cube());
    let mut rec = Recorder::default();
    surface_distances_with(&small, &target, f64::INFINITY, &ScanCfg::sequential(), &CancelToken::new(), &mut rec);
    assert_eq!(rec.started, Some(26));
    assert!(rec.calls.is_empty(), "no per-vertex progress for tiny meshes");
    assert_eq!(rec.finished, Some((26, 26)));

    let medium = Mesh::from(cube_grid(Vec3::zeros(), 1.0, 5)); // 152 vertices
    let mut rec = Recorder::default();
    surface_distances_with(&medium, &target, f64::INFINITY, &ScanCfg::sequential(), &CancelToken::new(), &mut rec);
    assert_eq!(rec.calls.len(), 152);
    assert_eq!(rec.calls.last(), Some(&(152, 152)));

    let mut rec = Recorder::default();
    surface_distances_with(&medium, &target, f64::INFINITY, &ScanCfg::parallel(), &CancelToken::new(), &mut rec);
    assert!(!rec.calls.is_empty());
    assert!(rec.calls.windows(2).all(|w| w[0].0 < w[1].0));
    assert_eq!(rec.calls.last(), Some(&(152, 152)));
}

#[test]
fn cancelled_before_start_returns_empty_partial() {
    let a = Mesh::from(cube_grid(Vec3::zeros(), 1.0, 13));
    let b = Mesh::from(unit_cube());
    let token = CancelToken::new();
    token.cancel();
    for cfg in [ScanCfg::sequential(), ScanCfg::parallel()] {
        let out = surface_distances_with(&a, &b, f64::INFINITY, &cfg, &token, &mut NoProgress);
        assert!(out.distances.is_empty());
        assert_eq!(out.mean, 0.0);
        assert_eq!(
            out.completion,
            Completion::Cancelled {
                processed: 0,
                total: a.vertex_count()
            }
        );
    }
}

#[test]
fn cancellation_mid_scan_keeps_completed_batches() {
    let a = Mesh::from(sphere(72, 72, 5));
    let b = Mesh::from(sphere(72, 72, 6));
    let total = a.vertex_count();
    assert!(total >= 5000);
    let token = CancelToken::new();
    let mut sink = CancelOnFirstBatch {
        token: token.clone(),
    };
    let out = surface_distances_with(&a, &b, f64::INFINITY, &ScanCfg::default(), &token, &mut sink);
    let got = out.distances.len();
    assert!(got > 0, "completed batches must be kept");
    assert!(got < total, "remaining batches must be skipped");
    assert_eq!(
        out.completion,
        Completion::Cancelled {
            processed: got,
            total
        }
    );
    let mean = out.distances.iter().sum::<f64>() / got as f64;
    assert!((out.mean - mean).abs() < TOL);
    let max = out.distances.iter().copied().fold(0.0, f64::max);
    assert_eq!(out.max, max);
}

#[test]
fn symmetric_report_flags_partial_results() {
    let a = Mesh::from(unit_cube());
    let b = Mesh::from(cube(vector![0.2, 0.0, 0.0], 1.0));
    let token = CancelToken::new();
    token.cancel();
    let report = calculate_surface_metrics_with(&a, &b, &ScanCfg::default(), &token);
    assert_eq!(
        report.completion(),
        Completion::Cancelled {
            processed: 0,
            total: 16
        }
    );
    assert_eq!(report.metrics, SymmetricSurfaceMetrics::default());
}
