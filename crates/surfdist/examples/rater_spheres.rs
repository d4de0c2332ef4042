//! Timing probe: symmetric metrics between two "rater" spheres.
//!
//! Purpose
//! - Give a concrete wall-clock number for a mesh pair in the size range of a
//!   downsampled mandible surface (a few thousand vertices per side), on both
//!   execution paths.
//!
//! Run with `cargo run --release -p surfdist --example rater_spheres`.

use std::time::Instant;

use surfdist::distance::{calculate_surface_metrics_with, CancelToken};
use surfdist::rand3::{jittered_sphere, ReplayToken, SphereCfg};
use surfdist::{Mesh, ScanCfg};

fn main() {
    let cfg = SphereCfg {
        rings: 48,
        segments: 64,
        radius: 30.0,
        radial_jitter: 0.02,
        ..SphereCfg::default()
    };
    let a = Mesh::from(jittered_sphere(cfg, ReplayToken { seed: 1, index: 0 }).expect("valid cfg"));
    let b = Mesh::from(jittered_sphere(cfg, ReplayToken { seed: 1, index: 1 }).expect("valid cfg"));
    println!("vertices per mesh: {}", a.vertex_count());

    for (name, scan) in [("sequential", ScanCfg::sequential()), ("pooled", ScanCfg::default())] {
        let start = Instant::now();
        let report = calculate_surface_metrics_with(&a, &b, &scan, &CancelToken::new());
        let ms = start.elapsed().as_secs_f64() * 1e3;
        println!(
            "{name:>10}: ASSD {:.4} mm, HD {:.4} mm ({ms:.1} ms)",
            report.metrics.avg_symm_surface_dist, report.metrics.hausdorff_dist
        );
    }
}
