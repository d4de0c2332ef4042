//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for the CLI, the
//!   Python bindings and experiments. Breaking changes are allowed.

// Geometry kernel and mesh types
pub use crate::geom3::{
    point_to_edges_distance, point_to_segment_distance, point_to_triangle_distance, Face, Mesh,
    MeshError, SurfaceMesh, Vec3,
};
// Distance engine
pub use crate::distance::{
    calculate_surface_metrics, calculate_surface_metrics_with, nearest_point_on_mesh, scan_batch,
    scan_batch_until, surface_distances, surface_distances_with, Aggregator, CancelToken,
    Completion, DistanceSample, HausdorffWitness, LogProgress, NoProgress, ProgressSink,
    SurfaceDistances, SymmetricReport, SymmetricSurfaceMetrics,
};
// Scheduling
pub use crate::cfg::{ExecutionMode, ScanCfg};
// Synthetic fixtures
pub use crate::rand3::{
    cube, cube_grid, jittered_sphere, unit_cube, uv_sphere, GeneratorError, ReplayToken,
    SphereCfg,
};

/// Symmetric metrics from raw marching-cubes arrays.
///
/// Pre: face indices are in range for their vertex list.
/// Post: empty inputs are treated as a missing surface and give zeros.
pub fn metrics_from_arrays(
    verts_a: Vec<Vec3>,
    faces_a: Vec<Face>,
    verts_b: Vec<Vec3>,
    faces_b: Vec<Face>,
) -> SymmetricSurfaceMetrics {
    let a = Mesh::from_parts(verts_a, faces_a);
    let b = Mesh::from_parts(verts_b, faces_b);
    calculate_surface_metrics(&a, &b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn arrays_with_missing_side_are_zero() {
        let c = unit_cube();
        let m = metrics_from_arrays(c.vertices, c.faces, Vec::new(), Vec::new());
        assert_eq!(m, SymmetricSurfaceMetrics::default());
    }

    #[test]
    fn random_translation_bounds_hausdorff_seeded() {
        // HD between a surface and its translate never exceeds the shift length.
        let mut rng = StdRng::seed_from_u64(42);
        let shift = Vec3::new(
            rng.gen_range(-0.3..0.3),
            rng.gen_range(-0.3..0.3),
            rng.gen_range(-0.3..0.3),
        );
        let s = uv_sphere(Vec3::zeros(), 1.0, 10, 14).unwrap();
        let t = s.translated(shift);
        let m = metrics_from_arrays(s.vertices, s.faces, t.vertices, t.faces);
        assert!(m.hausdorff_dist <= shift.norm() + 1e-12);
        assert!(m.hausdorff_dist > 0.0);
    }
}
