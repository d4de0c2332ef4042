//! Nearest point on a triangle surface for a single query vertex.

use crate::geom3::{point_to_triangle_distance, SurfaceMesh, Vec3};

/// Scan all faces of `target` in index order and keep the closest hit.
///
/// The running minimum starts at `max_dist`, so a finite cap truncates the
/// search result: if no face is strictly closer than the cap, the result is
/// `(max_dist, None)`. The same holds for a target without faces.
pub fn nearest_point_on_mesh(vertex: Vec3, target: &SurfaceMesh, max_dist: f64) -> (f64, Option<Vec3>) {
    let mut min_dist = max_dist;
    let mut closest = None;
    for tri in target.triangles() {
        let (d, q) = point_to_triangle_distance(vertex, &tri);
        if d < min_dist {
            min_dist = d;
            closest = Some(q);
        }
    }
    (min_dist, closest)
}
