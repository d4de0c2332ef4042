//! Exact point-to-segment and point-to-triangle distances.
//!
//! All functions are pure and return `(distance, closest_point)`.

use super::types::Vec3;
use crate::cfg::{SEGMENT_DEGENERACY_EPS, TRIANGLE_DEGENERACY_EPS};

/// Distance from `p` to the closed segment `ab`.
///
/// Pre: finite inputs.
/// Post: the closest point is `a + t (b - a)` with `t ∈ [0, 1]`; a segment
/// with `|ab|² < SEGMENT_DEGENERACY_EPS` collapses to `a`.
#[inline]
pub fn point_to_segment_distance(p: Vec3, a: Vec3, b: Vec3) -> (f64, Vec3) {
    let ab = b - a;
    let ap = p - a;
    let length_sq = ab.dot(&ab);
    if length_sq < SEGMENT_DEGENERACY_EPS {
        return ((p - a).norm(), a);
    }
    let t = (ap.dot(&ab) / length_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    ((p - closest).norm(), closest)
}

/// Minimum distance from `p` to the boundary of the closed polygon `v0 v1 v2`.
///
/// Edges are visited in order `v0v1, v1v2, v2v0`; the first strict minimum wins.
pub fn point_to_edges_distance(p: Vec3, tri: &[Vec3; 3]) -> (f64, Vec3) {
    let mut best = (f64::INFINITY, tri[0]);
    for i in 0..3 {
        let (d, q) = point_to_segment_distance(p, tri[i], tri[(i + 1) % 3]);
        if d < best.0 {
            best = (d, q);
        }
    }
    best
}

/// Distance from `p` to the triangle `tri`.
///
/// Solves the 2×2 normal equations for the in-plane barycentric weights
/// `(u, v, w)`. Inside (all weights ≥ 0) the projection is exact; outside, or
/// when the triangle is degenerate, the closest point is on the boundary and
/// `point_to_edges_distance` gives it.
pub fn point_to_triangle_distance(p: Vec3, tri: &[Vec3; 3]) -> (f64, Vec3) {
    let [v0, v1, v2] = *tri;
    let edge0 = v1 - v0;
    let edge1 = v2 - v0;
    let v0p = p - v0;

    let a = edge0.dot(&edge0);
    let b = edge0.dot(&edge1);
    let c = edge1.dot(&edge1);
    let d = edge0.dot(&v0p);
    let e = edge1.dot(&v0p);

    let det = a * c - b * b;
    if det < TRIANGLE_DEGENERACY_EPS {
        return point_to_edges_distance(p, tri);
    }

    let inv_det = 1.0 / det;
    let v = (c * d - b * e) * inv_det;
    let w = (a * e - b * d) * inv_det;
    let u = 1.0 - v - w;

    if u >= 0.0 && v >= 0.0 && w >= 0.0 {
        let closest = v0 * u + v1 * v + v2 * w;
        return ((p - closest).norm(), closest);
    }
    point_to_edges_distance(p, tri)
}
