//! Synthetic triangle surfaces for tests, benches and CLI fixtures.
//!
//! Purpose
//! - Stand in for marching-cubes output when no segmentation volumes are at
//!   hand: closed surfaces with known geometry (cubes with analytic distances)
//!   and "rater-like" perturbations of a sphere.
//!
//! Model
//! - `cube_grid` subdivides each cube face into an `n × n` grid sharing
//!   vertices along edges, so vertex counts can be pushed past the pooled
//!   threshold while distances stay analytic.
//! - `jittered_sphere` displaces UV-sphere vertices radially; determinism uses
//!   a replay token `(seed, index)` mixed into a single RNG.

use std::collections::HashMap;
use std::fmt;

use nalgebra::vector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom3::{Face, SurfaceMesh, Vec3};

/// Error type for invalid generator parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorError {
    InvalidParams { reason: String },
}

impl GeneratorError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams { reason } => write!(f, "invalid generator params: {reason}"),
        }
    }
}

impl std::error::Error for GeneratorError {}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Axis-aligned unit cube at the origin: 8 vertices, 12 triangles.
pub fn unit_cube() -> SurfaceMesh {
    cube(Vec3::zeros(), 1.0)
}

/// Axis-aligned cube with minimum corner `origin` and edge length `side`.
///
/// Corner `i` sits at `origin + side * (i & 1, (i >> 1) & 1, (i >> 2) & 1)`.
pub fn cube(origin: Vec3, side: f64) -> SurfaceMesh {
    let vertices = (0..8)
        .map(|i| {
            origin
                + vector![
                    (i & 1) as f64 * side,
                    ((i >> 1) & 1) as f64 * side,
                    ((i >> 2) & 1) as f64 * side
                ]
        })
        .collect();
    let faces = vec![
        [0, 2, 3],
        [0, 3, 1],
        [4, 5, 7],
        [4, 7, 6],
        [0, 1, 5],
        [0, 5, 4],
        [2, 6, 7],
        [2, 7, 3],
        [0, 4, 6],
        [0, 6, 2],
        [1, 3, 7],
        [1, 7, 5],
    ];
    SurfaceMesh::new(vertices, faces)
}

/// Cube surface with every face split into an `n × n` grid of quads.
///
/// Vertices: `6n² + 2`; faces: `12n²`. `n = 0` is treated as 1.
pub fn cube_grid(origin: Vec3, side: f64, n: usize) -> SurfaceMesh {
    let n = n.max(1);
    let h = side / n as f64;
    let mut index: HashMap<[usize; 3], usize> = HashMap::new();
    let mut vertices: Vec<Vec3> = Vec::with_capacity(6 * n * n + 2);
    let mut faces: Vec<Face> = Vec::with_capacity(12 * n * n);
    let mut id = |p: [usize; 3], vertices: &mut Vec<Vec3>| -> usize {
        *index.entry(p).or_insert_with(|| {
            vertices.push(origin + vector![p[0] as f64 * h, p[1] as f64 * h, p[2] as f64 * h]);
            vertices.len() - 1
        })
    };
    for axis in 0..3 {
        let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
        for side_at in [0, n] {
            for a in 0..n {
                for b in 0..n {
                    let lattice = |da: usize, db: usize| {
                        let mut p = [0usize; 3];
                        p[axis] = side_at;
                        p[u] = a + da;
                        p[v] = b + db;
                        p
                    };
                    let q00 = id(lattice(0, 0), &mut vertices);
                    let q10 = id(lattice(1, 0), &mut vertices);
                    let q11 = id(lattice(1, 1), &mut vertices);
                    let q01 = id(lattice(0, 1), &mut vertices);
                    faces.push([q00, q10, q11]);
                    faces.push([q00, q11, q01]);
                }
            }
        }
    }
    SurfaceMesh::new(vertices, faces)
}

/// UV sphere: two poles plus `rings - 1` latitude rows of `segments` vertices.
///
/// Vertices: `(rings - 1) * segments + 2`; faces: `2 * segments * (rings - 1)`.
pub fn uv_sphere(
    center: Vec3,
    radius: f64,
    rings: usize,
    segments: usize,
) -> Result<SurfaceMesh, GeneratorError> {
    SphereCfg {
        center,
        radius,
        rings,
        segments,
        radial_jitter: 0.0,
    }
    .validate()?;
    Ok(build_sphere(center, rings, segments, |_| radius))
}

/// Radially perturbed UV sphere configuration.
#[derive(Clone, Copy, Debug)]
pub struct SphereCfg {
    pub center: Vec3,
    pub radius: f64,
    pub rings: usize,
    pub segments: usize,
    /// Relative amplitude: radii are `radius * (1 + u)`, `u ∈ [-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
}

impl Default for SphereCfg {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            radius: 1.0,
            rings: 24,
            segments: 32,
            radial_jitter: 0.02,
        }
    }
}

impl SphereCfg {
    fn validate(&self) -> Result<(), GeneratorError> {
        if self.rings < 2 {
            return Err(GeneratorError::invalid("need at least 2 rings"));
        }
        if self.segments < 3 {
            return Err(GeneratorError::invalid("need at least 3 segments"));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(GeneratorError::invalid("radius must be finite and > 0"));
        }
        if !(self.radial_jitter.is_finite() && (0.0..1.0).contains(&self.radial_jitter)) {
            return Err(GeneratorError::invalid("radial_jitter must lie in [0, 1)"));
        }
        if !self.center.iter().all(|c| c.is_finite()) {
            return Err(GeneratorError::invalid("center must be finite"));
        }
        Ok(())
    }

    /// Number of vertices `jittered_sphere` will produce.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        (self.rings.saturating_sub(1)) * self.segments + 2
    }
}

/// Draw a sphere whose vertices are displaced radially, reproducibly per token.
pub fn jittered_sphere(cfg: SphereCfg, tok: ReplayToken) -> Result<SurfaceMesh, GeneratorError> {
    cfg.validate()?;
    let mut rng = tok.to_std_rng();
    let j = cfg.radial_jitter;
    Ok(build_sphere(cfg.center, cfg.rings, cfg.segments, |_| {
        let u = if j > 0.0 { rng.gen_range(-j..=j) } else { 0.0 };
        cfg.radius * (1.0 + u)
    }))
}

fn build_sphere(
    center: Vec3,
    rings: usize,
    segments: usize,
    mut radius_of: impl FnMut(usize) -> f64,
) -> SurfaceMesh {
    let pi = std::f64::consts::PI;
    let mut vertices = Vec::with_capacity((rings - 1) * segments + 2);
    let mut push = |dir: Vec3, vertices: &mut Vec<Vec3>| {
        let r = radius_of(vertices.len());
        vertices.push(center + dir * r);
    };
    push(vector![0.0, 0.0, 1.0], &mut vertices);
    for r in 1..rings {
        let theta = pi * r as f64 / rings as f64;
        for s in 0..segments {
            let phi = 2.0 * pi * s as f64 / segments as f64;
            let dir = vector![theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos()];
            push(dir, &mut vertices);
        }
    }
    push(vector![0.0, 0.0, -1.0], &mut vertices);

    let row = |r: usize, s: usize| 1 + r * segments + (s % segments);
    let south = vertices.len() - 1;
    let mut faces = Vec::with_capacity(2 * segments * (rings - 1));
    for s in 0..segments {
        faces.push([0, row(0, s), row(0, s + 1)]);
    }
    for r in 0..rings - 2 {
        for s in 0..segments {
            let (a, b) = (row(r, s), row(r, s + 1));
            let (c, d) = (row(r + 1, s), row(r + 1, s + 1));
            faces.push([a, c, d]);
            faces.push([a, d, b]);
        }
    }
    for s in 0..segments {
        faces.push([south, row(rings - 2, s + 1), row(rings - 2, s)]);
    }
    SurfaceMesh::new(vertices, faces)
}
