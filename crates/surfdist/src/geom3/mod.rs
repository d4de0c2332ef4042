//! 3D triangle-mesh geometry (surfaces from isosurface extraction).
//!
//! Purpose
//! - Hold the mesh representation consumed by the distance engine and the
//!   exact point-to-segment / point-to-triangle primitives it is built on.
//! - Keep the kernel free of shared state so it can run on any thread.
//!
//! Conventions
//! - Vertices are `Vector3<f64>` in physical units (voxel spacing applied
//!   upstream). Faces are index triples into the vertex list.
//! - A missing or empty surface is `Mesh::Absent`, never an error.
//! - Degenerate segments and triangles fall back to edge/endpoint minima;
//!   thresholds live in `crate::cfg`.

mod kernel;
mod types;

pub use kernel::{point_to_edges_distance, point_to_segment_distance, point_to_triangle_distance};
pub use types::{Face, Mesh, MeshError, SurfaceMesh, Vec3};
