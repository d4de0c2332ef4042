//! Mesh types: indexed triangle surface plus the present/absent wrapper.

use std::fmt;

use nalgebra::Vector3;

/// Vertex / point in R³.
pub type Vec3 = Vector3<f64>;

/// Triangle as three indices into the owning vertex list.
pub type Face = [usize; 3];

/// Indexed triangle surface.
///
/// Invariants (caller-guaranteed, see `validate`):
/// - every face index is `< vertices.len()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfaceMesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
}

impl SurfaceMesh {
    #[inline]
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Corner positions of face `face`.
    #[inline]
    pub fn triangle(&self, face: &Face) -> [Vec3; 3] {
        [
            self.vertices[face[0]],
            self.vertices[face[1]],
            self.vertices[face[2]],
        ]
    }

    /// Iterate triangles in face order.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.faces.iter().map(move |f| self.triangle(f))
    }

    /// Translate every vertex by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| v + offset).collect(),
            faces: self.faces.clone(),
        }
    }

    /// Check index bounds and vertex finiteness.
    ///
    /// The distance routines assume valid input; loaders call this once.
    pub fn validate(&self) -> Result<(), MeshError> {
        if let Some(index) = self.vertices.iter().position(|v| !v.iter().all(|c| c.is_finite())) {
            return Err(MeshError::NonFiniteVertex { index });
        }
        let n = self.vertices.len();
        for (face, f) in self.faces.iter().enumerate() {
            if let Some(&index) = f.iter().find(|&&i| i >= n) {
                return Err(MeshError::FaceIndexOutOfRange {
                    face,
                    index,
                    vertex_count: n,
                });
            }
        }
        Ok(())
    }
}

/// A surface that may be missing (mask not found, empty segmentation).
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Mesh {
    Present(SurfaceMesh),
    #[default]
    Absent,
}

impl Mesh {
    /// Wrap raw arrays; empty vertex or face lists become `Absent`.
    pub fn from_parts(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        if vertices.is_empty() || faces.is_empty() {
            Mesh::Absent
        } else {
            Mesh::Present(SurfaceMesh::new(vertices, faces))
        }
    }

    #[inline]
    pub fn as_surface(&self) -> Option<&SurfaceMesh> {
        match self {
            Mesh::Present(s) => Some(s),
            Mesh::Absent => None,
        }
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Mesh::Absent)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.as_surface().map_or(0, SurfaceMesh::vertex_count)
    }
}

impl From<SurfaceMesh> for Mesh {
    fn from(s: SurfaceMesh) -> Self {
        Mesh::from_parts(s.vertices, s.faces)
    }
}

impl From<Option<SurfaceMesh>> for Mesh {
    fn from(s: Option<SurfaceMesh>) -> Self {
        s.map_or(Mesh::Absent, Mesh::from)
    }
}

/// Input problems detected by `SurfaceMesh::validate`.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A face references a vertex that does not exist.
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
    /// A vertex has a NaN or infinite coordinate.
    NonFiniteVertex { index: usize },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::FaceIndexOutOfRange {
                face,
                index,
                vertex_count,
            } => write!(
                f,
                "face {face} references vertex {index}, but the mesh has {vertex_count} vertices"
            ),
            MeshError::NonFiniteVertex { index } => {
                write!(f, "vertex {index} has a non-finite coordinate")
            }
        }
    }
}

impl std::error::Error for MeshError {}
