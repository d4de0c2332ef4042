//! Mesh JSON files: `{"vertices": [[x, y, z], ...], "faces": [[i, j, k], ...]}`.
//!
//! This is the hand-off format from the marching-cubes step (vertices already
//! scaled by voxel spacing). Empty arrays load as a missing surface.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use surfdist::{Mesh, SurfaceMesh, Vec3};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MeshFile {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<[usize; 3]>,
}

impl From<&SurfaceMesh> for MeshFile {
    fn from(s: &SurfaceMesh) -> Self {
        Self {
            vertices: s.vertices.iter().map(|v| [v.x, v.y, v.z]).collect(),
            faces: s.faces.clone(),
        }
    }
}

impl MeshFile {
    pub fn into_surface(self) -> SurfaceMesh {
        SurfaceMesh::new(
            self.vertices.into_iter().map(|[x, y, z]| Vec3::new(x, y, z)).collect(),
            self.faces,
        )
    }
}

/// Load and validate a mesh file.
pub fn load_mesh(path: &Path) -> Result<Mesh> {
    let bytes = fs::read(path).with_context(|| format!("reading mesh {}", path.display()))?;
    let file: MeshFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing mesh {}", path.display()))?;
    let surface = file.into_surface();
    surface
        .validate()
        .with_context(|| format!("invalid mesh {}", path.display()))?;
    let mesh = Mesh::from(surface);
    if mesh.is_absent() {
        tracing::warn!(path = %path.display(), "mesh is empty; treating the surface as missing");
    }
    Ok(mesh)
}

pub fn save_mesh(path: &Path, surface: &SurfaceMesh) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let doc = serde_json::to_vec(&MeshFile::from(surface))?;
    fs::write(path, doc).with_context(|| format!("writing mesh {}", path.display()))?;
    Ok(())
}
