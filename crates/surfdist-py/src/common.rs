use nalgebra::Vector3;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use surfdist::{Mesh, SurfaceMesh, Vec3};

pub type PyVerts = Option<Vec<(f64, f64, f64)>>;
pub type PyFaces = Option<Vec<(usize, usize, usize)>>;

/// `None` or empty arrays become `Mesh::Absent`; bad indices raise `ValueError`.
pub fn mesh_from_py(verts: PyVerts, faces: PyFaces) -> PyResult<Mesh> {
    let (Some(verts), Some(faces)) = (verts, faces) else {
        return Ok(Mesh::Absent);
    };
    let surface = SurfaceMesh::new(
        verts.into_iter().map(|(x, y, z)| Vector3::new(x, y, z)).collect(),
        faces.into_iter().map(|(i, j, k)| [i, j, k]).collect(),
    );
    surface
        .validate()
        .map_err(|err| PyValueError::new_err(err.to_string()))?;
    Ok(Mesh::from(surface))
}

pub fn point_to_py(p: &Vec3) -> (f64, f64, f64) {
    (p.x, p.y, p.z)
}
