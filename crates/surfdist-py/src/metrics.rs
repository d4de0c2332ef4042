use crate::common::{mesh_from_py, point_to_py, PyFaces, PyVerts};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;
use surfdist::distance::{calculate_surface_metrics as symmetric, surface_distances as scan};

type Point = (f64, f64, f64);

/// `{"avg_symm_surface_dist": .., "hausdorff_dist": ..}`; zeros if either
/// surface is missing.
#[pyfunction]
pub fn calculate_surface_metrics(
    py: Python<'_>,
    verts_a: PyVerts,
    faces_a: PyFaces,
    verts_b: PyVerts,
    faces_b: PyFaces,
) -> PyResult<HashMap<&'static str, f64>> {
    let a = mesh_from_py(verts_a, faces_a)?;
    let b = mesh_from_py(verts_b, faces_b)?;
    let m = py.allow_threads(|| symmetric(&a, &b));
    Ok(HashMap::from([
        ("avg_symm_surface_dist", m.avg_symm_surface_dist),
        ("hausdorff_dist", m.hausdorff_dist),
    ]))
}

/// `(distances, mean, max, p_src, p_tgt)` for source → target. The points
/// are the Hausdorff witness pair, `None` when no distance exceeded zero.
#[pyfunction]
#[pyo3(signature = (verts_src, faces_src, verts_tgt, faces_tgt, max_dist = f64::INFINITY))]
pub fn surface_distances(
    py: Python<'_>,
    verts_src: PyVerts,
    faces_src: PyFaces,
    verts_tgt: PyVerts,
    faces_tgt: PyFaces,
    max_dist: f64,
) -> PyResult<(Vec<f64>, f64, f64, Option<Point>, Option<Point>)> {
    if max_dist.is_nan() || max_dist < 0.0 {
        return Err(PyValueError::new_err("max_dist must be non-negative"));
    }
    let src = mesh_from_py(verts_src, faces_src)?;
    let tgt = mesh_from_py(verts_tgt, faces_tgt)?;
    let r = py.allow_threads(|| scan(&src, &tgt, max_dist));
    let p_src = r.witness.as_ref().map(|w| point_to_py(&w.source));
    let p_tgt = r
        .witness
        .as_ref()
        .and_then(|w| w.target.as_ref().map(point_to_py));
    Ok((r.distances, r.mean, r.max, p_src, p_tgt))
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(calculate_surface_metrics, m)?)?;
    m.add_function(wrap_pyfunction!(surface_distances, m)?)?;
    Ok(())
}
