//! PyO3 bindings for the `surfdist` metrics.
//!
//! Notes
//! - Keep bindings thin: the Python side passes marching-cubes output as
//!   nested lists (or `None` for a missing surface) and gets plain floats,
//!   lists and tuples back.
//! - Scans release the GIL.

use pyo3::prelude::*;

mod common;
mod metrics;

#[pymodule]
fn surfdist_native(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add("__version__", surfdist::VERSION)?;
    metrics::register(m)?;
    Ok(())
}
