//! Python module definition.

use pyo3::prelude::*;

use super::{augmentation, windowing};

#[pymodule]
fn _voxtile(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Windowing
    m.add_function(wrap_pyfunction!(windowing::gen_corner_points, m)?)?;
    m.add_function(wrap_pyfunction!(windowing::gen_conjugate_corners, m)?)?;
    m.add_function(wrap_pyfunction!(windowing::window_generator, m)?)?;

    // Elastic deformation
    m.add_function(wrap_pyfunction!(augmentation::deformation_map, m)?)?;
    m.add_function(wrap_pyfunction!(augmentation::deform, m)?)?;

    Ok(())
}
