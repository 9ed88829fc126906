//! Elastic deformation functions for Python bindings.

use numpy::{IntoPyArray, PyArray1, PyArrayDyn, PyReadonlyArrayDyn};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::validation::{parse_deformation_settings, to_py_err, volume_from_numpy};
use crate::transforms;

/// Build an elastic deformation map for a 2D shape.
///
/// Args:
///     shape: [x, y] extent of the images to deform
///     deformation_settings: Optional dict with `scale`, `alpha`, `sigma`
///         (defaults: 40, 20, 0.6)
///     random_seed: Optional seed for a reproducible map
///
/// Returns:
///     (x_indices, y_indices), flattened source coordinates per pixel
#[pyfunction]
#[pyo3(signature = (shape, deformation_settings=None, random_seed=None))]
pub fn deformation_map<'py>(
    py: Python<'py>,
    shape: Vec<usize>,
    deformation_settings: Option<&Bound<'py, PyDict>>,
    random_seed: Option<u64>,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
    let settings = parse_deformation_settings(deformation_settings, "deformation_map")?;
    let field = transforms::generate_deformation_field(&shape, &settings, random_seed)
        .map_err(|e| to_py_err(e, "deformation_map"))?;

    Ok((
        field.x_indices().to_vec().into_pyarray(py),
        field.y_indices().to_vec().into_pyarray(py),
    ))
}

/// Apply one elastic deformation to a collection of volumes.
///
/// All volumes must share their last two dimensions. 3D and 4D volumes are
/// deformed slice by slice with the same map.
///
/// Args:
///     volumes: List of 2D, 3D, or channel-first 4D float32 arrays
///     deformation_settings: Optional dict with `scale`, `alpha`, `sigma`
///     random_seed: Optional seed for reproducibility
///
/// Returns:
///     List of deformed volumes, in input order
///
/// Example:
///     >>> image, label = voxtile.deform([image, label], {"alpha": 10}, random_seed=3)
#[pyfunction]
#[pyo3(signature = (volumes, deformation_settings=None, random_seed=None))]
pub fn deform<'py>(
    py: Python<'py>,
    volumes: Vec<PyReadonlyArrayDyn<'py, f32>>,
    deformation_settings: Option<&Bound<'py, PyDict>>,
    random_seed: Option<u64>,
) -> PyResult<Vec<Bound<'py, PyArrayDyn<f32>>>> {
    let settings = parse_deformation_settings(deformation_settings, "deform")?;
    let volumes = volumes
        .into_iter()
        .map(|v| volume_from_numpy(v, "deform"))
        .collect::<PyResult<Vec<_>>>()?;

    let deformed = py
        .allow_threads(|| transforms::deform(&volumes, &settings, random_seed))
        .map_err(|e| to_py_err(e, "deform"))?;

    Ok(deformed
        .into_iter()
        .map(|v| v.into_dyn().into_pyarray(py))
        .collect())
}
