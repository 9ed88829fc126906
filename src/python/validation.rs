//! Validation helpers for Python boundary.
//!
//! Converts crate errors into Python exceptions and parses loosely-typed
//! Python arguments into the crate's typed inputs.

use numpy::PyReadonlyArrayDyn;
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::error::Error as VoxtileError;
use crate::transforms::DeformationSettings;
use crate::volume::Volume;
use crate::windowing::CornerPoints;

/// Convert a voxtile Error to the appropriate Python exception.
pub fn to_py_err(e: VoxtileError, context: &str) -> PyErr {
    match &e {
        VoxtileError::InvalidDimensions(msg) => {
            PyTypeError::new_err(format!("{}: {}", context, msg))
        }
        VoxtileError::ShapeMismatch(msg) | VoxtileError::Configuration(msg) => {
            PyValueError::new_err(format!("{}: {}", context, msg))
        }
        VoxtileError::Array(err) => PyValueError::new_err(format!("{}: {}", context, err)),
    }
}

/// Validate a 3-element shape vector and return it as an array.
pub fn parse_shape3(values: &[usize], name: &str) -> PyResult<[usize; 3]> {
    match *values {
        [z, x, y] => Ok([z, x, y]),
        _ => Err(PyValueError::new_err(format!(
            "{} must be a 3-element sequence (got {})",
            name,
            values.len()
        ))),
    }
}

/// Build corner points from a `[z_list, x_list, y_list]` Python value.
pub fn parse_corner_points(corner_points: Vec<Vec<isize>>) -> PyResult<CornerPoints> {
    let Ok([z, x, y]) = <[Vec<isize>; 3]>::try_from(corner_points) else {
        return Err(PyValueError::new_err(
            "corner_points must contain exactly three lists (z, x, y)",
        ));
    };
    Ok(CornerPoints::new(z, x, y))
}

/// Convert corner points back to nested Python lists.
pub fn corner_points_to_lists(corners: CornerPoints) -> Vec<Vec<isize>> {
    vec![corners.z, corners.x, corners.y]
}

/// Parse an optional settings dict; missing keys keep their defaults.
pub fn parse_deformation_settings(
    settings: Option<&Bound<'_, PyDict>>,
    context: &str,
) -> PyResult<DeformationSettings> {
    let mut parsed = DeformationSettings::default();
    let Some(settings) = settings else {
        return Ok(parsed);
    };

    for (key, value) in settings.iter() {
        let key: String = key.extract()?;
        match key.as_str() {
            "scale" => parsed.scale = value.extract()?,
            "alpha" => parsed.alpha = value.extract()?,
            "sigma" => parsed.sigma = value.extract()?,
            other => {
                return Err(to_py_err(
                    VoxtileError::Configuration(format!(
                        "unknown deformation setting '{}'",
                        other
                    )),
                    context,
                ))
            }
        }
    }

    parsed.validate().map_err(|e| to_py_err(e, context))?;
    Ok(parsed)
}

/// Copy a numpy array into an owned volume.
pub fn volume_from_numpy(array: PyReadonlyArrayDyn<'_, f32>, context: &str) -> PyResult<Volume<f32>> {
    Volume::from_dyn(array.as_array().to_owned()).map_err(|e| to_py_err(e, context))
}
