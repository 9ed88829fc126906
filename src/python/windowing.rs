//! Windowing functions for Python bindings.

use numpy::{IntoPyArray, PyArrayDyn, PyReadonlyArrayDyn};
use pyo3::prelude::*;

use super::validation::{
    corner_points_to_lists, parse_corner_points, parse_shape3, to_py_err, volume_from_numpy,
};
use crate::windowing::{self, WindowConfig};

/// Generate window corner coordinate lists for a volume.
///
/// Args:
///     spatial_shape: Volume extent as [z, x, y]
///     window_shape: Window extent as [z, x, y]; use z=1 for 2D windows
///     window_spacing: Stride between corners as [z, x, y]
///     random_windowing: Draw one corner at random within each grid bin
///     random_seed: Optional seed for reproducible random corners
///
/// Returns:
///     [z_corners, x_corners, y_corners]
///
/// Example:
///     >>> voxtile.gen_corner_points([5, 10, 10], [1, 4, 4], [1, 4, 4], False)
///     [[0, 1, 2, 3, 4], [0, 4, 6], [0, 4, 6]]
#[pyfunction]
#[pyo3(signature = (spatial_shape, window_shape, window_spacing, random_windowing=true, random_seed=None))]
pub fn gen_corner_points(
    spatial_shape: Vec<usize>,
    window_shape: Vec<usize>,
    window_spacing: Vec<usize>,
    random_windowing: bool,
    random_seed: Option<u64>,
) -> PyResult<Vec<Vec<isize>>> {
    let corners = windowing::generate_corner_points(
        parse_shape3(&spatial_shape, "spatial_shape")?,
        parse_shape3(&window_shape, "window_shape")?,
        parse_shape3(&window_spacing, "window_spacing")?,
        random_windowing,
        random_seed,
    )
    .map_err(|e| to_py_err(e, "gen_corner_points"))?;
    Ok(corner_points_to_lists(corners))
}

/// Shift corner points so larger windows share the original windows' centers.
///
/// Args:
///     corner_points: [z_corners, x_corners, y_corners] for `window_shape`
///     window_shape: 2D or 3D shape the corners were generated for
///     conjugate_window_shape: Larger shape; differences must be even
///
/// Returns:
///     Conjugate corner lists, possibly negative near the volume edge
#[pyfunction]
pub fn gen_conjugate_corners(
    corner_points: Vec<Vec<isize>>,
    window_shape: Vec<usize>,
    conjugate_window_shape: Vec<usize>,
) -> PyResult<Vec<Vec<isize>>> {
    let corners = parse_corner_points(corner_points)?;
    let conjugate =
        windowing::map_conjugate_corners(&corners, &window_shape, &conjugate_window_shape)
            .map_err(|e| to_py_err(e, "gen_conjugate_corners"))?;
    Ok(corner_points_to_lists(conjugate))
}

/// Cut a volume into windows.
///
/// Args:
///     data_volume: 2D, 3D, or channel-first 4D float32 array
///     window_shape: [x, y] for 2D windows or [z, x, y]
///     window_spacing: Optional stride between corners; overrides the overlap
///     forward_window_overlap: Optional overlap between windows (default: none)
///     random_windowing: Draw corners at random within each grid bin
///     random_seed: Optional seed for reproducible random corners
///
/// Returns:
///     List of windows in z, x, y order
#[pyfunction]
#[pyo3(signature = (data_volume, window_shape, window_spacing=None, forward_window_overlap=None, random_windowing=false, random_seed=None))]
pub fn window_generator<'py>(
    py: Python<'py>,
    data_volume: PyReadonlyArrayDyn<'py, f32>,
    window_shape: Vec<usize>,
    window_spacing: Option<Vec<usize>>,
    forward_window_overlap: Option<Vec<usize>>,
    random_windowing: bool,
    random_seed: Option<u64>,
) -> PyResult<Vec<Bound<'py, PyArrayDyn<f32>>>> {
    let volume = volume_from_numpy(data_volume, "window_generator")?;

    let mut config = WindowConfig::new(&window_shape).seed_opt(random_seed);
    if let Some(spacing) = window_spacing {
        config = config.spacing(&spacing);
    }
    if let Some(overlap) = forward_window_overlap {
        config = config.overlap(&overlap);
    }
    if random_windowing {
        config = config.randomize();
    }

    let windows = py
        .allow_threads(|| {
            let corners = config.corner_points(volume.spatial_shape())?;
            windowing::extract_all_windows(&volume, &config.shape, &corners)
        })
        .map_err(|e| to_py_err(e, "window_generator"))?;

    Ok(windows
        .into_iter()
        .map(|w| w.into_dyn().into_pyarray(py))
        .collect())
}
