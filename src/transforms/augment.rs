//! Elastic deformation for data augmentation.
//!
//! A deformation is built on a coarse grid of uniform noise, smoothed with a
//! Gaussian, scaled, and upsampled to full resolution, giving a smooth field
//! of per-pixel source coordinates. The same field is applied to every
//! volume passed to [`deform`], so images and their labels stay aligned.

use ndarray::Array2;
use rand::Rng;

use super::filter::gaussian_filter;
use super::interpolate::zoom_linear;
use super::resample::{check_matching_xy, resample};
use crate::error::{Error, Result};
use crate::random::get_rng;
use crate::volume::Volume;

/// Elastic deformation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeformationSettings {
    /// Coarse grid cell size in pixels; larger values give broader distortions
    pub scale: usize,
    /// Displacement magnitude in pixels
    pub alpha: f64,
    /// Gaussian smoothing bandwidth on the coarse grid
    pub sigma: f64,
}

impl Default for DeformationSettings {
    fn default() -> Self {
        Self {
            scale: 40,
            alpha: 20.0,
            sigma: 0.6,
        }
    }
}

impl DeformationSettings {
    /// Create settings with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the coarse grid cell size.
    pub fn scale(mut self, scale: usize) -> Self {
        self.scale = scale;
        self
    }

    /// Set the displacement magnitude.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the smoothing bandwidth.
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Check that every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        if self.scale == 0 {
            return Err(Error::Configuration("scale must be positive".into()));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(Error::Configuration(format!(
                "alpha must be finite and non-negative (got {})",
                self.alpha
            )));
        }
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(Error::Configuration(format!(
                "sigma must be finite and positive (got {})",
                self.sigma
            )));
        }
        Ok(())
    }
}

/// Per-pixel source coordinates for a 2D resampling.
///
/// Both coordinate lists are flattened in row-major order over `shape` and
/// lie within `[0, shape[axis] - 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplacementField {
    shape: [usize; 2],
    x: Vec<f64>,
    y: Vec<f64>,
}

impl DisplacementField {
    /// The no-op field: every pixel samples itself.
    pub fn identity(shape: [usize; 2]) -> Self {
        let (x, y) = (0..shape[0])
            .flat_map(|i| (0..shape[1]).map(move |j| (i as f64, j as f64)))
            .unzip();
        Self { shape, x, y }
    }

    /// Build a field from explicit coordinate lists, validating lengths and bounds.
    pub fn from_indices(shape: [usize; 2], x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        let n = shape[0] * shape[1];
        if x.len() != n || y.len() != n {
            return Err(Error::ShapeMismatch(format!(
                "coordinate lists of length {} and {} do not match shape {:?}",
                x.len(),
                y.len(),
                shape
            )));
        }
        let in_bounds = |coords: &[f64], extent: usize| {
            coords
                .iter()
                .all(|&c| c.is_finite() && c >= 0.0 && c <= (extent - 1) as f64)
        };
        if !in_bounds(&x, shape[0]) || !in_bounds(&y, shape[1]) {
            return Err(Error::ShapeMismatch(format!(
                "coordinates fall outside shape {:?}",
                shape
            )));
        }
        Ok(Self { shape, x, y })
    }

    /// 2D extent the field was built for.
    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }

    /// Source coordinates along the first axis.
    pub fn x_indices(&self) -> &[f64] {
        &self.x
    }

    /// Source coordinates along the second axis.
    pub fn y_indices(&self) -> &[f64] {
        &self.y
    }

    /// Number of pixels covered.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True for a zero-area field.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Flat row-major source offset of the nearest pixel, per output pixel.
    pub fn nearest_indices(&self) -> Vec<usize> {
        let cols = self.shape[1];
        self.x
            .iter()
            .zip(&self.y)
            .map(|(&x, &y)| x.round() as usize * cols + y.round() as usize)
            .collect()
    }

    /// Whether every pixel maps to itself under nearest-neighbor lookup.
    pub fn is_identity(&self) -> bool {
        self.nearest_indices()
            .iter()
            .enumerate()
            .all(|(i, &src)| i == src)
    }
}

/// Synthesize a smooth displacement field for a 2D `shape`.
///
/// Two coarse grids of `shape / scale` uniform samples in `[-1, 1]` are
/// smoothed with a Gaussian of `sigma`, scaled by `alpha`, upsampled to
/// `shape`, added to the pixel mesh, and clipped to the image bounds. The
/// same seed always produces the same field.
///
/// Upsampling is piecewise linear: the field agrees with a cubic-spline
/// zoom at the coarse grid knots but is not identical to it between them.
///
/// # Arguments
///
/// * `shape` - 2D (X, Y) extent of the images to deform
/// * `settings` - Coarse grid scale, displacement magnitude and smoothing
/// * `seed` - Optional random seed for reproducibility
#[must_use = "this function returns a Result and does not modify its inputs"]
pub fn generate_deformation_field(
    shape: &[usize],
    settings: &DeformationSettings,
    seed: Option<u64>,
) -> Result<DisplacementField> {
    let &[rows, cols] = shape else {
        return Err(Error::InvalidDimensions(format!(
            "deformation shape must have 2 elements (got {:?})",
            shape
        )));
    };
    settings.validate()?;

    let coarse = (rows / settings.scale, cols / settings.scale);
    if coarse.0 == 0 || coarse.1 == 0 {
        return Err(Error::Configuration(format!(
            "scale {} is larger than deformation shape {:?}",
            settings.scale, shape
        )));
    }
    tracing::debug!(
        rows,
        cols,
        coarse_rows = coarse.0,
        coarse_cols = coarse.1,
        alpha = settings.alpha,
        sigma = settings.sigma,
        "generating deformation field"
    );

    let mut rng = get_rng(seed, "generate_deformation_field");
    let mut coarse_noise = || {
        let noise = Array2::from_shape_simple_fn(coarse, || rng.gen::<f64>() * 2.0 - 1.0);
        gaussian_filter(&noise, settings.sigma) * settings.alpha
    };
    let dx_small = coarse_noise();
    let dy_small = coarse_noise();

    let dx = zoom_linear(&dx_small, [rows, cols]);
    let dy = zoom_linear(&dy_small, [rows, cols]);

    let x_max = (rows - 1) as f64;
    let y_max = (cols - 1) as f64;
    let x = dx
        .indexed_iter()
        .map(|((i, _), &d)| (i as f64 + d).clamp(0.0, x_max))
        .collect();
    let y = dy
        .indexed_iter()
        .map(|((_, j), &d)| (j as f64 + d).clamp(0.0, y_max))
        .collect();

    Ok(DisplacementField {
        shape: [rows, cols],
        x,
        y,
    })
}

/// Apply one random elastic deformation to every volume.
///
/// All volumes must share their trailing (X, Y) extent; 3D and 4D volumes
/// are deformed slice by slice with the same field. Returns the deformed
/// volumes in input order.
///
/// # Arguments
///
/// * `volumes` - 2D, 3D or channel-first 4D volumes sharing their (X, Y) extent
/// * `settings` - Deformation parameters (see [`DeformationSettings`])
/// * `seed` - Optional random seed for reproducibility
///
/// # Example
///
/// ```
/// use ndarray::Array3;
/// use voxtile::transforms::{deform, DeformationSettings};
/// use voxtile::Volume;
///
/// let image = Volume::from(Array3::<f32>::zeros((4, 80, 80)));
/// let label = Volume::from(Array3::<u8>::zeros((4, 80, 80)).mapv(f32::from));
/// let out = deform(&[image, label], &DeformationSettings::default(), Some(7))?;
/// assert_eq!(out.len(), 2);
/// # Ok::<(), voxtile::Error>(())
/// ```
#[must_use = "this function returns new volumes and does not modify the originals"]
pub fn deform<T: Clone + Send + Sync>(
    volumes: &[Volume<T>],
    settings: &DeformationSettings,
    seed: Option<u64>,
) -> Result<Vec<Volume<T>>> {
    let Some(first) = volumes.first() else {
        return Ok(Vec::new());
    };
    check_matching_xy(volumes)?;

    let field = generate_deformation_field(&first.xy_shape(), settings, seed)?;
    resample(volumes, &field)
}

/// Apply a random elastic deformation to a single volume.
#[must_use = "this function returns a new volume and does not modify the original"]
pub fn deform_one<T: Clone + Send + Sync>(
    volume: &Volume<T>,
    settings: &DeformationSettings,
    seed: Option<u64>,
) -> Result<Volume<T>> {
    let field = generate_deformation_field(&volume.xy_shape(), settings, seed)?;
    super::resample::resample_one(volume, &field)
}
