//! Window corner generation and conjugate corner mapping.

use rand::Rng;

use crate::error::{Error, Result};
use crate::random::get_rng;
use crate::windowing::WindowShape;

/// Per-axis window start coordinates.
///
/// The full corner set is the Cartesian product `z × x × y`; the three
/// lists are independent and may have different lengths. Coordinates are
/// signed because conjugate corners can start before the volume edge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CornerPoints {
    /// Z coordinates.
    pub z: Vec<isize>,
    /// X coordinates.
    pub x: Vec<isize>,
    /// Y coordinates.
    pub y: Vec<isize>,
}

impl CornerPoints {
    /// Create a corner set from its three axis lists.
    pub fn new(z: Vec<isize>, x: Vec<isize>, y: Vec<isize>) -> Self {
        Self { z, x, y }
    }

    /// The axis lists in (Z, X, Y) order.
    pub fn axes(&self) -> [&[isize]; 3] {
        [&self.z, &self.x, &self.y]
    }

    /// Number of corners along each axis.
    pub fn counts(&self) -> [usize; 3] {
        [self.z.len(), self.x.len(), self.y.len()]
    }

    /// Total number of windows the corner set describes.
    pub fn len(&self) -> usize {
        self.counts().iter().product()
    }

    /// True when any axis has no corners.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate corner triples with Z outermost and Y innermost.
    pub fn iter(&self) -> impl Iterator<Item = [isize; 3]> + '_ {
        self.z.iter().flat_map(move |&z| {
            self.x
                .iter()
                .flat_map(move |&x| self.y.iter().map(move |&y| [z, x, y]))
        })
    }
}

/// Generate window corners for a volume of `spatial_shape`.
///
/// Along each axis the usable length is `extent - window + 1`. A usable
/// length of 1 yields the single corner 0. Otherwise the axis is split into
/// `ceil(usable / spacing)` bins:
///
/// - grid mode places a corner at the start of every bin and appends
///   `usable - 1` when needed, so the last window always touches the far edge;
/// - random mode draws one corner uniformly from each bin using a generator
///   seeded from `seed` (a fresh seed is drawn and logged when `None`).
///
/// All shapes are (Z, X, Y); use a Z extent of 1 for 2D windows.
///
/// # Arguments
///
/// * `spatial_shape` - Volume extent
/// * `window_shape` - Window extent; no axis may exceed the volume
/// * `window_spacing` - Stride between successive grid corners
/// * `random` - Jitter one corner within each grid bin instead of using the bin start
/// * `seed` - Optional random seed for reproducibility
#[must_use = "this function returns a Result and has no side effects"]
pub fn generate_corner_points(
    spatial_shape: [usize; 3],
    window_shape: [usize; 3],
    window_spacing: [usize; 3],
    random: bool,
    seed: Option<u64>,
) -> Result<CornerPoints> {
    for k in 0..3 {
        if window_shape[k] == 0 {
            return Err(Error::Configuration(format!(
                "window_shape[{}] must be positive",
                k
            )));
        }
        if window_spacing[k] == 0 {
            return Err(Error::Configuration(format!(
                "window_spacing[{}] must be positive",
                k
            )));
        }
        if window_shape[k] > spatial_shape[k] {
            return Err(Error::ShapeMismatch(format!(
                "window_shape[{}]={} exceeds volume extent[{}]={}",
                k, window_shape[k], k, spatial_shape[k]
            )));
        }
    }

    let mut rng = if random {
        Some(get_rng(seed, "generate_corner_points"))
    } else {
        None
    };

    let mut axes: [Vec<isize>; 3] = Default::default();
    for (k, corners) in axes.iter_mut().enumerate() {
        let usable = spatial_shape[k] - window_shape[k] + 1;
        *corners = match rng.as_mut() {
            Some(rng) => random_axis_corners(usable, window_spacing[k], rng),
            None => grid_axis_corners(usable, window_spacing[k]),
        };
    }

    let [z, x, y] = axes;
    let corners = CornerPoints::new(z, x, y);
    tracing::debug!(
        random,
        counts = ?corners.counts(),
        total = corners.len(),
        "generated window corners"
    );
    Ok(corners)
}

fn grid_axis_corners(usable: usize, spacing: usize) -> Vec<isize> {
    if usable == 1 {
        return vec![0];
    }

    let n_bins = usable.div_ceil(spacing);
    let mut corners: Vec<isize> = (0..n_bins).map(|i| (spacing * i) as isize).collect();
    let last = (usable - 1) as isize;
    if corners.last() != Some(&last) {
        corners.push(last);
    }
    corners
}

fn random_axis_corners<R: Rng>(usable: usize, spacing: usize, rng: &mut R) -> Vec<isize> {
    if usable == 1 {
        return vec![0];
    }

    let n_bins = usable.div_ceil(spacing);
    let bins: Vec<usize> = (0..=n_bins).map(|i| (spacing * i).min(usable)).collect();
    bins.windows(2)
        .map(|edges| rng.gen_range(edges[0]..edges[1]) as isize)
        .collect()
}

/// Shift corners computed for `window_shape` so that windows of
/// `conjugate_window_shape` cut at the new corners share their centers.
///
/// Both shapes must have the same number of axes (2 or 3), each conjugate
/// extent must be at least the original, and every per-axis difference must
/// be even. Corners are not clipped; out-of-bounds starts are resolved by
/// reflection at extraction time.
///
/// # Arguments
///
/// * `corner_points` - Corners generated for `window_shape`
/// * `window_shape` - 2D or 3D window the corners belong to
/// * `conjugate_window_shape` - Larger window with the same number of axes
///
/// # Example
///
/// ```
/// use voxtile::windowing::{map_conjugate_corners, CornerPoints};
///
/// let corners = CornerPoints::new(vec![10], vec![20], vec![18]);
/// let conjugate = map_conjugate_corners(&corners, &[2, 4, 3], &[4, 8, 5]).unwrap();
/// assert_eq!(conjugate, CornerPoints::new(vec![9], vec![18], vec![17]));
/// ```
#[must_use = "this function returns new corners and does not modify the input"]
pub fn map_conjugate_corners(
    corner_points: &CornerPoints,
    window_shape: &[usize],
    conjugate_window_shape: &[usize],
) -> Result<CornerPoints> {
    if window_shape.len() != conjugate_window_shape.len() {
        return Err(Error::ShapeMismatch(format!(
            "conjugate window shape {:?} and window shape {:?} have different axis counts",
            conjugate_window_shape, window_shape
        )));
    }

    let inner = WindowShape::from_slice(window_shape)?.extent();
    let outer = WindowShape::from_slice(conjugate_window_shape)?.extent();

    let mut offsets = [0isize; 3];
    for k in 0..3 {
        if outer[k] < inner[k] {
            return Err(Error::ShapeMismatch(format!(
                "conjugate extent {} is smaller than window extent {} on axis {}",
                outer[k], inner[k], k
            )));
        }
        let delta = outer[k] - inner[k];
        if delta % 2 != 0 {
            return Err(Error::ShapeMismatch(format!(
                "conjugate and window extents on axis {} differ by an odd amount ({})",
                k, delta
            )));
        }
        offsets[k] = (delta / 2) as isize;
    }

    let shift = |corners: &[isize], offset: isize| -> Vec<isize> {
        corners.iter().map(|&c| c - offset).collect()
    };

    Ok(CornerPoints::new(
        shift(&corner_points.z, offsets[0]),
        shift(&corner_points.x, offsets[1]),
        shift(&corner_points.y, offsets[2]),
    ))
}
