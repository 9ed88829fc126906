//! Lazy window extraction.

use std::iter::FusedIterator;

use ndarray::{ArrayView4, Axis};
use rayon::prelude::*;

use super::corners::CornerPoints;
use super::range::reflective_range;
use super::WindowShape;
use crate::error::{Error, Result};
use crate::volume::Volume;

/// Iterator over the windows of a volume, in Z-outer, X, Y-inner order.
///
/// Every reflected index range is resolved when the iterator is built, so
/// invalid corners fail up front instead of midway through iteration. Each
/// yielded window owns its data.
#[derive(Debug, Clone)]
pub struct Windows<'a, T> {
    source: ArrayView4<'a, T>,
    ranges: [Vec<Vec<usize>>; 3],
    drop_depth: bool,
    keep_channels: bool,
    next: usize,
    total: usize,
}

/// Cut windows of `window_shape` from `volume` at every corner in `corner_points`.
///
/// `window_shape` is (X, Y) for planar windows or (Z, X, Y). Planar windows,
/// and any window cut from a 2D volume, come out without the Z axis. 4D
/// volumes keep their leading channel axis in every window.
pub fn extract_windows<'a, T: Clone>(
    volume: &'a Volume<T>,
    window_shape: &[usize],
    corner_points: &CornerPoints,
) -> Result<Windows<'a, T>> {
    let shape = WindowShape::from_slice(window_shape)?;
    let extent = shape.extent();
    let spatial = volume.spatial_shape();

    for k in 0..3 {
        if extent[k] == 0 {
            return Err(Error::Configuration(format!(
                "window extent on axis {} must be positive",
                k
            )));
        }
        if extent[k] > spatial[k] {
            return Err(Error::ShapeMismatch(format!(
                "window extent {} exceeds volume extent {} on axis {}",
                extent[k], spatial[k], k
            )));
        }
    }

    let mut ranges: [Vec<Vec<usize>>; 3] = Default::default();
    for (k, (axis_ranges, corners)) in ranges
        .iter_mut()
        .zip(corner_points.axes())
        .enumerate()
    {
        *axis_ranges = corners
            .iter()
            .map(|&c| reflective_range(c, c + extent[k] as isize, spatial[k]))
            .collect::<Result<_>>()?;
    }

    let total = corner_points.len();
    tracing::trace!(total, window = ?extent, "prepared window iterator");

    Ok(Windows {
        source: volume.view4(),
        ranges,
        drop_depth: shape.is_planar() || !volume.has_depth(),
        keep_channels: matches!(volume, Volume::D4(_)),
        next: 0,
        total,
    })
}

/// Extract every window eagerly, in parallel, preserving the canonical order.
pub fn extract_all_windows<T: Clone + Send + Sync>(
    volume: &Volume<T>,
    window_shape: &[usize],
    corner_points: &CornerPoints,
) -> Result<Vec<Volume<T>>> {
    let windows = extract_windows(volume, window_shape, corner_points)?;
    Ok((0..windows.total)
        .into_par_iter()
        .map(|index| windows.cut(index))
        .collect())
}

impl<T: Clone> Windows<'_, T> {
    /// Window at a position in the canonical enumeration, if it exists.
    pub fn window(&self, index: usize) -> Option<Volume<T>> {
        (index < self.total).then(|| self.cut(index))
    }

    fn cut(&self, index: usize) -> Volume<T> {
        let nx = self.ranges[1].len();
        let ny = self.ranges[2].len();
        let iz = index / (nx * ny);
        let ix = (index / ny) % nx;
        let iy = index % ny;

        // select() gathers positionally and returns an owned copy
        let window = self
            .source
            .select(Axis(1), &self.ranges[0][iz])
            .select(Axis(2), &self.ranges[1][ix])
            .select(Axis(3), &self.ranges[2][iy]);

        match (self.drop_depth, self.keep_channels) {
            (true, true) => Volume::D3(window.index_axis_move(Axis(1), 0)),
            (true, false) => Volume::D2(
                window
                    .index_axis_move(Axis(1), 0)
                    .index_axis_move(Axis(0), 0),
            ),
            (false, true) => Volume::D4(window),
            (false, false) => Volume::D3(window.index_axis_move(Axis(0), 0)),
        }
    }
}

impl<T: Clone> Iterator for Windows<'_, T> {
    type Item = Volume<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total {
            return None;
        }
        let window = self.cut(self.next);
        self.next += 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.next;
        (remaining, Some(remaining))
    }
}

impl<T: Clone> ExactSizeIterator for Windows<'_, T> {}

impl<T: Clone> FusedIterator for Windows<'_, T> {}
