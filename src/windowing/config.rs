//! One-call window generation from a configuration.

use std::iter::Zip;

use super::corners::{generate_corner_points, map_conjugate_corners, CornerPoints};
use super::extract::{extract_windows, Windows};
use super::{expand_to_3d, WindowShape};
use crate::error::{Error, Result};
use crate::volume::Volume;

/// Matched `(target, context)` windows sharing a center.
pub type WindowPairs<'a, T> = Zip<Windows<'a, T>, Windows<'a, T>>;

/// Configuration for windowing a volume.
///
/// Spacing takes precedence over overlap. Without either, windows tile the
/// volume with no overlap, which is the usual setup for inference passes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowConfig {
    /// Window shape, (X, Y) or (Z, X, Y)
    pub shape: Vec<usize>,
    /// Stride between successive corners; 2-element values get Z spacing 1
    pub spacing: Option<Vec<usize>>,
    /// Overlap between successive windows, used when `spacing` is unset
    pub overlap: Option<Vec<usize>>,
    /// Draw corners randomly within each grid bin
    pub random: bool,
    /// Seed for random corner generation
    pub seed: Option<u64>,
}

impl WindowConfig {
    /// Create a grid-sampling config for windows of `shape`.
    pub fn new(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            spacing: None,
            overlap: None,
            random: false,
            seed: None,
        }
    }

    /// Set the stride between window corners.
    pub fn spacing(mut self, spacing: &[usize]) -> Self {
        self.spacing = Some(spacing.to_vec());
        self
    }

    /// Set the overlap between successive windows.
    pub fn overlap(mut self, overlap: &[usize]) -> Self {
        self.overlap = Some(overlap.to_vec());
        self
    }

    /// Enable random corner jitter within each grid bin.
    pub fn randomize(mut self) -> Self {
        self.random = true;
        self
    }

    /// Set the random seed for reproducibility.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set an optional seed.
    pub fn seed_opt(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Parsed window shape.
    pub fn window_shape(&self) -> Result<WindowShape> {
        WindowShape::from_slice(&self.shape)
    }

    /// Corner stride as (Z, X, Y), derived from the overlap when no spacing is set.
    pub fn window_spacing(&self) -> Result<[usize; 3]> {
        if let Some(spacing) = &self.spacing {
            return expand_to_3d(spacing, 1, "window_spacing");
        }

        let extent = self.window_shape()?.extent();
        let overlap = match &self.overlap {
            Some(overlap) => expand_to_3d(overlap, 0, "window_overlap")?,
            None => [0; 3],
        };

        let mut spacing = [0usize; 3];
        for k in 0..3 {
            if overlap[k] >= extent[k] {
                return Err(Error::Configuration(format!(
                    "window_overlap[{}]={} must be smaller than window extent {}",
                    k, overlap[k], extent[k]
                )));
            }
            spacing[k] = extent[k] - overlap[k];
        }
        Ok(spacing)
    }

    /// Corner points for a volume of `spatial_shape` (Z, X, Y).
    pub fn corner_points(&self, spatial_shape: [usize; 3]) -> Result<CornerPoints> {
        generate_corner_points(
            spatial_shape,
            self.window_shape()?.extent(),
            self.window_spacing()?,
            self.random,
            self.seed,
        )
    }

    /// Lazily cut every window of this config from `volume`.
    pub fn windows<'a, T: Clone>(&self, volume: &'a Volume<T>) -> Result<Windows<'a, T>> {
        let corners = self.corner_points(volume.spatial_shape())?;
        extract_windows(volume, &self.shape, &corners)
    }

    /// Cut each window together with a larger `context_shape` window centered
    /// on the same location.
    ///
    /// Context windows that start before or run past the volume edge are
    /// filled by reflection.
    pub fn paired_windows<'a, T: Clone>(
        &self,
        volume: &'a Volume<T>,
        context_shape: &[usize],
    ) -> Result<WindowPairs<'a, T>> {
        let corners = self.corner_points(volume.spatial_shape())?;
        let context_corners = map_conjugate_corners(&corners, &self.shape, context_shape)?;
        let targets = extract_windows(volume, &self.shape, &corners)?;
        let contexts = extract_windows(volume, context_shape, &context_corners)?;
        Ok(targets.zip(contexts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};

    #[test]
    fn test_spacing_defaults_to_window_shape() {
        let config = WindowConfig::new(&[3, 32, 32]);
        assert_eq!(config.window_spacing().unwrap(), [3, 32, 32]);
    }

    #[test]
    fn test_spacing_from_overlap() {
        let config = WindowConfig::new(&[32, 32]).overlap(&[8, 4]);
        assert_eq!(config.window_spacing().unwrap(), [1, 24, 28]);

        let config = WindowConfig::new(&[32, 32]).overlap(&[32, 4]);
        assert!(matches!(
            config.window_spacing(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_explicit_spacing_wins() {
        let config = WindowConfig::new(&[16, 16]).spacing(&[5, 6]).overlap(&[8, 8]);
        assert_eq!(config.window_spacing().unwrap(), [1, 5, 6]);
    }

    #[test]
    fn test_windows_from_config() {
        let volume = Volume::from(Array3::<f32>::zeros((5, 10, 10)));
        let windows: Vec<_> = WindowConfig::new(&[4, 4])
            .spacing(&[1, 4, 4])
            .windows(&volume)
            .unwrap()
            .collect();
        assert_eq!(windows.len(), 45);
        assert!(windows.iter().all(|w| w.shape() == &[4, 4]));
    }

    #[test]
    fn test_random_config_reproducible() {
        let volume = Volume::from(Array2::from_shape_fn((40, 40), |(x, y)| (x * 40 + y) as u16));
        let config = WindowConfig::new(&[8, 8]).spacing(&[6, 6]).randomize().seed(9);
        let a: Vec<_> = config.windows(&volume).unwrap().collect();
        let b: Vec<_> = config.windows(&volume).unwrap().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_paired_windows_share_centers() {
        let volume = Volume::from(Array2::from_shape_fn((12, 12), |(x, y)| (x * 12 + y) as i32));
        let pairs: Vec<_> = WindowConfig::new(&[4, 4])
            .paired_windows(&volume, &[8, 8])
            .unwrap()
            .collect();
        assert_eq!(pairs.len(), 9);

        for (target, context) in &pairs {
            let (Volume::D2(t), Volume::D2(c)) = (target, context) else {
                panic!("expected 2D windows");
            };
            assert_eq!(c.shape(), &[8, 8]);
            // the target occupies the central 4x4 block of its context
            assert_eq!(c.slice(ndarray::s![2..6, 2..6]), t.view());
        }
    }
}
