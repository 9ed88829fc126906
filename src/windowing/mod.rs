//! Window sampling over volumes.
//!
//! Windows are described by per-axis corner lists ([`CornerPoints`]) and cut
//! with reflective boundary handling, so windows that run past an edge are
//! filled with mirrored data instead of padding.
//!
//! # Example
//!
//! ```
//! use ndarray::Array3;
//! use voxtile::windowing::{extract_windows, generate_corner_points};
//! use voxtile::Volume;
//!
//! let volume = Volume::from(Array3::<f32>::zeros((5, 10, 10)));
//! let corners = generate_corner_points(volume.spatial_shape(), [1, 4, 4], [1, 4, 4], false, None)?;
//! let windows = extract_windows(&volume, &[4, 4], &corners)?;
//! assert_eq!(windows.len(), 45);
//! # Ok::<(), voxtile::Error>(())
//! ```

pub mod config;
pub mod corners;
pub mod extract;
pub mod range;

pub use config::{WindowConfig, WindowPairs};
pub use corners::{generate_corner_points, map_conjugate_corners, CornerPoints};
pub use extract::{extract_all_windows, extract_windows, Windows};
pub use range::reflective_range;

use crate::error::{Error, Result};

/// Window extent normalized to (Z, X, Y).
///
/// A 2-element shape is a planar window: Z = 1 is inserted and the singleton
/// axis is dropped again from extracted windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowShape {
    extent: [usize; 3],
    planar: bool,
}

impl WindowShape {
    /// Parse a 2-element (X, Y) or 3-element (Z, X, Y) window shape.
    pub fn from_slice(shape: &[usize]) -> Result<Self> {
        match *shape {
            [x, y] => Ok(Self {
                extent: [1, x, y],
                planar: true,
            }),
            [z, x, y] => Ok(Self {
                extent: [z, x, y],
                planar: false,
            }),
            _ => Err(Error::InvalidDimensions(format!(
                "window shape must have 2 or 3 elements (got {})",
                shape.len()
            ))),
        }
    }

    /// Extent as (Z, X, Y).
    pub fn extent(&self) -> [usize; 3] {
        self.extent
    }

    /// Whether the shape was given as 2D.
    pub fn is_planar(&self) -> bool {
        self.planar
    }
}

/// Expand a 2- or 3-element per-axis vector to (Z, X, Y), filling Z with `z_fill`.
pub(crate) fn expand_to_3d(values: &[usize], z_fill: usize, name: &str) -> Result<[usize; 3]> {
    match *values {
        [x, y] => Ok([z_fill, x, y]),
        [z, x, y] => Ok([z, x, y]),
        _ => Err(Error::InvalidDimensions(format!(
            "{} must have 2 or 3 elements (got {})",
            name,
            values.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_shape_normalization() {
        let planar = WindowShape::from_slice(&[4, 6]).unwrap();
        assert_eq!(planar.extent(), [1, 4, 6]);
        assert!(planar.is_planar());

        let full = WindowShape::from_slice(&[1, 4, 6]).unwrap();
        assert_eq!(full.extent(), [1, 4, 6]);
        assert!(!full.is_planar());

        assert!(matches!(
            WindowShape::from_slice(&[4]),
            Err(Error::InvalidDimensions(_))
        ));
        assert!(WindowShape::from_slice(&[1, 2, 3, 4]).is_err());
    }

    #[test]
    fn test_expand_to_3d() {
        assert_eq!(expand_to_3d(&[3, 4], 1, "spacing").unwrap(), [1, 3, 4]);
        assert_eq!(expand_to_3d(&[3, 4], 0, "overlap").unwrap(), [0, 3, 4]);
        assert_eq!(expand_to_3d(&[2, 3, 4], 1, "spacing").unwrap(), [2, 3, 4]);
        assert!(expand_to_3d(&[], 1, "spacing").is_err());
    }
}
