//! In-memory volumes tagged by axis count.
//!
//! Spatial axes are always ordered (Z, X, Y). A 2D volume is treated as a
//! stack with a single Z slice; a 4D volume carries a leading channel axis.

use ndarray::{Array2, Array3, Array4, ArrayD, ArrayView4, Axis, Ix2, Ix3, Ix4};

use crate::error::{Error, Result};

/// A 2D, 3D or multichannel 3D numeric volume.
#[derive(Debug, Clone, PartialEq)]
pub enum Volume<T> {
    /// Single-channel image, (X, Y).
    D2(Array2<T>),
    /// Single-channel stack, (Z, X, Y).
    D3(Array3<T>),
    /// Multichannel stack, (C, Z, X, Y).
    D4(Array4<T>),
}

impl<T> Volume<T> {
    /// Wrap a dynamically-shaped array, rejecting anything that is not 2, 3 or 4D.
    pub fn from_dyn(array: ArrayD<T>) -> Result<Self> {
        match array.ndim() {
            2 => Ok(Self::D2(array.into_dimensionality::<Ix2>()?)),
            3 => Ok(Self::D3(array.into_dimensionality::<Ix3>()?)),
            4 => Ok(Self::D4(array.into_dimensionality::<Ix4>()?)),
            n => Err(Error::InvalidDimensions(format!(
                "volume must have 2, 3 or 4 axes (got {})",
                n
            ))),
        }
    }

    /// Convert back into a dynamically-shaped array.
    pub fn into_dyn(self) -> ArrayD<T> {
        match self {
            Self::D2(a) => a.into_dyn(),
            Self::D3(a) => a.into_dyn(),
            Self::D4(a) => a.into_dyn(),
        }
    }

    /// Full array shape, channel axis included.
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::D2(a) => a.shape(),
            Self::D3(a) => a.shape(),
            Self::D4(a) => a.shape(),
        }
    }

    /// Number of array axes.
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    /// True when any axis has zero extent.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spatial extent as (Z, X, Y), with Z = 1 for 2D volumes.
    pub fn spatial_shape(&self) -> [usize; 3] {
        match self {
            Self::D2(a) => [1, a.shape()[0], a.shape()[1]],
            Self::D3(a) => [a.shape()[0], a.shape()[1], a.shape()[2]],
            Self::D4(a) => [a.shape()[1], a.shape()[2], a.shape()[3]],
        }
    }

    /// Trailing (X, Y) extent.
    pub fn xy_shape(&self) -> [usize; 2] {
        let [_, x, y] = self.spatial_shape();
        [x, y]
    }

    /// Number of channels (1 unless the volume is 4D).
    pub fn channels(&self) -> usize {
        match self {
            Self::D4(a) => a.shape()[0],
            _ => 1,
        }
    }

    /// Whether the spatial extent has a real Z axis.
    pub fn has_depth(&self) -> bool {
        !matches!(self, Self::D2(_))
    }

    /// View as (C, Z, X, Y) with singleton axes inserted where absent.
    pub(crate) fn view4(&self) -> ArrayView4<'_, T> {
        match self {
            Self::D2(a) => a.view().insert_axis(Axis(0)).insert_axis(Axis(0)),
            Self::D3(a) => a.view().insert_axis(Axis(0)),
            Self::D4(a) => a.view(),
        }
    }
}

impl<T> From<Array2<T>> for Volume<T> {
    fn from(array: Array2<T>) -> Self {
        Self::D2(array)
    }
}

impl<T> From<Array3<T>> for Volume<T> {
    fn from(array: Array3<T>) -> Self {
        Self::D3(array)
    }
}

impl<T> From<Array4<T>> for Volume<T> {
    fn from(array: Array4<T>) -> Self {
        Self::D4(array)
    }
}
