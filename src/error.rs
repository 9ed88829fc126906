//! Error types for windowing and augmentation.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating shapes, settings, or building arrays.
///
/// Every operation validates its inputs before producing output, so an error
/// never accompanies a partial result.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrong number of axes (e.g. a 4-element window shape, a 3D deformation shape).
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Extents that disagree with each other or with the volume they index.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Missing or out-of-range settings.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Array construction failed.
    #[error("array error: {0}")]
    Array(#[from] ndarray::ShapeError),
}
