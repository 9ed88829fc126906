//! Window sampling and elastic augmentation for volumetric training data.
//!
//! `voxtile` prepares 2D and 3D image volumes, optionally multichannel, for
//! model training and inference:
//!
//! - [`windowing`] partitions a volume into fixed-size windows on a regular
//!   grid or with seeded random jitter, mirroring data at the borders so
//!   every window has the requested shape.
//! - [`transforms`] builds smooth, reproducible elastic deformation fields
//!   and applies them with nearest-neighbor lookup.
//!
//! Volumes are plain [`ndarray`] arrays wrapped in [`Volume`]; file I/O and
//! dtype casting stay with the caller.
//!
//! # Example
//!
//! ```
//! use ndarray::Array3;
//! use voxtile::transforms::{deform_one, DeformationSettings};
//! use voxtile::windowing::WindowConfig;
//! use voxtile::Volume;
//!
//! let volume = Volume::from(Array3::<f32>::zeros((8, 120, 120)));
//! let augmented = deform_one(&volume, &DeformationSettings::default(), Some(1))?;
//!
//! let config = WindowConfig::new(&[3, 64, 64]).spacing(&[2, 48, 48]).randomize().seed(2);
//! for window in config.windows(&augmented)? {
//!     assert_eq!(window.shape(), &[3, 64, 64]);
//! }
//! # Ok::<(), voxtile::Error>(())
//! ```

pub mod error;
mod random;
pub mod transforms;
pub mod volume;
pub mod windowing;

#[cfg(feature = "python")]
pub mod python;

pub use error::{Error, Result};
pub use transforms::{
    deform, deform_one, generate_deformation_field, resample, DeformationSettings,
    DisplacementField,
};
pub use volume::Volume;
pub use windowing::{
    extract_windows, generate_corner_points, map_conjugate_corners, reflective_range,
    CornerPoints, WindowConfig, WindowShape, Windows,
};
