//! Spatial augmentation transforms.
//!
//! Elastic deformation is split into field synthesis
//! ([`generate_deformation_field`]) and application ([`resample`]), so one
//! field can be reused across an image and its labels or weights.

pub mod augment;
mod filter;
mod interpolate;
pub mod resample;

pub use augment::{
    deform, deform_one, generate_deformation_field, DeformationSettings, DisplacementField,
};
pub use resample::{resample, resample_one};
