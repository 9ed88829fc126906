//! Python bindings for voxtile.

pub mod augmentation;
pub mod module;
pub mod validation;
pub mod windowing;
