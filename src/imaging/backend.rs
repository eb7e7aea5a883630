//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three steps every backend must
//! support: identify, generate, and write-to-file. The planner never touches
//! pixels itself; it hands a [`ResampleParameters`] to the backend and asks it
//! to persist the result.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::{Quality, ResampleParameters};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero-sized image is not a usable image.
    pub fn is_usable(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width divided by height.
    pub fn ratio(self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Trait for image processing backends.
///
/// `generate` produces an in-memory result that `write_to_file` then encodes;
/// a failure in either step is reported separately so callers can tell a bad
/// source from an unwritable destination.
pub trait ImageBackend: Sync {
    /// The rendered image held between `generate` and `write_to_file`.
    type Rendered;

    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Load the source and apply the geometry described by `params`.
    fn generate(&self, params: &ResampleParameters) -> Result<Self::Rendered, BackendError>;

    /// Encode the rendered image to `path`.
    fn write_to_file(
        &self,
        rendered: &Self::Rendered,
        path: &Path,
        quality: Quality,
    ) -> Result<(), BackendError>;
}
