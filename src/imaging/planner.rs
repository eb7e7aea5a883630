//! Thumbnail planning: decide whether work is needed, compute the geometry,
//! and drive the backend.
//!
//! The flow for one [`TransformRequest`]:
//!
//! ```text
//! validate → resolve paths → identify source → derive target size
//!          → up-to-date check → plan geometry → generate → write
//! ```
//!
//! Everything between "identify" and "generate" is pure and exposed through
//! [`validate`], [`target_dimensions`] and [`plan`], so the geometry for every
//! mode can be tested without touching an image.
//!
//! ## Tolerated input
//!
//! Callers routinely pass arbitrary uploaded files. A source the backend cannot
//! identify, or one reporting a zero dimension, is not an error: the call
//! returns [`Outcome::UnreadableSource`] and writes nothing.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{calculate_crop_region, derive_target_dimensions};
use super::params::{
    FillColor, ResampleParameters, SourceRegion, TransformMode, TransformRequest,
};
use crate::config::PlannerConfig;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Either width or height must be non-zero")]
    MissingDimensions,
    #[error("Invalid background color: {0}")]
    InvalidColor(String),
    #[error("Resample failed: {0}")]
    Resample(#[source] BackendError),
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

/// Result type for planner operations.
pub type Result<T> = std::result::Result<T, ImageError>;

/// What a successful [`ThumbnailPlanner::plan_and_apply`] call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The output was generated and written.
    Written {
        output: PathBuf,
        /// The box handed to the backend.
        size: Dimensions,
    },
    /// The source is not a usable image; nothing was written.
    UnreadableSource { source: PathBuf },
    /// The source already has the requested size and the output exists.
    UpToDate { output: PathBuf },
}

impl Outcome {
    /// True when no file was written.
    pub fn is_noop(&self) -> bool {
        !matches!(self, Self::Written { .. })
    }
}

/// Plans and applies thumbnail transforms against an [`ImageBackend`].
///
/// The base path is injected rather than looked up: relative request paths are
/// resolved against it.
pub struct ThumbnailPlanner<'a, B: ImageBackend> {
    backend: &'a B,
    base_path: PathBuf,
}

impl<'a, B: ImageBackend> ThumbnailPlanner<'a, B> {
    pub fn new(backend: &'a B, base_path: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            base_path: base_path.into(),
        }
    }

    pub fn from_config(backend: &'a B, config: &PlannerConfig) -> Self {
        Self::new(backend, &config.base_path)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Prefix `path` with the base path unless it already starts with it.
    ///
    /// A rooted path outside the base path is re-rooted under it rather than
    /// escaping it.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.starts_with(&self.base_path) {
            return path.to_path_buf();
        }
        let relative: PathBuf = path
            .components()
            .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
            .collect();
        self.base_path.join(relative)
    }

    /// Run one request end to end.
    ///
    /// Returns a no-op [`Outcome`] for unreadable sources and for outputs that
    /// are already up to date. Backend failures are surfaced as
    /// [`ImageError::Resample`] or [`ImageError::Write`]; a partially written
    /// output is left in place.
    pub fn plan_and_apply(&self, request: &TransformRequest) -> Result<Outcome> {
        validate(request)?;

        let source = self.resolve_path(&request.source);
        let output = self.resolve_path(request.output.as_deref().unwrap_or(&request.source));

        let native = match self.backend.identify(&source) {
            Ok(dims) if dims.is_usable() => dims,
            Ok(dims) => {
                warn!(source = %source.display(), ?dims, "source has a zero dimension, skipping");
                return Ok(Outcome::UnreadableSource { source });
            }
            Err(e) => {
                warn!(source = %source.display(), error = %e, "source is not a readable image, skipping");
                return Ok(Outcome::UnreadableSource { source });
            }
        };

        let Some(target) = target_dimensions(request, native) else {
            return Err(ImageError::MissingDimensions);
        };

        if native == target && output.exists() {
            debug!(output = %output.display(), "output already at requested size");
            return Ok(Outcome::UpToDate { output });
        }

        let params = plan(request, &source, native, target)?;
        debug!(
            mode = %request.mode,
            native_width = native.width,
            native_height = native.height,
            ?params,
            "planned transform"
        );

        let rendered = self.backend.generate(&params).map_err(ImageError::Resample)?;
        self.backend
            .write_to_file(&rendered, &output, params.quality)
            .map_err(|source| ImageError::Write {
                path: output.clone(),
                source,
            })?;

        info!(
            output = %output.display(),
            width = params.output_size.width,
            height = params.output_size.height,
            "wrote thumbnail"
        );
        Ok(Outcome::Written {
            output,
            size: params.output_size,
        })
    }
}

/// Check a request for problems detectable without any I/O.
pub fn validate(request: &TransformRequest) -> Result<()> {
    if request.width == 0 && request.height == 0 {
        return Err(ImageError::MissingDimensions);
    }
    if request.mode == TransformMode::ResizeAndFill {
        parse_fill_color(&request.background_color)?;
    }
    Ok(())
}

/// Requested size with a missing dimension derived from the native ratio.
///
/// `None` when the native size is unusable or both requested dimensions
/// are zero.
pub fn target_dimensions(request: &TransformRequest, native: Dimensions) -> Option<Dimensions> {
    derive_target_dimensions(native.as_tuple(), (request.width, request.height))
        .map(Dimensions::from)
}

/// Build the backend parameters for `request` against a known source size.
///
/// Pure: no I/O, the request is not modified.
pub fn plan(
    request: &TransformRequest,
    source: &Path,
    native: Dimensions,
    target: Dimensions,
) -> Result<ResampleParameters> {
    let mut params = ResampleParameters {
        source: source.to_path_buf(),
        source_region: None,
        output_size: target,
        crop_to_fill: false,
        fill_color: None,
        allow_enlargement: request.allow_enlargement,
        quality: request.quality,
    };

    match request.mode {
        TransformMode::Crop => {
            let (x, y, width, height) =
                calculate_crop_region(native.as_tuple(), target.as_tuple());
            params.source_region = Some(SourceRegion {
                x,
                y,
                width,
                height,
            });
            params.output_size = Dimensions::new(width, height);
        }
        TransformMode::Resize => {}
        TransformMode::ResizeAndCrop => params.crop_to_fill = true,
        TransformMode::ResizeAndFill => {
            params.fill_color = Some(parse_fill_color(&request.background_color)?);
        }
    }

    Ok(params)
}

fn parse_fill_color(value: &str) -> Result<FillColor> {
    value.parse().map_err(ImageError::InvalidColor)
}
