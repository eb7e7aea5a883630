//! Image processing: thumbnail planning over a pluggable backend.
//!
//! | Mode | Geometry |
//! |---|---|
//! | **resize** | fit inside the box, keep aspect ratio |
//! | **crop** | centered region of the requested size, no scaling |
//! | **resizeAndCrop** | cover the box, center-crop the overflow |
//! | **resizeAndFill** | fit inside the box, pad to the exact box with a color |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing requests and backend geometry
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Planner**: [`ThumbnailPlanner`], combining calculations + backend

pub mod backend;
mod calculations;
mod params;
pub mod planner;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    calculate_crop_region, calculate_fill_dimensions, calculate_fit_dimensions, center_offset,
    derive_target_dimensions,
};
pub use params::{
    FillColor, Quality, ResampleParameters, SourceRegion, TransformDefaults, TransformMode,
    TransformRequest,
};
pub use planner::{ImageError, Outcome, ThumbnailPlanner};
pub use rust_backend::RustBackend;
