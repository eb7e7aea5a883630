//! # Thumbsmith
//!
//! Thumbnail planning for images: given a source image, a transform mode, a
//! requested size and a fill/crop policy, work out the exact geometry to hand
//! to an image engine, and whether any work is needed at all.
//!
//! ```no_run
//! use thumbsmith::imaging::{RustBackend, ThumbnailPlanner, TransformMode, TransformRequest};
//!
//! let backend = RustBackend::new();
//! let planner = ThumbnailPlanner::new(&backend, "/var/www/site");
//! let request = TransformRequest::new("uploads/photo.jpg", TransformMode::ResizeAndFill, 200, 0)
//!     .output("cache/photo-200.jpg")
//!     .background_color("#000000");
//! let outcome = planner.plan_and_apply(&request)?;
//! # Ok::<(), thumbsmith::imaging::ImageError>(())
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Request types, dimension math, the planner, and the `image`-crate backend |
//! | [`directory`] | Recursive create / copy / remove of directory trees |
//! | [`config`] | `config.toml` loading: base path, folder permissions, request defaults |
//!
//! # Design Decisions
//!
//! ## Planning Is Pure
//!
//! Path resolution, dimension inference and per-mode geometry never touch
//! pixels. [`imaging::planner::plan`] returns a
//! [`imaging::ResampleParameters`] value that a backend consumes once. Tests
//! exercise every mode against a recording mock backend.
//!
//! ## Unreadable Input Is Not an Error
//!
//! Callers pass arbitrary uploads. A source that is not an image yields
//! [`imaging::Outcome::UnreadableSource`] instead of an error, and nothing is
//! written. Backend failures after that point are real errors.
//!
//! ## Injected Configuration
//!
//! The base path and directory permission mode are constructor arguments.
//! [`config::load_config`] is a convenience for reading them from a file; the
//! library never reads global state.

pub mod config;
pub mod directory;
pub mod imaging;

#[cfg(test)]
pub(crate) mod test_helpers;
