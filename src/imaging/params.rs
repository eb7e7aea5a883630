//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`planner`](super::planner) (which decides the
//! geometry) and the [`backend`](super::backend) (which does the actual pixel
//! work). This separation allows swapping backends (e.g. for testing with a
//! mock) without changing planning logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`TransformMode`]: How source pixels map onto the requested box.
//! - [`TransformRequest`]: What the caller asks for: paths, mode, size, color, quality.
//! - [`FillColor`]: Background color for `resizeAndFill`, parsed from a hex string.
//! - [`SourceRegion`]: Rectangle of source pixels to keep (crop mode).
//! - [`ResampleParameters`]: Full geometry handed to the backend for one request.

use super::backend::Dimensions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

impl From<u32> for Quality {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Quality> for u32 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// How source pixels map to the requested output box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformMode {
    /// Scale the whole source to fit inside the box. No crop, no fill.
    #[default]
    Resize,
    /// Center-crop the requested size out of the source. No scaling.
    Crop,
    /// Scale to cover the box, then center-crop the overflow.
    ResizeAndCrop,
    /// Scale to fit inside the box, center it, fill the borders with a color.
    ResizeAndFill,
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Resize => "resize",
            Self::Crop => "crop",
            Self::ResizeAndCrop => "resizeAndCrop",
            Self::ResizeAndFill => "resizeAndFill",
        };
        f.write_str(name)
    }
}

/// Defaults applied to requests built with [`TransformRequest::with_defaults`].
///
/// Loaded from the `[defaults]` table of `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformDefaults {
    /// Encoding quality (1-100).
    pub quality: u32,
    /// Background color for `resizeAndFill`.
    pub background_color: String,
    /// Whether output may exceed the native source size.
    pub allow_enlargement: bool,
}

impl Default for TransformDefaults {
    fn default() -> Self {
        Self {
            quality: 90,
            background_color: default_background_color(),
            allow_enlargement: false,
        }
    }
}

fn default_background_color() -> String {
    "#ffffff".to_string()
}

/// A single thumbnail request.
///
/// Field names deserialize in camelCase, so a parameter bag such as
/// `{"source": "a.jpg", "mode": "resizeAndFill", "width": 200}` maps onto it
/// directly. `width` or `height` may be 0 (the other is then derived from the
/// source aspect ratio), but not both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransformRequest {
    pub source: PathBuf,
    /// Defaults to `source` (in-place overwrite) when absent.
    #[serde(default)]
    pub output: Option<PathBuf>,
    pub mode: TransformMode,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default)]
    pub allow_enlargement: bool,
    #[serde(default)]
    pub quality: Quality,
}

impl TransformRequest {
    pub fn new(source: impl Into<PathBuf>, mode: TransformMode, width: u32, height: u32) -> Self {
        Self::with_defaults(source, mode, width, height, &TransformDefaults::default())
    }

    /// Build a request whose color, enlargement and quality come from config.
    pub fn with_defaults(
        source: impl Into<PathBuf>,
        mode: TransformMode,
        width: u32,
        height: u32,
        defaults: &TransformDefaults,
    ) -> Self {
        Self {
            source: source.into(),
            output: None,
            mode,
            width,
            height,
            background_color: defaults.background_color.clone(),
            allow_enlargement: defaults.allow_enlargement,
            quality: Quality::new(defaults.quality),
        }
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    pub fn allow_enlargement(mut self, allow: bool) -> Self {
        self.allow_enlargement = allow;
        self
    }

    pub fn quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }
}

/// Background color for `resizeAndFill`, stored as RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl FillColor {
    pub fn rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Hex form without the leading `#`, as image engines usually expect it.
    pub fn hex(self) -> String {
        if self.a == 0xff {
            format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for FillColor {
    type Err = String;

    /// Accepts `rgb`, `rrggbb` and `rrggbbaa`, with or without a leading `#`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let hex = input.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(format!("invalid color {input:?}"));
        }
        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| format!("invalid color {input:?}"))
        };
        match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (slot, digit) in rgb.iter_mut().zip(hex.chars()) {
                    let v = channel(&digit.to_string())?;
                    *slot = v * 0x11;
                }
                Ok(Self {
                    r: rgb[0],
                    g: rgb[1],
                    b: rgb[2],
                    a: 0xff,
                })
            }
            6 | 8 => Ok(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
                a: if hex.len() == 8 {
                    channel(&hex[6..8])?
                } else {
                    0xff
                },
            }),
            _ => Err(format!("invalid color {input:?}")),
        }
    }
}

/// Rectangle of source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Geometry for one backend invocation.
///
/// - `source_region` set: pure crop, the region is copied out unscaled.
/// - `crop_to_fill`: scale to cover `output_size`, then crop the overflow.
/// - `fill_color` set: scale to fit, pad to exactly `output_size` with the color.
/// - none of the above: scale to fit inside `output_size`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampleParameters {
    pub source: PathBuf,
    pub source_region: Option<SourceRegion>,
    pub output_size: Dimensions,
    pub crop_to_fill: bool,
    pub fill_color: Option<FillColor>,
    pub allow_enlargement: bool,
    pub quality: Quality,
}
