//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header only, no full decode) |
//! | Decode (JPEG, PNG, GIF, BMP, TIFF, WebP) | `image::ImageReader` with format guessing |
//! | Crop | `DynamicImage::crop_imm` |
//! | Resize / cover / fit | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Fill borders | `RgbaImage::from_pixel` + `imageops::overlay` |
//! | Encode | chosen from the output path extension |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{
    calculate_fill_dimensions, calculate_fit_dimensions, center_offset,
};
use super::params::{FillColor, Quality, ResampleParameters};
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Scale to fit inside the box, keeping aspect ratio.
fn resize_to_fit(img: &DynamicImage, bounds: Dimensions, allow_enlargement: bool) -> DynamicImage {
    let (w, h) = calculate_fit_dimensions(
        (img.width(), img.height()),
        bounds.as_tuple(),
        allow_enlargement,
    );
    if (w, h) == (img.width(), img.height()) {
        return img.clone();
    }
    img.resize_exact(w, h, FilterType::Lanczos3)
}

/// Scale to cover the box, then center-crop whatever overflows.
fn resize_to_cover(img: &DynamicImage, target: Dimensions, allow_enlargement: bool) -> DynamicImage {
    let (w, h) = calculate_fill_dimensions(
        (img.width(), img.height()),
        target.as_tuple(),
        allow_enlargement,
    );
    let covered = if (w, h) == (img.width(), img.height()) {
        img.clone()
    } else {
        img.resize_exact(w, h, FilterType::Lanczos3)
    };

    let crop_w = target.width.min(w);
    let crop_h = target.height.min(h);
    covered.crop_imm(
        center_offset(w, crop_w),
        center_offset(h, crop_h),
        crop_w,
        crop_h,
    )
}

/// Fit inside the box and pad to exactly the box size with `color`.
fn resize_and_fill(
    img: &DynamicImage,
    target: Dimensions,
    color: FillColor,
    allow_enlargement: bool,
) -> DynamicImage {
    let fitted = resize_to_fit(img, target, allow_enlargement);
    let mut canvas = RgbaImage::from_pixel(target.width, target.height, Rgba(color.rgba()));
    let x = center_offset(target.width, fitted.width());
    let y = center_offset(target.height, fitted.height());
    image::imageops::overlay(&mut canvas, &fitted.to_rgba8(), i64::from(x), i64::from(y));
    DynamicImage::ImageRgba8(canvas)
}

/// Save a DynamicImage to the given path, inferring format from extension.
///
/// JPEG and AVIF honour `quality`, clamped to 1-100; the other formats
/// ignore it.
fn save_image(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let format = ImageFormat::from_path(path).map_err(|e| {
        BackendError::ProcessingFailed(format!(
            "Unsupported output format for {}: {}",
            path.display(),
            e
        ))
    })?;
    if !matches!(
        format,
        ImageFormat::Jpeg
            | ImageFormat::Avif
            | ImageFormat::Png
            | ImageFormat::Tiff
            | ImageFormat::WebP
            | ImageFormat::Gif
            | ImageFormat::Bmp
    ) {
        return Err(BackendError::ProcessingFailed(format!(
            "Unsupported output format: {:?}",
            format
        )));
    }

    let quality = u8::try_from(quality.clamp(1, 100)).unwrap_or(100);

    let file = File::create(path).map_err(BackendError::Io)?;
    let mut writer = BufWriter::new(file);

    let result = match format {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality))
        }
        ImageFormat::Avif => img.write_with_encoder(AvifEncoder::new_with_speed_quality(
            &mut writer,
            6,
            quality,
        )),
        // GIF frames are RGBA
        ImageFormat::Gif => DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut writer, format),
        _ => img.write_to(&mut writer, format),
    };

    result.map_err(|e| {
        BackendError::ProcessingFailed(format!("Encoding {} failed: {}", path.display(), e))
    })?;
    writer.flush().map_err(BackendError::Io)
}

impl ImageBackend for RustBackend {
    type Rendered = DynamicImage;

    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn generate(&self, params: &ResampleParameters) -> Result<DynamicImage, BackendError> {
        let img = load_image(&params.source)?;

        if let Some(region) = params.source_region {
            // Pure crop, no scaling
            return Ok(img.crop_imm(region.x, region.y, region.width, region.height));
        }

        let rendered = match (params.crop_to_fill, params.fill_color) {
            (true, _) => resize_to_cover(&img, params.output_size, params.allow_enlargement),
            (false, Some(color)) => {
                resize_and_fill(&img, params.output_size, color, params.allow_enlargement)
            }
            (false, None) => resize_to_fit(&img, params.output_size, params.allow_enlargement),
        };
        Ok(rendered)
    }

    fn write_to_file(
        &self,
        rendered: &DynamicImage,
        path: &Path,
        quality: Quality,
    ) -> Result<(), BackendError> {
        save_image(rendered, path, quality.value())
    }
}
