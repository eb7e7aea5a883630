//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Dimensions are `(width, height)` tuples in pixels.

use super::backend::Dimensions;

/// Fill in a missing requested dimension from the native aspect ratio.
///
/// - height 0 → `width / ratio`
/// - width 0 → `height * ratio`
///
/// Derived values are rounded and never smaller than 1. Returns `None` when
/// both requested dimensions are 0 or the native size is unusable.
///
/// # Examples
/// ```
/// # use thumbsmith::imaging::derive_target_dimensions;
/// // 800x600 (4:3) with only a width of 400 → 400x300
/// assert_eq!(derive_target_dimensions((800, 600), (400, 0)), Some((400, 300)));
///
/// // Only a height of 300 → 400x300
/// assert_eq!(derive_target_dimensions((800, 600), (0, 300)), Some((400, 300)));
/// ```
pub fn derive_target_dimensions(native: (u32, u32), requested: (u32, u32)) -> Option<(u32, u32)> {
    let native = Dimensions::from(native);
    if !native.is_usable() {
        return None;
    }
    let ratio = native.ratio();

    match requested {
        (0, 0) => None,
        (w, 0) => Some((w, scaled(w as f64 / ratio))),
        (0, h) => Some((scaled(h as f64 * ratio), h)),
        both => Some(both),
    }
}

/// Round a scaled dimension, keeping at least one pixel.
fn scaled(value: f64) -> u32 {
    (value.round() as u32).max(1)
}

/// Offset that centers `inner` within `outer` on one axis (0 if it does not fit).
pub fn center_offset(outer: u32, inner: u32) -> u32 {
    outer.saturating_sub(inner) / 2
}

/// Center-crop rectangle `(x, y, width, height)` for a pure crop.
///
/// On each axis the offset is `(native - target) / 2` when the source is
/// larger, else 0. The region never extends past the source.
///
/// # Examples
/// ```
/// # use thumbsmith::imaging::calculate_crop_region;
/// assert_eq!(calculate_crop_region((800, 600), (400, 400)), (200, 100, 400, 400));
/// ```
pub fn calculate_crop_region(native: (u32, u32), target: (u32, u32)) -> (u32, u32, u32, u32) {
    let (native_w, native_h) = native;
    let (target_w, target_h) = target;

    (
        center_offset(native_w, target_w),
        center_offset(native_h, target_h),
        target_w.min(native_w),
        target_h.min(native_h),
    )
}

/// Calculate dimensions that fit entirely inside `bounds`, keeping the source
/// aspect ratio. One dimension matches the bounds exactly, the other is smaller
/// or equal.
///
/// Without enlargement the scale factor is capped at 1, so a small source
/// keeps its native size.
pub fn calculate_fit_dimensions(
    source: (u32, u32),
    bounds: (u32, u32),
    allow_enlargement: bool,
) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    let scale = (max_w as f64 / src_w as f64).min(max_h as f64 / src_h as f64);
    let scale = if allow_enlargement { scale } else { scale.min(1.0) };

    (
        scaled(src_w as f64 * scale).min(max_w.max(1)),
        scaled(src_h as f64 * scale).min(max_h.max(1)),
    )
}

/// Calculate dimensions needed to fill a target area (resize before crop).
///
/// Returns dimensions that completely cover the target area while maintaining
/// the source aspect ratio. One dimension will match exactly, the other may
/// exceed. Without enlargement the scale factor is capped at 1, in which case
/// the result may not cover the target.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `target` - Target area dimensions (width, height)
/// * `allow_enlargement` - Whether the source may be scaled up
///
/// # Returns
/// * `(width, height)` - Fill dimensions
pub fn calculate_fill_dimensions(
    source: (u32, u32),
    target: (u32, u32),
    allow_enlargement: bool,
) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    let (w, h) = if src_aspect > tgt_aspect {
        // Source is wider: height will match, width will exceed
        let h = tgt_h;
        let w = scaled(h as f64 * src_aspect);
        (w, h)
    } else {
        // Source is taller: width will match, height will exceed
        let w = tgt_w;
        let h = scaled(w as f64 / src_aspect);
        (w, h)
    };

    if !allow_enlargement && (w > src_w || h > src_h) {
        (src_w, src_h)
    } else {
        (w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // derive_target_dimensions tests
    // =========================================================================

    #[test]
    fn derive_height_from_width() {
        assert_eq!(derive_target_dimensions((800, 600), (400, 0)), Some((400, 300)));
    }

    #[test]
    fn derive_width_from_height() {
        assert_eq!(derive_target_dimensions((800, 600), (0, 150)), Some((200, 150)));
    }

    #[test]
    fn derive_keeps_both_when_given() {
        // No proportional correction when both are explicit
        assert_eq!(derive_target_dimensions((800, 600), (100, 100)), Some((100, 100)));
    }

    #[test]
    fn derive_rounds_to_nearest() {
        // 1000x333: 100 / (1000/333) = 33.3 → 33
        assert_eq!(derive_target_dimensions((1000, 333), (100, 0)), Some((100, 33)));
        // 3x2: 5 / 1.5 = 3.33 → 3
        assert_eq!(derive_target_dimensions((3, 2), (5, 0)), Some((5, 3)));
    }

    #[test]
    fn derive_never_produces_zero() {
        // Extreme panorama: 1 / 100 = 0.01 → clamped to 1
        assert_eq!(derive_target_dimensions((10000, 100), (1, 0)), Some((1, 1)));
    }

    #[test]
    fn derive_matches_native_ratio() {
        let native = (1920, 1080);
        let (w, h) = derive_target_dimensions(native, (640, 0)).unwrap();
        let native_ratio = native.0 as f64 / native.1 as f64;
        let ratio = w as f64 / h as f64;
        assert!((native_ratio - ratio).abs() < 0.01);
    }

    #[test]
    fn derive_both_zero_is_none() {
        assert_eq!(derive_target_dimensions((800, 600), (0, 0)), None);
    }

    #[test]
    fn derive_unusable_native_is_none() {
        assert_eq!(derive_target_dimensions((0, 600), (100, 0)), None);
        assert_eq!(derive_target_dimensions((800, 0), (100, 0)), None);
    }

    // =========================================================================
    // calculate_crop_region tests
    // =========================================================================

    #[test]
    fn crop_centers_on_both_axes() {
        assert_eq!(calculate_crop_region((800, 600), (400, 400)), (200, 100, 400, 400));
    }

    #[test]
    fn crop_odd_difference_floors() {
        // (801 - 400) / 2 = 200.5 → 200
        assert_eq!(calculate_crop_region((801, 400), (400, 400)), (200, 0, 400, 400));
    }

    #[test]
    fn crop_source_smaller_on_one_axis() {
        // Width fits without cropping: x offset 0, region clamped to native width
        assert_eq!(calculate_crop_region((300, 600), (400, 400)), (0, 100, 300, 400));
    }

    #[test]
    fn crop_source_smaller_everywhere() {
        assert_eq!(calculate_crop_region((100, 50), (400, 400)), (0, 0, 100, 50));
    }

    #[test]
    fn crop_same_size_is_identity() {
        assert_eq!(calculate_crop_region((400, 400), (400, 400)), (0, 0, 400, 400));
    }

    // =========================================================================
    // calculate_fit_dimensions tests
    // =========================================================================

    #[test]
    fn fit_landscape_into_square() {
        assert_eq!(calculate_fit_dimensions((800, 600), (400, 400), false), (400, 300));
    }

    #[test]
    fn fit_portrait_into_square() {
        assert_eq!(calculate_fit_dimensions((600, 800), (400, 400), false), (300, 400));
    }

    #[test]
    fn fit_small_source_without_enlargement_keeps_native() {
        assert_eq!(calculate_fit_dimensions((100, 50), (400, 400), false), (100, 50));
    }

    #[test]
    fn fit_small_source_with_enlargement_scales_up() {
        assert_eq!(calculate_fit_dimensions((100, 50), (400, 400), true), (400, 200));
    }

    #[test]
    fn fit_never_exceeds_bounds() {
        let (w, h) = calculate_fit_dimensions((333, 777), (100, 100), false);
        assert!(w <= 100 && h <= 100);
        assert_eq!(h, 100);
    }

    // =========================================================================
    // calculate_fill_dimensions tests
    // =========================================================================

    #[test]
    fn fill_wider_source_to_portrait_target() {
        // 800x600 (4:3) → 400x500 target
        // Source is wider, so height matches: 500, width = 500 * (4/3) = 667
        assert_eq!(calculate_fill_dimensions((800, 600), (400, 500), false), (667, 500));
    }

    #[test]
    fn fill_taller_source_to_landscape_target() {
        // 600x800 (3:4) → 500x400 target
        // Source is taller, so width matches: 500, height = 500 * (4/3) = 667
        assert_eq!(calculate_fill_dimensions((600, 800), (500, 400), false), (500, 667));
    }

    #[test]
    fn fill_same_aspect_ratio() {
        assert_eq!(calculate_fill_dimensions((800, 600), (400, 300), false), (400, 300));
    }

    #[test]
    fn fill_square_source_to_portrait() {
        // Source is wider (1:1 > 2:3), height matches: 300, width = 300
        assert_eq!(calculate_fill_dimensions((400, 400), (200, 300), false), (300, 300));
    }

    #[test]
    fn fill_without_enlargement_keeps_small_source() {
        // Covering 400x400 would need 533x400 from a 200x150 source
        assert_eq!(calculate_fill_dimensions((200, 150), (400, 400), false), (200, 150));
    }

    #[test]
    fn fill_with_enlargement_scales_up() {
        assert_eq!(calculate_fill_dimensions((200, 150), (400, 400), true), (533, 400));
    }

    #[test]
    fn center_offset_saturates() {
        assert_eq!(center_offset(400, 300), 50);
        assert_eq!(center_offset(300, 400), 0);
    }
}
