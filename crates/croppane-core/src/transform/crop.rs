//! Crop resolution and pixel materialization.
//!
//! A normalized crop may extend past the image on any side. The
//! [`OutOfBoundsPolicy`] decides what happens to the overflow:
//!
//! - **Clamp** keeps the requested size but slides the rectangle back inside
//!   the image, shrinking it only when it is larger than the image.
//! - **Pad** keeps the requested rectangle exactly. Pixels outside the image
//!   are materialized as transparent.
//!
//! Both policies fail when the request does not overlap the image at all.
//!
//! # Pad Offsets
//!
//! For a requested pixel rectangle `R` and the image bounds `B`, the copied
//! region is `S = R ∩ B` and it lands in the output at `S.origin - R.origin`.
//! With `R = (-10, 0, 100, 50)` on a 60x50 image, `S = (0, 0, 60, 50)` and
//! the copy starts at output column 10.
//!
//! Padded outputs are capped at [`MAX_OUTPUT_PIXELS`].

use serde::{Deserialize, Serialize};

use crate::bitmap::{buffer_len, Bitmap, CHANNELS};
use crate::error::CropError;
use crate::geometry::Rect;
use crate::mapping::{to_pixel_rect, PixelRect};

/// Largest padded output, in pixels (1 GiB of RGBA).
pub const MAX_OUTPUT_PIXELS: u64 = 1 << 28;

/// How a crop that overflows the image is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutOfBoundsPolicy {
    /// Slide the crop inside the image, shrinking it if needed.
    #[default]
    Clamp,
    /// Keep the requested extents and fill the overflow with transparency.
    Pad,
}

/// A resolved crop: which source pixels go where in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropPlan {
    /// The output rectangle in source pixel coordinates. Under Pad it may
    /// extend past the image.
    pub output: PixelRect,
    /// The source region to copy, always inside the image.
    pub source: PixelRect,
    /// Column in the output where the source region starts.
    pub dest_x: u32,
    /// Row in the output where the source region starts.
    pub dest_y: u32,
}

impl CropPlan {
    /// True when every output pixel comes from the source.
    pub fn is_fully_covered(&self) -> bool {
        self.source == self.output
    }
}

/// Resolve a normalized crop against a `width` x `height` upright image.
///
/// # Errors
///
/// - `CropError::EmptyImage` if the image has no pixels.
/// - `CropError::DegenerateCrop` if the request has zero or negative extent.
/// - `CropError::EmptyCropIntersection` if it does not overlap the image.
/// - `CropError::CropTooLarge` if a padded output exceeds
///   [`MAX_OUTPUT_PIXELS`].
pub fn resolve_crop(
    normalized: &Rect,
    policy: OutOfBoundsPolicy,
    width: u32,
    height: u32,
) -> Result<CropPlan, CropError> {
    if width == 0 || height == 0 {
        return Err(CropError::EmptyImage);
    }
    let finite = [normalized.x, normalized.y, normalized.width, normalized.height]
        .iter()
        .all(|v| v.is_finite());
    if !finite || normalized.width <= 0.0 || normalized.height <= 0.0 {
        return Err(CropError::DegenerateCrop);
    }
    if normalized.intersection(&Rect::new(0.0, 0.0, 1.0, 1.0)).is_none() {
        return Err(CropError::EmptyCropIntersection);
    }

    match policy {
        OutOfBoundsPolicy::Clamp => {
            let w = normalized.width.min(1.0);
            let h = normalized.height.min(1.0);
            let slid = Rect::new(
                normalized.x.clamp(0.0, 1.0 - w),
                normalized.y.clamp(0.0, 1.0 - h),
                w,
                h,
            );
            let mut output = to_pixel_rect(&slid, width, height)?;
            // One-pixel minimum can push a crop on the far edge past the image
            output.width = output.width.min(width);
            output.height = output.height.min(height);
            output.x = output.x.clamp(0, i64::from(width - output.width));
            output.y = output.y.clamp(0, i64::from(height - output.height));
            Ok(CropPlan {
                output,
                source: output,
                dest_x: 0,
                dest_y: 0,
            })
        }
        OutOfBoundsPolicy::Pad => {
            let requested = to_pixel_rect(normalized, width, height)?;
            let area = u64::from(requested.width) * u64::from(requested.height);
            if area > MAX_OUTPUT_PIXELS {
                return Err(CropError::CropTooLarge);
            }
            let source = requested
                .intersect_image(width, height)
                .ok_or(CropError::EmptyCropIntersection)?;
            let offset = |from: i64| u32::try_from(from).map_err(|_| CropError::CropTooLarge);
            Ok(CropPlan {
                output: requested,
                source,
                dest_x: offset(source.x - requested.x)?,
                dest_y: offset(source.y - requested.y)?,
            })
        }
    }
}

/// Materialize a resolved crop from an upright bitmap.
///
/// Pixels not covered by the plan's source region are transparent black.
///
/// # Errors
///
/// - `CropError::PixelBufferMismatch` if the image buffer does not match
///   its dimensions.
/// - `CropError::CropTooLarge` if the output buffer is not addressable.
/// - `CropError::DegenerateCrop` if the plan's source region does not fit
///   the image or the output.
pub fn apply_crop(image: &Bitmap, plan: &CropPlan) -> Result<Bitmap, CropError> {
    debug_assert!(image.orientation.is_upright(), "crop expects an upright bitmap");
    image.validate()?;

    let src = plan.source;
    let fits_image = src.x >= 0
        && src.y >= 0
        && src.right() <= i64::from(image.width)
        && src.bottom() <= i64::from(image.height);
    let fits_output = u64::from(plan.dest_x) + u64::from(src.width)
        <= u64::from(plan.output.width)
        && u64::from(plan.dest_y) + u64::from(src.height) <= u64::from(plan.output.height);
    if !fits_image || !fits_output {
        return Err(CropError::DegenerateCrop);
    }

    let len = buffer_len(plan.output.width, plan.output.height).ok_or(CropError::CropTooLarge)?;
    let mut output = vec![0u8; len];

    let row_bytes = src.width as usize * CHANNELS;
    let src_stride = image.width as usize * CHANNELS;
    let dst_stride = plan.output.width as usize * CHANNELS;

    // Copy pixel data row by row
    for row in 0..src.height as usize {
        let src_start = (src.y as usize + row) * src_stride + src.x as usize * CHANNELS;
        let dst_start =
            (plan.dest_y as usize + row) * dst_stride + plan.dest_x as usize * CHANNELS;
        output[dst_start..dst_start + row_bytes]
            .copy_from_slice(&image.pixels[src_start..src_start + row_bytes]);
    }

    Ok(Bitmap::new(plan.output.width, plan.output.height, output))
}

/// Resolve and materialize a normalized crop in one step.
pub fn crop_normalized(
    image: &Bitmap,
    normalized: &Rect,
    policy: OutOfBoundsPolicy,
) -> Result<Bitmap, CropError> {
    let plan = resolve_crop(normalized, policy, image.width, image.height)?;
    apply_crop(image, &plan)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
