//! Conversion between display coordinates, normalized coordinates and
//! source pixel coordinates.
//!
//! # Coordinate Spaces
//!
//! - **Display**: container units, as produced by the viewport and handles.
//! - **Normalized**: fractions of the display frame. (0, 0) is the frame's
//!   top-left corner and (1, 1) its bottom-right corner. Values outside
//!   `[0, 1]` describe a crop that overflows the image.
//! - **Pixel**: integer coordinates of the upright source bitmap.
//!
//! Pixel mapping assumes the bitmap is already upright. Rectify the bitmap
//! first, because raw buffer coordinates depend on the orientation.

use serde::{Deserialize, Serialize};

use crate::error::CropError;
use crate::geometry::Rect;

/// An integer rectangle in pixel space.
///
/// The origin may be negative or beyond the image when the rectangle
/// describes a padded crop. Width and height are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        self.x + i64::from(self.width)
    }

    pub fn bottom(&self) -> i64 {
        self.y + i64::from(self.height)
    }

    /// Overlap with the `width` x `height` image at the origin.
    pub fn intersect_image(&self, width: u32, height: u32) -> Option<PixelRect> {
        let left = self.x.max(0);
        let top = self.y.max(0);
        let right = self.right().min(i64::from(width));
        let bottom = self.bottom().min(i64::from(height));
        if right <= left || bottom <= top {
            return None;
        }
        Some(PixelRect::new(
            left,
            top,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}

/// Express `rect` as fractions of `frame`.
///
/// # Errors
///
/// Returns `CropError::DegenerateFrame` if the frame has no extent.
pub fn normalize(rect: &Rect, frame: &Rect) -> Result<Rect, CropError> {
    if frame.is_empty() || !frame.width.is_finite() || !frame.height.is_finite() {
        return Err(CropError::DegenerateFrame);
    }
    Ok(Rect::new(
        (rect.min_x() - frame.min_x()) / frame.width,
        (rect.min_y() - frame.min_y()) / frame.height,
        rect.width / frame.width,
        rect.height / frame.height,
    ))
}

/// Inverse of [`normalize`]: map normalized coordinates back onto `frame`.
pub fn denormalize(normalized: &Rect, frame: &Rect) -> Rect {
    Rect::new(
        frame.min_x() + normalized.x * frame.width,
        frame.min_y() + normalized.y * frame.height,
        normalized.width * frame.width,
        normalized.height * frame.height,
    )
}

/// Map a normalized rectangle onto a `width` x `height` upright bitmap.
///
/// Edges are rounded independently, so adjacent crops share their boundary
/// pixels exactly. A positive extent that rounds to zero becomes one pixel.
///
/// # Errors
///
/// - `CropError::DegenerateCrop` if the normalized width or height is zero,
///   negative or not finite.
/// - `CropError::CropTooLarge` if an edge lands beyond the integer pixel
///   range or a side is longer than `u32::MAX` pixels.
pub fn to_pixel_rect(normalized: &Rect, width: u32, height: u32) -> Result<PixelRect, CropError> {
    let (x, w) = pixel_span(normalized.x, normalized.width, width)?;
    let (y, h) = pixel_span(normalized.y, normalized.height, height)?;
    Ok(PixelRect::new(x, y, w, h))
}

/// Largest pixel coordinate magnitude that is exact in an `f64`.
const MAX_PIXEL_COORD: f64 = 9_007_199_254_740_992.0;

fn pixel_span(start: f64, extent: f64, pixels: u32) -> Result<(i64, u32), CropError> {
    if !start.is_finite() || !extent.is_finite() || extent <= 0.0 {
        return Err(CropError::DegenerateCrop);
    }
    let scale = f64::from(pixels);
    let lo = (start * scale).round();
    let hi = ((start + extent) * scale).round();
    let in_range = |v: f64| v.is_finite() && v.abs() <= MAX_PIXEL_COORD;
    if !in_range(lo) || !in_range(hi) {
        return Err(CropError::CropTooLarge);
    }
    let (lo, hi) = (lo as i64, hi as i64);
    let len = u32::try_from((hi - lo).max(1)).map_err(|_| CropError::CropTooLarge)?;
    Ok((lo, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Rect {
        Rect::new(50.0, 100.0, 200.0, 100.0)
    }

    #[test]
    fn test_normalize_full_frame() {
        let n = normalize(&frame(), &frame()).unwrap();
        assert_eq!(n, Rect::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_normalize_inner_rect() {
        let rect = Rect::new(100.0, 125.0, 100.0, 50.0);
        let n = normalize(&rect, &frame()).unwrap();
        assert_eq!(n, Rect::new(0.25, 0.25, 0.5, 0.5));
    }

    #[test]
    fn test_normalize_overflowing_rect() {
        let rect = Rect::new(200.0, 100.0, 100.0, 100.0);
        let n = normalize(&rect, &frame()).unwrap();
        assert_eq!(n, Rect::new(0.75, 0.0, 0.5, 1.0));
    }

    #[test]
    fn test_normalize_degenerate_frame() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            normalize(&rect, &Rect::new(0.0, 0.0, 0.0, 10.0)),
            Err(CropError::DegenerateFrame)
        );
        assert_eq!(
            normalize(&rect, &Rect::new(0.0, 0.0, 10.0, -1.0)),
            Err(CropError::DegenerateFrame)
        );
    }

    #[test]
    fn test_to_pixel_rect() {
        let n = Rect::new(0.25, 0.25, 0.5, 0.5);
        assert_eq!(to_pixel_rect(&n, 400, 200).unwrap(), PixelRect::new(100, 50, 200, 100));
    }

    #[test]
    fn test_to_pixel_rect_outside_image() {
        let n = Rect::new(-0.5, 0.75, 1.0, 0.5);
        assert_eq!(to_pixel_rect(&n, 100, 100).unwrap(), PixelRect::new(-50, 75, 100, 50));
    }

    #[test]
    fn test_to_pixel_rect_degenerate() {
        assert_eq!(
            to_pixel_rect(&Rect::new(0.0, 0.0, 0.0, 0.5), 100, 100),
            Err(CropError::DegenerateCrop)
        );
        assert_eq!(
            to_pixel_rect(&Rect::new(0.0, 0.0, 0.5, -0.5), 100, 100),
            Err(CropError::DegenerateCrop)
        );
        assert_eq!(
            to_pixel_rect(&Rect::new(f64::NAN, 0.0, 0.5, 0.5), 100, 100),
            Err(CropError::DegenerateCrop)
        );
    }

    #[test]
    fn test_huge_extent_is_rejected() {
        // 1e12 image widths is far past u32::MAX pixels
        assert_eq!(
            to_pixel_rect(&Rect::new(0.0, 0.0, 1e12, 1e12), 200, 100),
            Err(CropError::CropTooLarge)
        );
        assert_eq!(
            to_pixel_rect(&Rect::new(-1e300, 0.0, 1.0, 1.0), 200, 100),
            Err(CropError::CropTooLarge)
        );
        assert_eq!(
            to_pixel_rect(&Rect::new(0.0, 0.0, f64::MAX, 1.0), 200, 100),
            Err(CropError::CropTooLarge)
        );
    }

    #[test]
    fn test_tiny_extent_is_one_pixel() {
        let n = Rect::new(0.5, 0.5, 0.0001, 0.0001);
        let p = to_pixel_rect(&n, 100, 100).unwrap();
        assert_eq!((p.width, p.height), (1, 1));
    }

    #[test]
    fn test_intersect_image() {
        let p = PixelRect::new(-10, 90, 50, 50);
        assert_eq!(p.intersect_image(100, 100), Some(PixelRect::new(0, 90, 40, 10)));
        assert_eq!(PixelRect::new(100, 0, 10, 10).intersect_image(100, 100), None);
    }
}
