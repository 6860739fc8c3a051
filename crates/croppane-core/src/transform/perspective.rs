//! Keystone correction with a projective warp.
//!
//! The detected quadrilateral is mapped onto an axis-aligned rectangle whose
//! width is the longer of the top and bottom edges and whose height is the
//! longer of the left and right edges. Output pixels with no pre-image in
//! the source are transparent.

use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

use crate::bitmap::Bitmap;
use crate::detect::{PerspectiveCorrector, Quad};

/// Perspective corrector backed by `imageproc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectiveCorrector {
    /// Interpolation for the warp. Bilinear unless overridden.
    pub interpolation: WarpInterpolation,
}

/// Interpolation used when sampling the source bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarpInterpolation {
    Nearest,
    #[default]
    Bilinear,
    Bicubic,
}

impl WarpInterpolation {
    fn to_imageproc(self) -> Interpolation {
        match self {
            WarpInterpolation::Nearest => Interpolation::Nearest,
            WarpInterpolation::Bilinear => Interpolation::Bilinear,
            WarpInterpolation::Bicubic => Interpolation::Bicubic,
        }
    }
}

/// Output dimensions for straightening `quad`.
pub fn corrected_size(quad: &Quad) -> (u32, u32) {
    let width = quad
        .top_left
        .distance(quad.top_right)
        .max(quad.bottom_left.distance(quad.bottom_right));
    let height = quad
        .top_left
        .distance(quad.bottom_left)
        .max(quad.top_right.distance(quad.bottom_right));
    (
        (width.round() as u32).max(1),
        (height.round() as u32).max(1),
    )
}

impl PerspectiveCorrector for ProjectiveCorrector {
    fn correct(&self, image: &Bitmap, corners: &Quad) -> Option<Bitmap> {
        let source = image.to_rgba_image()?;
        let (out_w, out_h) = corrected_size(corners);

        let from = corners.corners().map(|p| (p.x as f32, p.y as f32));
        let to = [
            (0.0, 0.0),
            (out_w as f32, 0.0),
            (out_w as f32, out_h as f32),
            (0.0, out_h as f32),
        ];

        let Some(projection) = Projection::from_control_points(from, to) else {
            tracing::warn!(?corners, "Failed to compute projective transform");
            return None;
        };

        let mut output = RgbaImage::new(out_w, out_h);
        warp_into(
            &source,
            &projection,
            self.interpolation.to_imageproc(),
            Rgba([0, 0, 0, 0]),
            &mut output,
        );

        tracing::debug!(out_w, out_h, "Perspective correction applied");
        Some(Bitmap::from_rgba_image(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    /// Nearest sampling keeps uniform regions exact.
    fn nearest() -> ProjectiveCorrector {
        ProjectiveCorrector {
            interpolation: WarpInterpolation::Nearest,
        }
    }

    fn quad(points: [(f64, f64); 4]) -> Quad {
        let [a, b, c, d] = points.map(|(x, y)| Point::new(x, y));
        Quad::new(a, b, c, d)
    }

    #[test]
    fn test_corrected_size_axis_aligned() {
        let q = quad([(10.0, 10.0), (110.0, 10.0), (110.0, 60.0), (10.0, 60.0)]);
        assert_eq!(corrected_size(&q), (100, 50));
    }

    #[test]
    fn test_corrected_size_uses_longer_edges() {
        // Trapezoid: top edge 60, bottom edge 100
        let q = quad([(20.0, 0.0), (80.0, 0.0), (100.0, 40.0), (0.0, 40.0)]);
        let (w, h) = corrected_size(&q);
        assert_eq!(w, 100);
        // Slanted sides: sqrt(20^2 + 40^2) ~= 44.7
        assert_eq!(h, 45);
    }

    #[test]
    fn test_identity_quad_preserves_content() {
        let img = Bitmap::filled(40, 30, [200, 100, 50, 255]);
        let q = quad([(0.0, 0.0), (40.0, 0.0), (40.0, 30.0), (0.0, 30.0)]);

        let result = nearest().correct(&img, &q).unwrap();
        assert_eq!((result.width, result.height), (40, 30));
        assert_eq!(result.pixel(20, 15), [200, 100, 50, 255]);
    }

    #[test]
    fn test_inner_quad_extracts_region() {
        // Left half red, right half blue; straighten the right half only
        let mut rgba = RgbaImage::from_pixel(40, 20, Rgba([255, 0, 0, 255]));
        for y in 0..20 {
            for x in 20..40 {
                rgba.put_pixel(x, y, Rgba([0, 0, 255, 255]));
            }
        }
        let img = Bitmap::from_rgba_image(rgba);
        let q = quad([(22.0, 2.0), (38.0, 2.0), (38.0, 18.0), (22.0, 18.0)]);

        let result = nearest().correct(&img, &q).unwrap();
        assert_eq!((result.width, result.height), (16, 16));
        assert_eq!(result.pixel(8, 8), [0, 0, 255, 255]);
    }

    #[test]
    fn test_mismatched_buffer_fails() {
        let img = Bitmap {
            width: 10,
            height: 10,
            pixels: vec![0u8; 4],
            orientation: crate::bitmap::Orientation::Normal,
        };
        let q = quad([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        assert!(ProjectiveCorrector::default().correct(&img, &q).is_none());
    }
}
