//! Document rectangle detection and perspective correction seams.
//!
//! Both collaborators are best-effort. A detector that finds nothing, or a
//! corrector that fails, degrades the pipeline to the plain crop. Neither
//! ever produces an error.
//!
//! Detector corners are normalized with the origin at the bottom-left of
//! the image, y growing upward. Corrector corners are pixel coordinates with
//! the origin at the top-left. Use [`Quad::to_pixel_space`] to convert.

use serde::{Deserialize, Serialize};

use crate::bitmap::Bitmap;
use crate::geometry::Point;

/// Four corners of a detected quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl Quad {
    pub fn new(top_left: Point, top_right: Point, bottom_right: Point, bottom_left: Point) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// Corners in clockwise order starting at the top-left.
    pub fn corners(&self) -> [Point; 4] {
        [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
    }

    /// Convert normalized bottom-up corners to top-down pixel coordinates of
    /// a `width` x `height` bitmap.
    pub fn to_pixel_space(&self, width: u32, height: u32) -> Quad {
        let (w, h) = (f64::from(width), f64::from(height));
        let map = |p: Point| Point::new(p.x * w, (1.0 - p.y) * h);
        Quad::new(
            map(self.top_left),
            map(self.top_right),
            map(self.bottom_right),
            map(self.bottom_left),
        )
    }
}

/// A detected rectangle and the detector's confidence in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangleObservation {
    /// Normalized corners, origin bottom-left.
    pub corners: Quad,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
}

/// Tuning passed to the rectangle detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Smallest accepted short-side/long-side ratio.
    pub min_aspect_ratio: f32,
    /// Largest accepted short-side/long-side ratio.
    pub max_aspect_ratio: f32,
    /// Smallest accepted size relative to the image (0.0 to 1.0).
    pub min_size: f32,
    /// Observations below this confidence are discarded.
    pub min_confidence: f32,
    /// Maximum number of observations the detector reports.
    pub max_observations: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_aspect_ratio: 0.3,
            max_aspect_ratio: 1.0,
            min_size: 0.2,
            min_confidence: 0.5,
            max_observations: 1,
        }
    }
}

/// Finds a document-like rectangle in a bitmap.
pub trait RectangleDetector: Send + Sync {
    /// Best observation in `image`, or `None` when nothing qualifies.
    fn detect(&self, image: &Bitmap, config: &DetectionConfig) -> Option<RectangleObservation>;
}

/// Produces a keystone-corrected bitmap from four pixel-space corners.
pub trait PerspectiveCorrector: Send + Sync {
    /// Corrected bitmap, or `None` if the correction fails.
    fn correct(&self, image: &Bitmap, corners: &Quad) -> Option<Bitmap>;
}

/// Detector that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDetection;

impl RectangleDetector for NoDetection {
    fn detect(&self, _image: &Bitmap, _config: &DetectionConfig) -> Option<RectangleObservation> {
        None
    }
}

/// Corrector that always fails, leaving the plain crop.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCorrection;

impl PerspectiveCorrector for NoCorrection {
    fn correct(&self, _image: &Bitmap, _corners: &Quad) -> Option<Bitmap> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DetectionConfig::default();
        assert_eq!(config.min_aspect_ratio, 0.3);
        assert_eq!(config.max_aspect_ratio, 1.0);
        assert_eq!(config.min_size, 0.2);
        assert_eq!(config.min_confidence, 0.5);
        assert_eq!(config.max_observations, 1);
    }

    #[test]
    fn test_to_pixel_space_flips_vertical_axis() {
        let normalized = Quad::new(
            Point::new(0.1, 0.9),
            Point::new(0.9, 0.9),
            Point::new(0.9, 0.1),
            Point::new(0.1, 0.1),
        );
        let pixels = normalized.to_pixel_space(200, 100);

        assert!(pixels.top_left.distance(Point::new(20.0, 10.0)) < 1e-9);
        assert!(pixels.top_right.distance(Point::new(180.0, 10.0)) < 1e-9);
        assert!(pixels.bottom_right.distance(Point::new(180.0, 90.0)) < 1e-9);
        assert!(pixels.bottom_left.distance(Point::new(20.0, 90.0)) < 1e-9);
    }

    #[test]
    fn test_stubs_return_none() {
        let bmp = Bitmap::filled(4, 4, [0, 0, 0, 255]);
        assert!(NoDetection.detect(&bmp, &DetectionConfig::default()).is_none());
        let quad = Quad::new(Point::ZERO, Point::ZERO, Point::ZERO, Point::ZERO);
        assert!(NoCorrection.correct(&bmp, &quad).is_none());
    }
}
