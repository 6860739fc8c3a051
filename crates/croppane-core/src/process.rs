//! The crop pipeline: rectify, map, crop, detect, correct.
//!
//! # Pipeline
//!
//! 1. Rectify the source orientation.
//! 2. Compute the display frame from the container size and viewport.
//! 3. Normalize the crop against the frame, resolve it per policy and
//!    materialize the cropped bitmap.
//! 4. Run the rectangle detector on the crop.
//! 5. If a rectangle is found, run the perspective corrector on it.
//!
//! Steps 1 to 3 can fail. Steps 4 and 5 are best-effort and silently fall
//! back to the plain crop. The output is always upright.
//!
//! # Threading
//!
//! The pipeline is synchronous. [`CropPipeline::spawn`] runs it on a worker
//! thread for hosts with threads; WASM hosts call [`CropPipeline::process`]
//! from a Web Worker instead. There is no cancellation.

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;

use crate::bitmap::{Bitmap, Orientation};
use crate::detect::{
    DetectionConfig, NoDetection, PerspectiveCorrector, RectangleDetector, RectangleObservation,
};
use crate::error::CropError;
use crate::geometry::{Rect, Size};
use crate::mapping::{normalize, PixelRect};
use crate::transform::{apply_crop, rectify, resolve_crop, OutOfBoundsPolicy, ProjectiveCorrector};
use crate::viewport::ViewportState;

/// Everything the pipeline needs to produce a crop.
#[derive(Debug, Clone)]
pub struct CropRequest {
    /// Source image, in any orientation.
    pub image: Bitmap,
    /// Size of the container the image is displayed in.
    pub container: Size,
    /// User zoom and pan at the time of the request.
    pub viewport: ViewportState,
    /// Crop rectangle in container coordinates.
    pub crop: Rect,
    pub policy: OutOfBoundsPolicy,
}

/// Result of a successful crop.
#[derive(Debug, Clone)]
pub struct CropOutput {
    /// Final image, always tagged upright.
    pub image: Bitmap,
    /// Requested pixel rectangle in the upright source.
    pub pixel_rect: PixelRect,
    /// The detector's observation, when one was accepted.
    pub detection: Option<RectangleObservation>,
    /// True when the perspective corrector's output was substituted.
    pub corrected: bool,
}

/// Crop pipeline with its detector and corrector collaborators.
#[derive(Clone)]
pub struct CropPipeline {
    detector: Arc<dyn RectangleDetector>,
    corrector: Arc<dyn PerspectiveCorrector>,
    config: DetectionConfig,
}

impl std::fmt::Debug for CropPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CropPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for CropPipeline {
    /// No detector and the projective corrector.
    fn default() -> Self {
        Self::new(Arc::new(NoDetection), Arc::new(ProjectiveCorrector::default()))
    }
}

impl CropPipeline {
    pub fn new(
        detector: Arc<dyn RectangleDetector>,
        corrector: Arc<dyn PerspectiveCorrector>,
    ) -> Self {
        Self {
            detector,
            corrector,
            config: DetectionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DetectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Run the pipeline synchronously.
    ///
    /// # Errors
    ///
    /// - `CropError::EmptyImage` if the source has no pixels.
    /// - `CropError::PixelBufferMismatch` if the buffer length does not match
    ///   the source dimensions.
    /// - `CropError::OrientationRectifyFailure` if rectification fails.
    /// - `CropError::DegenerateFrame` if the display frame has no extent.
    /// - `CropError::DegenerateCrop` / `CropError::EmptyCropIntersection`
    ///   if the crop cannot be resolved.
    /// - `CropError::CropTooLarge` if a padded output would exceed
    ///   [`MAX_OUTPUT_PIXELS`](crate::transform::MAX_OUTPUT_PIXELS).
    pub fn process(&self, request: &CropRequest) -> Result<CropOutput, CropError> {
        if request.image.is_empty() {
            return Err(CropError::EmptyImage);
        }
        request.image.validate()?;

        let upright = rectify(&request.image)?;
        if request.container.is_empty() {
            return Err(CropError::DegenerateFrame);
        }
        let frame = request.viewport.frame(upright.size(), request.container);
        let normalized = normalize(&request.crop, &frame)?;
        let plan = resolve_crop(&normalized, request.policy, upright.width, upright.height)?;
        let cropped = apply_crop(&upright, &plan)?;

        tracing::debug!(
            policy = ?request.policy,
            x = plan.output.x,
            y = plan.output.y,
            width = plan.output.width,
            height = plan.output.height,
            padded = !plan.is_fully_covered(),
            "Resolved crop"
        );

        let (image, detection, corrected) = self.straighten(cropped);
        Ok(CropOutput {
            image: image.with_orientation(Orientation::Normal),
            pixel_rect: plan.output,
            detection,
            corrected,
        })
    }

    /// Run the pipeline on a worker thread.
    ///
    /// The receiver yields exactly one result.
    pub fn spawn(&self, request: CropRequest) -> Receiver<Result<CropOutput, CropError>> {
        let (tx, rx) = mpsc::sync_channel(1);
        let pipeline = self.clone();
        thread::spawn(move || {
            // The caller may have dropped the receiver; nothing to report then
            let _ = tx.send(pipeline.process(&request));
        });
        rx
    }

    /// Detect and correct, falling back to `cropped` on any miss.
    fn straighten(&self, cropped: Bitmap) -> (Bitmap, Option<RectangleObservation>, bool) {
        let Some(observation) = self.detector.detect(&cropped, &self.config) else {
            tracing::debug!("No document rectangle detected");
            return (cropped, None, false);
        };
        if observation.confidence < self.config.min_confidence {
            tracing::debug!(
                confidence = observation.confidence,
                min_confidence = self.config.min_confidence,
                "Discarding low-confidence rectangle"
            );
            return (cropped, None, false);
        }

        let corners = observation
            .corners
            .to_pixel_space(cropped.width, cropped.height);
        match self.corrector.correct(&cropped, &corners) {
            Some(corrected) => {
                tracing::info!(
                    width = corrected.width,
                    height = corrected.height,
                    "Applied perspective correction"
                );
                (corrected, Some(observation), true)
            }
            None => {
                tracing::warn!("Perspective correction failed; keeping plain crop");
                (cropped, Some(observation), false)
            }
        }
    }
}
