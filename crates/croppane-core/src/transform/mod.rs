//! Pixel transforms applied by the crop pipeline.
//!
//! # Transform Order
//!
//! 1. Orientation rectification
//! 2. Crop (clamped or padded)
//! 3. Perspective correction, when a document rectangle was detected
//!
//! # Coordinate System
//!
//! - Crop coordinates are normalized (0.0 to 1.0) relative to the upright image
//! - Origin is top-left corner

mod crop;
mod orientation;
mod perspective;

pub use crop::{
    apply_crop, crop_normalized, resolve_crop, CropPlan, OutOfBoundsPolicy, MAX_OUTPUT_PIXELS,
};
pub use orientation::rectify;
pub use perspective::{corrected_size, ProjectiveCorrector, WarpInterpolation};
