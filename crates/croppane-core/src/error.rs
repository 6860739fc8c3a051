//! Error types for crop geometry and processing.

use thiserror::Error;

/// Reasons a crop could not be applied.
///
/// Callers treat every variant as "crop could not be applied" and keep their
/// prior state. A missing document rectangle is not an error: the detector
/// simply returns `None` and the pipeline keeps the plain crop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CropError {
    /// The source image has a zero width or height.
    #[error("Source image has zero extent")]
    EmptyImage,

    /// The display frame has zero extent, so nothing can be normalized
    /// against it.
    #[error("Display frame has zero extent")]
    DegenerateFrame,

    /// The requested crop normalizes to a zero or negative width or height.
    #[error("Crop rectangle has zero or negative extent")]
    DegenerateCrop,

    /// The crop rectangle does not overlap the image at all.
    #[error("Crop rectangle does not overlap the image")]
    EmptyCropIntersection,

    /// The pixel buffer could not be re-rendered upright.
    #[error("Failed to rectify image orientation: {0}")]
    OrientationRectifyFailure(String),

    /// The pixel buffer length does not match the bitmap dimensions.
    #[error("Pixel buffer has {actual} bytes, expected {expected}")]
    PixelBufferMismatch { expected: usize, actual: usize },

    /// The crop would need an output buffer beyond `MAX_OUTPUT_PIXELS`
    /// or beyond addressable memory.
    #[error("Crop exceeds the maximum output size")]
    CropTooLarge,

    /// A session config value is out of range.
    #[error("Invalid session config: {0}")]
    InvalidConfig(String),
}

/// Error types for image decoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not in a recognized or enabled image format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}
