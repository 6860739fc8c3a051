//! Croppane Core - Interactive crop library
//!
//! This crate provides the geometry and image processing behind Croppane's
//! crop screen: aspect-fit placement, pan and zoom, resize handles, undo
//! history, and the background pipeline that maps the on-screen crop onto
//! source pixels and optionally straightens a detected document.

pub mod bitmap;
pub mod decode;
pub mod detect;
pub mod error;
pub mod geometry;
pub mod handles;
pub mod history;
pub mod mapping;
pub mod process;
pub mod session;
pub mod transform;
pub mod viewport;

pub use bitmap::{Bitmap, Orientation};
pub use decode::decode_image;
pub use detect::{
    DetectionConfig, NoCorrection, NoDetection, PerspectiveCorrector, Quad, RectangleDetector,
    RectangleObservation,
};
pub use error::{CropError, DecodeError};
pub use geometry::{Point, Rect, Size};
pub use handles::CropHandle;
pub use mapping::PixelRect;
pub use process::{CropOutput, CropPipeline, CropRequest};
pub use session::{CropSession, SessionConfig};
pub use transform::{OutOfBoundsPolicy, ProjectiveCorrector};
pub use viewport::ViewportState;
