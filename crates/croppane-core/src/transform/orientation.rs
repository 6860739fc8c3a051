//! Orientation rectification.
//!
//! Pixel cropping works on raw buffer coordinates, so any bitmap that is
//! not upright is re-rendered first. The result reads top-to-bottom,
//! left-to-right as displayed and is tagged `Orientation::Normal`.

use std::borrow::Cow;

use image::DynamicImage;

use crate::bitmap::{Bitmap, Orientation};
use crate::error::CropError;

/// Re-render `image` upright. Already upright bitmaps are borrowed as is.
///
/// # Errors
///
/// Returns `CropError::OrientationRectifyFailure` if the pixel buffer does
/// not match the bitmap dimensions.
pub fn rectify(image: &Bitmap) -> Result<Cow<'_, Bitmap>, CropError> {
    if image.orientation.is_upright() {
        return Ok(Cow::Borrowed(image));
    }

    let rgba = image.to_rgba_image().ok_or_else(|| {
        CropError::OrientationRectifyFailure(format!(
            "buffer of {} bytes does not match {}x{}",
            image.pixels.len(),
            image.width,
            image.height
        ))
    })?;

    let upright = apply_orientation(DynamicImage::ImageRgba8(rgba), image.orientation);
    tracing::debug!(
        orientation = ?image.orientation,
        width = upright.width(),
        height = upright.height(),
        "Rectified orientation"
    );
    Ok(Cow::Owned(Bitmap::from_rgba_image(upright.into_rgba8())))
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
