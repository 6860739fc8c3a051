//! Image decoding with EXIF orientation tagging.
//!
//! Decoding never applies the orientation. The raw buffer is returned as
//! stored in the file, tagged with its EXIF orientation, so the crop
//! pipeline can decide when to rectify.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::ImageReader;

use crate::bitmap::{Bitmap, Orientation};
use crate::error::DecodeError;

/// Decode an image from bytes, tagging it with its EXIF orientation.
///
/// Supports every format enabled on the `image` crate (JPEG and PNG in the
/// default build).
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be guessed.
/// Returns `DecodeError::CorruptedFile` if the data fails to decode.
pub fn decode_image(bytes: &[u8]) -> Result<Bitmap, DecodeError> {
    let orientation = read_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    tracing::debug!(
        width = img.width(),
        height = img.height(),
        ?orientation,
        "Decoded image"
    );

    Ok(Bitmap::from_rgba_image(img.into_rgba8()).with_orientation(orientation))
}

/// Read the EXIF orientation from encoded image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or the tag cannot
/// be read.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}
