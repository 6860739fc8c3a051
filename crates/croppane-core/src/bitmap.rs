//! Pixel buffer and orientation types.

use serde::{Deserialize, Serialize};

use crate::error::CropError;
use crate::geometry::Size;

/// Bytes per pixel in a [`Bitmap`] (RGBA).
pub const CHANNELS: usize = 4;

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Upright (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl Orientation {
    /// Returns true if rectifying this orientation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }

    pub fn is_upright(self) -> bool {
        self == Orientation::Normal
    }

    /// Displayed size of a buffer of `size` with this orientation.
    pub fn upright_size(self, size: Size) -> Size {
        if self.swaps_dimensions() {
            Size::new(size.height, size.width)
        } else {
            size
        }
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// An immutable RGBA image with an orientation tag.
///
/// `width` and `height` describe the raw buffer, before orientation is
/// applied. Use [`Bitmap::upright_size`] for the dimensions as displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    /// Buffer width in pixels.
    pub width: u32,
    /// Buffer height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub pixels: Vec<u8>,
    /// How the buffer must be transformed to be displayed upright.
    pub orientation: Orientation,
}

impl Bitmap {
    /// Create an upright bitmap from dimensions and RGBA data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
            orientation: Orientation::Normal,
        }
    }

    /// A bitmap filled with a single color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * CHANNELS)
            .collect();
        Self::new(width, height, pixels)
    }

    /// Tag the bitmap with an orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// Convert to an `image::RgbaImage`, `None` when the buffer length does
    /// not match the dimensions.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Size of the raw buffer.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Size after orientation is applied.
    pub fn upright_size(&self) -> Size {
        self.orientation.upright_size(self.size())
    }

    /// RGBA value at a buffer coordinate.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Check that the buffer holds exactly `width * height` RGBA pixels.
    ///
    /// # Errors
    ///
    /// - `CropError::CropTooLarge` if the expected length is not addressable.
    /// - `CropError::PixelBufferMismatch` if the lengths differ.
    pub fn validate(&self) -> Result<(), CropError> {
        let expected = buffer_len(self.width, self.height).ok_or(CropError::CropTooLarge)?;
        if self.pixels.len() != expected {
            return Err(CropError::PixelBufferMismatch {
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }
}

/// Byte length of a `width` x `height` RGBA buffer, `None` on overflow.
pub fn buffer_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(CHANNELS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_orientation_swaps_dimensions() {
        assert!(!Orientation::Normal.swaps_dimensions());
        assert!(!Orientation::FlipHorizontal.swaps_dimensions());
        assert!(!Orientation::Rotate180.swaps_dimensions());
        assert!(!Orientation::FlipVertical.swaps_dimensions());

        assert!(Orientation::Transpose.swaps_dimensions());
        assert!(Orientation::Rotate90CW.swaps_dimensions());
        assert!(Orientation::Transverse.swaps_dimensions());
        assert!(Orientation::Rotate270CW.swaps_dimensions());
    }

    #[test]
    fn test_upright_size() {
        let bmp = Bitmap::filled(60, 40, [0, 0, 0, 255]);
        assert_eq!(bmp.upright_size(), Size::new(60.0, 40.0));

        let rotated = bmp.with_orientation(Orientation::Rotate90CW);
        assert_eq!(rotated.upright_size(), Size::new(40.0, 60.0));
        assert_eq!(rotated.size(), Size::new(60.0, 40.0));
    }

    #[test]
    fn test_filled_and_pixel() {
        let bmp = Bitmap::filled(3, 2, [10, 20, 30, 255]);
        assert_eq!(bmp.pixels.len(), 3 * 2 * 4);
        assert_eq!(bmp.pixel(2, 1), [10, 20, 30, 255]);
        assert!(!bmp.is_empty());
    }

    #[test]
    fn test_rgba_image_conversion() {
        let bmp = Bitmap::filled(4, 5, [1, 2, 3, 4]);
        let img = bmp.to_rgba_image().unwrap();
        assert_eq!(img.dimensions(), (4, 5));
        assert_eq!(Bitmap::from_rgba_image(img), bmp);
    }

    #[test]
    fn test_mismatched_buffer_converts_to_none() {
        let bmp = Bitmap {
            width: 10,
            height: 10,
            pixels: vec![0u8; 12],
            orientation: Orientation::Normal,
        };
        assert!(bmp.to_rgba_image().is_none());
    }

    #[test]
    fn test_validate_buffer_length() {
        assert_eq!(Bitmap::filled(10, 10, [0, 0, 0, 255]).validate(), Ok(()));

        let short = Bitmap {
            width: 10,
            height: 10,
            pixels: vec![0u8; 4],
            orientation: Orientation::Normal,
        };
        assert_eq!(
            short.validate(),
            Err(CropError::PixelBufferMismatch {
                expected: 400,
                actual: 4
            })
        );
    }

    #[test]
    fn test_buffer_len_overflow() {
        assert_eq!(buffer_len(3, 2), Some(24));
        assert_eq!(buffer_len(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn test_empty_bitmap() {
        let bmp = Bitmap::new(0, 0, vec![]);
        assert!(bmp.is_empty());
    }
}
