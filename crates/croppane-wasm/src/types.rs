//! WASM-compatible wrapper types for bitmaps.

use croppane_core::{Bitmap, Orientation, Size};
use wasm_bindgen::prelude::*;

/// An RGBA bitmap wrapper for JavaScript.
///
/// The pixel data is stored in WASM memory. `pixels()` and `image_data()`
/// copy it into JavaScript memory.
#[wasm_bindgen]
#[derive(Clone)]
pub struct JsBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    orientation: u8,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Create a bitmap from dimensions, RGBA data and an EXIF orientation
    /// value (1-8, anything else is treated as upright).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>, orientation: u32) -> JsBitmap {
        JsBitmap {
            width,
            height,
            pixels,
            orientation: Orientation::from(orientation) as u8,
        }
    }

    /// Buffer width in pixels, before orientation is applied
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels, before orientation is applied
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// EXIF orientation value (1-8)
    #[wasm_bindgen(getter)]
    pub fn orientation(&self) -> u8 {
        self.orientation
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Returns RGBA pixel data as a Uint8ClampedArray, ready for `ImageData`.
    pub fn image_data(&self) -> js_sys::Uint8ClampedArray {
        js_sys::Uint8ClampedArray::from(self.pixels.as_slice())
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsBitmap {
    pub(crate) fn from_bitmap(bitmap: Bitmap) -> Self {
        Self {
            width: bitmap.width,
            height: bitmap.height,
            orientation: bitmap.orientation as u8,
            pixels: bitmap.pixels,
        }
    }

    /// Dimensions as displayed, after orientation is applied.
    pub(crate) fn upright_size(&self) -> Size {
        Orientation::from(u32::from(self.orientation))
            .upright_size(Size::new(f64::from(self.width), f64::from(self.height)))
    }

    /// Convert to a core Bitmap. Clones the pixel data.
    pub(crate) fn to_bitmap(&self) -> Bitmap {
        Bitmap {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
            orientation: Orientation::from(u32::from(self.orientation)),
        }
    }
}
