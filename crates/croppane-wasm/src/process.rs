//! WASM bindings for the crop pipeline.
//!
//! The pipeline is synchronous. Call [`process_crop`] from a Web Worker to
//! keep the UI thread free.

use crate::session::{policy_from_pad, JsCropSession};
use crate::types::JsBitmap;
use croppane_core::{CropError, CropOutput, CropPipeline};
use wasm_bindgen::prelude::*;

/// Result of a successful crop.
#[wasm_bindgen]
pub struct JsCropResult {
    image: JsBitmap,
    x: i64,
    y: i64,
    width: u32,
    height: u32,
    corrected: bool,
}

#[wasm_bindgen]
impl JsCropResult {
    /// The cropped, upright image.
    #[wasm_bindgen(getter)]
    pub fn image(&self) -> JsBitmap {
        self.image.clone()
    }

    /// Left edge of the crop in source pixels. Negative when padded.
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> i64 {
        self.x
    }

    /// Top edge of the crop in source pixels. Negative when padded.
    #[wasm_bindgen(getter)]
    pub fn y(&self) -> i64 {
        self.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when a detected document was straightened.
    #[wasm_bindgen(getter)]
    pub fn corrected(&self) -> bool {
        self.corrected
    }
}

impl JsCropResult {
    fn from_output(output: CropOutput) -> Self {
        Self {
            x: output.pixel_rect.x,
            y: output.pixel_rect.y,
            width: output.pixel_rect.width,
            height: output.pixel_rect.height,
            corrected: output.corrected,
            image: JsBitmap::from_bitmap(output.image),
        }
    }
}

/// Crop `image` to the session's current crop rectangle.
///
/// `pad` selects the out-of-bounds policy for this crop: true fills the
/// overflow with transparency, false slides the crop inside the image.
///
/// # Errors
///
/// Returns an error if the session has not been laid out or the crop
/// cannot be applied. The session state is unaffected either way.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const result = process_crop(session, image, false);
/// ctx.putImageData(new ImageData(result.image.image_data(), result.width), 0, 0);
/// ```
#[wasm_bindgen]
pub fn process_crop(
    session: &JsCropSession,
    image: &JsBitmap,
    pad: bool,
) -> Result<JsCropResult, JsValue> {
    match run(session, image, pad) {
        Ok(Some(output)) => Ok(JsCropResult::from_output(output)),
        Ok(None) => Err(JsValue::from_str("Crop session has not been laid out")),
        Err(e) => {
            let message = e.to_string();
            web_sys::console::warn_1(&JsValue::from_str(&format!("Crop failed: {}", message)));
            Err(JsValue::from_str(&message))
        }
    }
}

fn run(
    session: &JsCropSession,
    image: &JsBitmap,
    pad: bool,
) -> Result<Option<CropOutput>, CropError> {
    let Some(mut request) = session.inner().crop_request(image.to_bitmap()) else {
        return Ok(None);
    };
    request.policy = policy_from_pad(pad);
    CropPipeline::default().process(&request).map(Some)
}
