//! WASM bindings for the interactive crop session.
//!
//! The UI forwards gestures as discrete commands. Translations and
//! magnifications are cumulative since the matching `begin_*` call.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const session = new JsCropSession(image);
//! session.layout(container.clientWidth, container.clientHeight);
//!
//! session.begin_resize(2); // bottom-right
//! session.update_drag(event.totalX, event.totalY);
//! session.end_gesture();
//!
//! const { x, y, width, height } = session.crop();
//! ```

use crate::types::JsBitmap;
use croppane_core::{CropHandle, CropSession, OutOfBoundsPolicy, Point, SessionConfig, Size};
use wasm_bindgen::prelude::*;

/// An interactive crop session for one image.
#[wasm_bindgen]
pub struct JsCropSession {
    inner: CropSession,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Start a session for `image` with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(image: &JsBitmap) -> Result<JsCropSession, JsValue> {
        Self::create(image, SessionConfig::default()).map_err(|e| JsValue::from_str(&e))
    }

    /// Start a session with a configuration object. Missing fields take
    /// their defaults.
    pub fn with_config(image: &JsBitmap, config: JsValue) -> Result<JsCropSession, JsValue> {
        let config: SessionConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid session config: {}", e)))?;
        Self::create(image, config).map_err(|e| JsValue::from_str(&e))
    }

    /// Record the container size. The first call creates the default crop.
    pub fn layout(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.inner
            .layout(Size::new(width, height))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Start dragging a handle (0-7). Returns false for an unknown index or
    /// before layout.
    pub fn begin_resize(&mut self, handle: u8) -> bool {
        match CropHandle::from_index(handle) {
            Some(handle) => self.inner.begin_resize(handle),
            None => false,
        }
    }

    pub fn begin_move(&mut self) -> bool {
        self.inner.begin_move()
    }

    pub fn begin_pan(&mut self) -> bool {
        self.inner.begin_pan()
    }

    pub fn begin_zoom(&mut self) -> bool {
        self.inner.begin_zoom()
    }

    /// Cumulative drag translation since the gesture began.
    pub fn update_drag(&mut self, x: f64, y: f64) {
        self.inner.update_drag(Point::new(x, y));
    }

    /// Cumulative pinch magnification since the gesture began.
    pub fn update_zoom(&mut self, magnification: f64) {
        self.inner.update_zoom(magnification);
    }

    /// Finish the gesture. Returns true when a history entry was added.
    pub fn end_gesture(&mut self) -> bool {
        self.inner.end_gesture()
    }

    pub fn cancel_gesture(&mut self) {
        self.inner.cancel_gesture();
    }

    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }

    pub fn reset(&mut self) -> bool {
        self.inner.reset()
    }

    #[wasm_bindgen(getter)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    /// Whether the crop may extend past the image, filled with transparency.
    #[wasm_bindgen(getter)]
    pub fn pad(&self) -> bool {
        self.inner.policy() == OutOfBoundsPolicy::Pad
    }

    #[wasm_bindgen(setter)]
    pub fn set_pad(&mut self, pad: bool) {
        self.inner.set_policy(policy_from_pad(pad));
    }

    /// User zoom factor.
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.viewport().scale
    }

    /// Crop rectangle as `{x, y, width, height}` in container coordinates,
    /// `undefined` before layout.
    pub fn crop(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.crop())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Rectangle the image occupies in the container, `undefined` before
    /// layout.
    pub fn display_frame(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.display_frame())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Position of a handle as `{x, y}`, for rendering and hit testing.
    pub fn handle_position(&self, handle: u8) -> Result<JsValue, JsValue> {
        let position = CropHandle::from_index(handle)
            .zip(self.inner.crop())
            .map(|(handle, crop)| handle.position(&crop));
        serde_wasm_bindgen::to_value(&position).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsCropSession {
    fn create(image: &JsBitmap, config: SessionConfig) -> Result<JsCropSession, String> {
        CropSession::new(image.upright_size(), config)
            .map(|inner| JsCropSession { inner })
            .map_err(|e| e.to_string())
    }

    pub(crate) fn inner(&self) -> &CropSession {
        &self.inner
    }
}

pub(crate) fn policy_from_pad(pad: bool) -> OutOfBoundsPolicy {
    if pad {
        OutOfBoundsPolicy::Pad
    } else {
        OutOfBoundsPolicy::Clamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use croppane_core::Rect;

    fn session() -> JsCropSession {
        let image = JsBitmap::new(200, 100, vec![0u8; 200 * 100 * 4], 1);
        let mut session = JsCropSession::create(&image, SessionConfig::default()).unwrap();
        assert!(session.layout(200.0, 200.0).is_ok());
        session
    }

    #[test]
    fn test_empty_image_rejected() {
        let image = JsBitmap::new(0, 0, Vec::new(), 1);
        let result = JsCropSession::create(&image, SessionConfig::default());
        assert_eq!(result.err().as_deref(), Some("Source image has zero extent"));
    }

    #[test]
    fn test_inverted_scale_bounds_rejected() {
        let image = JsBitmap::new(200, 100, vec![0u8; 200 * 100 * 4], 1);
        let config = SessionConfig {
            min_scale: 5.0,
            max_scale: 1.0,
            ..SessionConfig::default()
        };
        let result = JsCropSession::create(&image, config);
        assert_eq!(
            result.err().as_deref(),
            Some("Invalid session config: max_scale must be at least min_scale")
        );
    }

    #[test]
    fn test_session_uses_upright_size_without_pixels() {
        // Orientation 6 swaps the axes; the buffer is never read
        let image = JsBitmap::new(100, 200, Vec::new(), 6);
        let session = JsCropSession::create(&image, SessionConfig::default()).unwrap();
        assert_eq!(session.inner().image_size(), Size::new(200.0, 100.0));
    }

    #[test]
    fn test_unknown_handle_index() {
        let mut session = session();
        assert!(!session.begin_resize(8));
        assert!(session.begin_resize(2));
    }

    #[test]
    fn test_drag_and_undo() {
        let mut session = session();
        session.begin_resize(2);
        session.update_drag(10.0, 10.0);
        assert!(session.end_gesture());
        assert_eq!(session.inner().crop(), Some(Rect::new(70.0, 70.0, 70.0, 70.0)));

        assert!(session.can_undo());
        assert!(session.undo());
        assert_eq!(session.inner().crop(), Some(Rect::new(70.0, 70.0, 60.0, 60.0)));
        assert!(session.can_redo());
    }

    #[test]
    fn test_pad_toggle() {
        let mut session = session();
        assert!(!session.pad());
        session.set_pad(true);
        assert!(session.pad());
        assert_eq!(session.inner().policy(), OutOfBoundsPolicy::Pad);
    }

    #[test]
    fn test_zoom_scale() {
        let mut session = session();
        session.begin_zoom();
        session.update_zoom(2.5);
        session.end_gesture();
        assert_eq!(session.scale(), 2.5);
    }
}
