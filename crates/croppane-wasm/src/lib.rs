//! Croppane WASM - WebAssembly bindings for Croppane
//!
//! This crate exposes the croppane-core crop session and pipeline to
//! JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible bitmap wrapper
//! - `decode` - Image decoding
//! - `session` - Interactive crop session (gestures, undo/redo)
//! - `process` - Crop pipeline
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, JsCropSession, process_crop } from '@croppane/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const session = new JsCropSession(image);
//! session.layout(800, 600);
//!
//! const result = process_crop(session, image, false);
//! console.log(`Cropped to ${result.width}x${result.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod process;
mod session;
mod types;

pub use decode::decode_image;
pub use process::{process_crop, JsCropResult};
pub use session::JsCropSession;
pub use types::JsBitmap;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
