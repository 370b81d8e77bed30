//! WebAssembly bindings for stripper.
//!
//! Exposes the compactor to a browser page that already has the pixels of
//! an `ImageData`. Decoding the picked file and re-encoding the result stay
//! on the JavaScript side (canvas APIs).
//!
//! # Building
//!
//! ```bash
//! rustup target add wasm32-unknown-unknown
//! cargo install wasm-bindgen-cli
//!
//! cargo build --target wasm32-unknown-unknown --release --no-default-features --features wasm
//!
//! wasm-bindgen --target web --out-dir web/pkg --out-name stripper \
//!   target/wasm32-unknown-unknown/release/stripper.wasm
//! ```
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { compactImageVertically } from './pkg/stripper.js';
//!
//! await init();
//!
//! const src = ctx.getImageData(0, 0, width, height);
//! // keep at most 7 rows per run, exact RGB match
//! const out = compactImageVertically(src.data, width, height, 7, 0);
//! const compacted = new ImageData(new Uint8ClampedArray(out), width);
//! ```

use wasm_bindgen::prelude::*;

use crate::compact::{self, CompactOptions};

/// Compact RGBA pixel data vertically.
///
/// # Arguments
///
/// * `data` - `ImageData.data` bytes (RGBA, row-major)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `max_strip_size` - Rows kept per run of near-duplicate rows (min 1)
/// * `tolerance` - Per-channel RGB tolerance, 0-255; alpha must match exactly
///
/// # Returns
///
/// Compacted RGBA bytes. The new height is `length / (4 * width)`, see
/// [`compacted_height`]. When nothing is discarded the bytes equal the input.
#[wasm_bindgen(js_name = "compactImageVertically")]
pub fn compact_image_vertically(
    data: &[u8],
    width: u32,
    height: u32,
    max_strip_size: u32,
    tolerance: u32,
) -> Result<Vec<u8>, JsError> {
    let options = CompactOptions::try_new(max_strip_size, tolerance)
        .map_err(|e| JsError::new(&e.to_string()))?;
    compact::compact_pixels(data, width, height, &options).map_err(|e| JsError::new(&e.to_string()))
}

/// Height in rows of an RGBA buffer of `len` bytes and the given width.
#[wasm_bindgen(js_name = "compactedHeight")]
pub fn compacted_height(len: usize, width: u32) -> Result<u32, JsError> {
    let stride = width as usize * 4;
    if stride == 0 || len % stride != 0 {
        return Err(JsError::new(&format!(
            "Buffer of {len} bytes is not a whole number of {width}-pixel RGBA rows",
        )));
    }
    Ok((len / stride) as u32)
}
