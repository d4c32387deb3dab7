//! Emote Inlay: Inline Emote Overlays for Editor Text
//!
//! A Rust/WASM implementation that finds `<:name:id>` / `<a:name:id>` emote
//! references in the active editor view and renders the emote image right
//! after each one, keeping the overlays in step with edits and focus changes.
//!
//! # Architecture
//!
//! ## Scanner Components
//! - `emote.rs` - EmoteCortex: token extraction via regex
//! - `image.rs` - CDN image URL per token (`png`, or `gif` when animated)
//! - `range.rs` - byte span → UTF-16 column mapping
//! - `document.rs` - EmoteScanner: whole-document scan into an overlay set
//!
//! ## Synchronization
//! - `annotator` - Annotator: rescans on every change, replaces the overlay set
//! - `host` - host traits, in-memory host, wasm-bindgen adapter
//! - `extension` - `activate` / `deactivate` lifecycle
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { EmoteScanner } from 'emote-inlay';
//!
//! await init();
//!
//! const scanner = new EmoteScanner();
//! const result = scanner.scanText("hi <:wave:12345678901234567> bye");
//!
//! console.log(result.overlays); // [{ range: { line: 0, start: 3, end: 28 }, image_url: "https://cdn..." }]
//! console.log(result.stats);    // lines, tokens, timing
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod scanner;
pub mod host;
pub mod annotator;
pub mod extension;

// Public exports - Scanner
pub use scanner::*;

// Public exports - Host + lifecycle
pub use annotator::{Annotator, AnnotatorResource};
pub use config::{AfterContentStyle, InlayConfig, OverlayStyle, RangeBehavior};
pub use error::InlayError;
pub use extension::{activate, deactivate};
pub use host::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("emote-inlay v{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_names_crate() {
        assert!(version().starts_with("emote-inlay v"));
    }
}
