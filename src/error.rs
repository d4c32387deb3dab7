//! Error type for the host boundary.
//!
//! Scanning itself cannot fail; these cover configuration, serialization of
//! values handed to the host, and logging setup.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum InlayError {
    /// Activation config could not be read
    #[error("Failed to parse config: {0}")]
    Config(String),

    /// A value could not be converted for the host
    #[error("Failed to serialize {what}: {message}")]
    Serialization {
        what: &'static str,
        message: String,
    },

    /// A global tracing subscriber is already installed
    #[error("Tracing subscriber already initialized")]
    LoggingAlreadySet,
}

impl From<InlayError> for JsValue {
    fn from(err: InlayError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
