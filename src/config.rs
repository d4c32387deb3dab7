//! Overlay style and runtime configuration.
//!
//! `OverlayStyle` is the single decoration definition shared by every overlay.
//! It is built once at activation and handed to the annotator by reference.

use serde::{Deserialize, Serialize};

use crate::scanner::EMOTE_SIZE_PX;

// ==================== OVERLAY STYLE ====================

/// How a decoration grows when text is typed at its edges.
///
/// Discriminants follow the host enum (`DecorationRangeBehavior`).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RangeBehavior {
    OpenOpen,
    #[default]
    ClosedClosed,
    OpenClosed,
    ClosedOpen,
}

impl RangeBehavior {
    pub fn host_code(&self) -> u8 {
        match self {
            RangeBehavior::OpenOpen => 0,
            RangeBehavior::ClosedClosed => 1,
            RangeBehavior::OpenClosed => 2,
            RangeBehavior::ClosedOpen => 3,
        }
    }
}

/// Box rendered after the decorated range
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AfterContentStyle {
    pub margin: String,
    pub height: String,
    pub width: String,
    pub text_decoration: String,
}

impl Default for AfterContentStyle {
    fn default() -> Self {
        let edge = format!("{}px", EMOTE_SIZE_PX);
        Self {
            margin: "0 0 0 0".to_string(),
            height: edge.clone(),
            width: edge,
            text_decoration: "none".to_string(),
        }
    }
}

/// Decoration type definition for emote overlays
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct OverlayStyle {
    pub after: AfterContentStyle,
    pub range_behavior: RangeBehavior,
}

// ==================== RUNTIME CONFIG ====================

/// Settings accepted at activation. Every field is optional.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InlayConfig {
    /// `EnvFilter` directive, e.g. `"info"` or `"emote_inlay=debug"`
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for InlayConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}
