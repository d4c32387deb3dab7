//! Wire shapes for decoration values handed to a VSCode-like host.
//!
//! Field names are camelCase to match the host API:
//! - decoration type: `{ after: { margin, height, width, textDecoration }, rangeBehavior }`
//! - decoration: `{ range: { start, end }, renderOptions: { after: { contentIconPath } } }`

use serde::Serialize;

use crate::config::OverlayStyle;
use crate::scanner::{DisplayRange, OverlayAnnotation};

// ==================== DECORATION TYPE ====================

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HostAfterStyle<'a> {
    pub margin: &'a str,
    pub height: &'a str,
    pub width: &'a str,
    pub text_decoration: &'a str,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HostDecorationTypeOptions<'a> {
    pub after: HostAfterStyle<'a>,
    pub range_behavior: u8,
}

impl<'a> From<&'a OverlayStyle> for HostDecorationTypeOptions<'a> {
    fn from(style: &'a OverlayStyle) -> Self {
        Self {
            after: HostAfterStyle {
                margin: &style.after.margin,
                height: &style.after.height,
                width: &style.after.width,
                text_decoration: &style.after.text_decoration,
            },
            range_behavior: style.range_behavior.host_code(),
        }
    }
}

// ==================== DECORATIONS ====================

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostPosition {
    pub line: usize,
    pub character: usize,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostRange {
    pub start: HostPosition,
    pub end: HostPosition,
}

impl From<DisplayRange> for HostRange {
    fn from(range: DisplayRange) -> Self {
        Self {
            start: HostPosition { line: range.line, character: range.start },
            end: HostPosition { line: range.line, character: range.end },
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HostAfterContent<'a> {
    pub content_icon_path: &'a str,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HostRenderOptions<'a> {
    pub after: HostAfterContent<'a>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HostDecorationOptions<'a> {
    pub range: HostRange,
    pub render_options: HostRenderOptions<'a>,
}

impl<'a> From<&'a OverlayAnnotation> for HostDecorationOptions<'a> {
    fn from(overlay: &'a OverlayAnnotation) -> Self {
        Self {
            range: overlay.range.into(),
            render_options: HostRenderOptions {
                after: HostAfterContent {
                    content_icon_path: &overlay.image_url,
                },
            },
        }
    }
}

/// Convert a whole overlay set
pub fn host_decorations(overlays: &[OverlayAnnotation]) -> Vec<HostDecorationOptions<'_>> {
    overlays.iter().map(HostDecorationOptions::from).collect()
}
