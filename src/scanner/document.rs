//! EmoteScanner: Whole-Document Emote Scan
//!
//! One call walks every line and produces the complete overlay set:
//! - Token extraction (via EmoteCortex)
//! - Image URL construction (via `image_url`)
//! - Byte span → UTF-16 column mapping (via `Utf16Columns`)
//!
//! Nothing is cached between calls. Every scan recomputes the full set.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::scanner::{image_url, map_range, DisplayRange, EmoteCortex, Utf16Columns};

// =============================================================================
// Types
// =============================================================================

/// One rendered overlay: where it goes and which image it shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayAnnotation {
    pub range: DisplayRange,
    pub image_url: String,
}

/// Per-scan statistics
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub lines_scanned: usize,
    pub tokens_found: usize,
    pub animated_found: usize,
    pub elapsed_us: u64,
}

/// Full overlay set for a document
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DocumentScan {
    pub overlays: Vec<OverlayAnnotation>,
    pub stats: ScanStats,
}

// =============================================================================
// EmoteScanner
// =============================================================================

/// Line-by-line document scanner
#[wasm_bindgen]
pub struct EmoteScanner {
    cortex: EmoteCortex,
}

impl Default for EmoteScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl EmoteScanner {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            cortex: EmoteCortex::new(),
        }
    }

    /// Scan a single line (JS binding). Ranges report line 0.
    #[wasm_bindgen(js_name = scanLine)]
    pub fn js_scan_line(&self, line: &str) -> JsValue {
        let overlays = self.scan_line(0, line);
        serde_wasm_bindgen::to_value(&overlays).unwrap_or(JsValue::NULL)
    }

    /// Scan a whole text, split on `\n` / `\r\n` (JS binding)
    #[wasm_bindgen(js_name = scanText)]
    pub fn js_scan_text(&self, text: &str) -> JsValue {
        let result = self.scan_text(text);
        match serde_wasm_bindgen::to_value(&result) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "scan result serialization failed");
                JsValue::NULL
            }
        }
    }
}

impl EmoteScanner {
    /// Overlays for one line, in token order
    pub fn scan_line(&self, line_index: usize, line: &str) -> Vec<OverlayAnnotation> {
        let mut columns = Utf16Columns::new(line);
        self.cortex
            .extract(line)
            .iter()
            .map(|token| OverlayAnnotation {
                range: map_range(line_index, &mut columns, token),
                image_url: image_url(token),
            })
            .collect()
    }

    /// Scan every line. Line numbers follow iteration order.
    pub fn scan_lines<I, S>(&self, lines: I) -> DocumentScan
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let start = instant::Instant::now();
        let mut result = DocumentScan::default();

        for (line_index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            result.stats.lines_scanned += 1;

            let mut columns = Utf16Columns::new(line);
            for token in self.cortex.extract(line) {
                if token.animated {
                    result.stats.animated_found += 1;
                }
                result.overlays.push(OverlayAnnotation {
                    range: map_range(line_index, &mut columns, &token),
                    image_url: image_url(&token),
                });
            }
        }

        result.stats.tokens_found = result.overlays.len();
        result.stats.elapsed_us = start.elapsed().as_micros() as u64;
        result
    }

    /// Scan a text blob split with `text_lines`
    pub fn scan_text(&self, text: &str) -> DocumentScan {
        self.scan_lines(text_lines(text))
    }
}

// =============================================================================
// Line splitting
// =============================================================================

/// Lines of `text`, breaking on `\n`, `\r\n` and a lone `\r` the way
/// editor hosts do. Like `str::lines`, a final terminator does not start an
/// extra empty line.
pub fn text_lines(text: &str) -> TextLines<'_> {
    TextLines { rest: text }
}

/// Iterator returned by `text_lines`
#[derive(Debug, Clone)]
pub struct TextLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for TextLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let rest = self.rest;
        match rest.find(['\r', '\n']) {
            Some(at) => {
                let width = if rest[at..].starts_with("\r\n") { 2 } else { 1 };
                self.rest = &rest[at + width..];
                Some(&rest[..at])
            }
            None => {
                self.rest = "";
                Some(rest)
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Requirement 1: Empty and token-free documents
    // -------------------------------------------------------------------------
    #[test]
    fn test_empty_document() {
        let scanner = EmoteScanner::new();
        let result = scanner.scan_lines(Vec::<String>::new());

        assert!(result.overlays.is_empty());
        assert_eq!(result.stats.lines_scanned, 0);
    }

    #[test]
    fn test_document_without_tokens() {
        let scanner = EmoteScanner::new();
        let result = scanner.scan_text("fn main() {\n    println!(\"<:x:1>\");\n}");

        assert!(result.overlays.is_empty());
        assert_eq!(result.stats.lines_scanned, 3);
        assert_eq!(result.stats.tokens_found, 0);
    }

    // -------------------------------------------------------------------------
    // Requirement 2: Every line is scanned, line numbers are kept
    // -------------------------------------------------------------------------
    #[test]
    fn test_tokens_across_lines() {
        let scanner = EmoteScanner::new();
        let text = "first <:a:11111111111111111>\nnothing here\n<a:b:22222222222222222> last";
        let result = scanner.scan_text(text);

        assert_eq!(result.overlays.len(), 2);
        assert_eq!(result.overlays[0].range, DisplayRange { line: 0, start: 6, end: 28 });
        assert_eq!(result.overlays[1].range, DisplayRange { line: 2, start: 0, end: 23 });
        assert!(result.overlays[1].image_url.ends_with(".gif?size=16"));
        assert_eq!(result.stats.tokens_found, 2);
        assert_eq!(result.stats.animated_found, 1);
    }

    #[test]
    fn test_crlf_lines() {
        let scanner = EmoteScanner::new();
        let result = scanner.scan_text("<:a:11111111111111111>\r\n<:b:22222222222222222>\r\n");

        assert_eq!(result.overlays.len(), 2);
        assert_eq!(result.overlays[1].range.line, 1);
    }

    #[test]
    fn test_lone_cr_breaks_lines() {
        let scanner = EmoteScanner::new();
        let result = scanner.scan_text("old mac\r  <:a:11111111111111111>\r\rend");

        assert_eq!(result.stats.lines_scanned, 4);
        assert_eq!(result.overlays.len(), 1);
        assert_eq!(result.overlays[0].range, DisplayRange { line: 1, start: 2, end: 24 });
    }

    #[test]
    fn test_text_lines_terminators() {
        fn split(text: &str) -> Vec<&str> {
            text_lines(text).collect()
        }

        assert_eq!(split(""), Vec::<&str>::new());
        assert_eq!(split("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split("a\r\n"), vec!["a"]);
        assert_eq!(split("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(split("\r\r"), vec!["", ""]);
    }

    // -------------------------------------------------------------------------
    // Requirement 3: Rescanning unchanged content is idempotent
    // -------------------------------------------------------------------------
    #[test]
    fn test_rescan_is_idempotent() {
        let scanner = EmoteScanner::new();
        let text = "hi <:wave:12345678901234567> bye\n<a:dance:76543210987654321>";

        let first = scanner.scan_text(text);
        let second = scanner.scan_text(text);

        assert_eq!(first.overlays, second.overlays);
    }

    // -------------------------------------------------------------------------
    // Requirement 4: Single-line scan
    // -------------------------------------------------------------------------
    #[test]
    fn test_scan_line_matches_document_scan() {
        let scanner = EmoteScanner::new();
        let line = "a <:x:12345678901234567> b <:y:12345678901234567>";

        let by_line = scanner.scan_line(0, line);
        let by_doc = scanner.scan_lines([line]).overlays;

        assert_eq!(by_line, by_doc);
        assert_eq!(by_line.len(), 2);
    }
}
