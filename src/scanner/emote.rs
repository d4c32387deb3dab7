//! EmoteCortex: Emote Token Extraction
//!
//! Extracts `<:name:id>` and `<a:name:id>` emote references from a line of text.
//! The id must be a run of at least 17 ASCII digits. Longer runs are accepted
//! as-is; the cortex validates shape, not that the id exists.

use regex::Regex;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// =============================================================================
// Types
// =============================================================================

/// Minimum number of digits in an emote id.
pub const MIN_ID_DIGITS: usize = 17;

/// An emote reference found in a line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmoteToken {
    /// Full matched text, brackets included
    pub raw_text: String,
    /// Digit run between the last `:` and `>`
    pub id: String,
    /// Token started with `<a`
    pub animated: bool,
    /// Byte offset of `<` within the line
    pub start: usize,
    /// Byte length of the matched text
    pub len: usize,
}

impl EmoteToken {
    /// Byte offset just past `>`
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

// =============================================================================
// EmoteCortex
// =============================================================================

/// Emote token extractor
#[wasm_bindgen]
pub struct EmoteCortex {
    emote_regex: Regex,
}

impl Default for EmoteCortex {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl EmoteCortex {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        // Pattern: `<`, optional `a`, `:`, lazy name, `:`, 17+ digits, `>`
        // The name class stops at line terminators, not just `\n`.
        // Digits are spelled out since `\d` is Unicode-aware here.
        let emote_regex = Regex::new(
            r"<a?:[^\r\n\x{2028}\x{2029}]+?:([0-9]{17,})>"
        ).expect("Emote regex should compile");

        Self { emote_regex }
    }

    /// Extract and return as JsValue for WASM
    #[wasm_bindgen(js_name = extract)]
    pub fn js_extract(&self, line: &str) -> JsValue {
        let tokens = self.extract(line);
        serde_wasm_bindgen::to_value(&tokens).unwrap_or(JsValue::NULL)
    }

    /// Check whether a line contains at least one emote
    #[wasm_bindgen(js_name = isMatch)]
    pub fn is_match(&self, line: &str) -> bool {
        self.emote_regex.is_match(line)
    }
}

impl EmoteCortex {
    /// Extract all emote tokens from a line, left to right
    pub fn extract(&self, line: &str) -> Vec<EmoteToken> {
        self.emote_regex
            .captures_iter(line)
            .filter_map(|cap| {
                let full_match = cap.get(0)?;
                let id = cap.get(1)?.as_str();
                let raw_text = full_match.as_str();

                Some(EmoteToken {
                    raw_text: raw_text.to_string(),
                    id: id.to_string(),
                    animated: raw_text.starts_with("<a"),
                    start: full_match.start(),
                    len: full_match.len(),
                })
            })
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
