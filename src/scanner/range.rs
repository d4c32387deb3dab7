//! Range mapping from token byte spans to editor columns.
//!
//! Editor hosts address columns in UTF-16 code units, while the cortex reports
//! byte offsets into a `&str`. `Utf16Columns` converts between the two with a
//! forward-only cursor so that a line with many tokens is walked once.

use serde::{Deserialize, Serialize};

use crate::scanner::EmoteToken;

/// Line/column span of a token, columns in UTF-16 code units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayRange {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

/// Byte offset → UTF-16 column cursor over one line
pub struct Utf16Columns<'a> {
    line: &'a str,
    byte: usize,
    column: usize,
}

impl<'a> Utf16Columns<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            line,
            byte: 0,
            column: 0,
        }
    }

    /// UTF-16 column of a byte offset. `byte` must lie on a char boundary.
    pub fn column(&mut self, byte: usize) -> usize {
        if byte < self.byte {
            self.byte = 0;
            self.column = 0;
        }
        self.column += self.line[self.byte..byte].encode_utf16().count();
        self.byte = byte;
        self.column
    }
}

/// Map a token on `line_index` to its display range
pub fn map_range(line_index: usize, columns: &mut Utf16Columns<'_>, token: &EmoteToken) -> DisplayRange {
    let start = columns.column(token.start);
    let end = columns.column(token.end());
    DisplayRange {
        line: line_index,
        start,
        end,
    }
}
