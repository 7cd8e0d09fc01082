//! Text buffer and range types
//!
//! Positions count UTF-16 code units, the unit the web editor engine uses
//! natively. A position that falls between the two halves of a surrogate
//! pair does not name a valid boundary.

use serde::{Deserialize, Serialize};

/// Half-open range `[from, to)` in UTF-16 code units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub from: usize,
    pub to: usize,
}

impl TextRange {
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// An empty range at `pos`
    pub const fn caret(pos: usize) -> Self {
        Self { from: pos, to: pos }
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }
}

/// Document text addressed in UTF-16 code units
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    len_utf16: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_string(text: String) -> Self {
        let len_utf16 = utf16_len(&text);
        Self { text, len_utf16 }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in UTF-16 code units
    pub fn len(&self) -> usize {
        self.len_utf16
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Converts a UTF-16 position to a byte offset
    ///
    /// Returns `None` past the end or inside a surrogate pair.
    pub fn byte_offset(&self, pos: usize) -> Option<usize> {
        if pos == self.len_utf16 {
            return Some(self.text.len());
        }
        let mut units = 0;
        for (byte, ch) in self.text.char_indices() {
            if units == pos {
                return Some(byte);
            }
            units += ch.len_utf16();
            if units > pos {
                return None;
            }
        }
        None
    }

    /// Checks if a range names valid boundaries inside the document
    pub fn contains_range(&self, range: TextRange) -> bool {
        range.from <= range.to
            && self.byte_offset(range.from).is_some()
            && self.byte_offset(range.to).is_some()
    }

    /// Replaces a range, returning false if the range is invalid
    pub fn replace(&mut self, range: TextRange, text: &str) -> bool {
        if range.from > range.to {
            return false;
        }
        let (Some(start), Some(end)) = (self.byte_offset(range.from), self.byte_offset(range.to))
        else {
            return false;
        };
        self.text.replace_range(start..end, text);
        self.len_utf16 = self.len_utf16 - range.len() + utf16_len(text);
        true
    }

    /// Range of the full lines touched by `range`, without the trailing newline
    pub fn line_range(&self, range: TextRange) -> Option<TextRange> {
        let start = self.byte_offset(range.from)?;
        let end = self.byte_offset(range.to)?;
        let line_start = self.text[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = self.text[end..]
            .find('\n')
            .map_or(self.text.len(), |i| end + i);
        Some(TextRange::new(
            utf16_len(&self.text[..line_start]),
            utf16_len(&self.text[..line_end]),
        ))
    }

    /// Number of lines; an empty document has one
    pub fn line_count(&self) -> usize {
        self.text.matches('\n').count() + 1
    }
}

/// Length of `text` in UTF-16 code units
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}
