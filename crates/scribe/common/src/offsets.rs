// Scribe
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Character-offset helpers.
//!
//! Issue spans count Unicode scalar values, not bytes. These helpers convert
//! between the two so that splicing never lands inside a multi-byte character.

use std::ops::Range;

/// Length of `text` in characters
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte range covering the characters `[start, end)` of `text`, or `None` when
/// the span is inverted or runs past the end of the text.
pub fn byte_range(text: &str, start: usize, end: usize) -> Option<Range<usize>> {
    if end < start {
        return None;
    }

    let mut byte_start = None;
    let mut byte_end = None;
    for (position, (byte, _)) in text.char_indices().enumerate() {
        if position == start {
            byte_start = Some(byte);
        }
        if position == end {
            byte_end = Some(byte);
            break;
        }
    }

    let total = char_len(text);
    if start == total {
        byte_start = Some(text.len());
    }
    if end == total {
        byte_end = Some(text.len());
    }

    Some(byte_start?..byte_end?)
}

/// Returns `text` with the characters `[start, end)` replaced by `replacement`
pub fn splice(text: &str, start: usize, end: usize, replacement: &str) -> Option<String> {
    let range = byte_range(text, start, end)?;
    let mut out = String::with_capacity(text.len() - range.len() + replacement.len());
    out.push_str(&text[..range.start]);
    out.push_str(replacement);
    out.push_str(&text[range.end..]);
    Some(out)
}

/// Maps byte offsets (as produced by `str::find` or regex matches) to
/// character offsets for a fixed text.
#[derive(Debug, Clone)]
pub struct OffsetMap {
    /// Byte position of every character, plus the text length as a sentinel
    starts: Vec<usize>,
}

impl OffsetMap {
    pub fn new(text: &str) -> Self {
        let mut starts: Vec<usize> = text.char_indices().map(|(byte, _)| byte).collect();
        starts.push(text.len());
        Self { starts }
    }

    /// Character offset of the character beginning at `byte`.
    ///
    /// Byte positions inside a character resolve to that character.
    pub fn to_char(&self, byte: usize) -> usize {
        match self.starts.binary_search(&byte) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        }
    }

    /// Character range for a byte range
    pub fn to_char_range(&self, bytes: Range<usize>) -> Range<usize> {
        self.to_char(bytes.start)..self.to_char(bytes.end)
    }

    /// Number of characters in the mapped text
    pub fn char_len(&self) -> usize {
        self.starts.len() - 1
    }
}
