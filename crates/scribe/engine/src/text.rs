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

//! Text scanning helpers shared by the built-in providers.
//!
//! All returned spans are character offsets.

use regex::Regex;
use scribe_common::offsets::OffsetMap;
use std::ops::Range;

const WORD_PATTERN: &str = r"\b[\p{L}\p{M}’']+\b";
const SENTENCE_END_PATTERN: &str = r"[.!?]+(?:\s|$)";

/// A word-like token and its character span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub span: Range<usize>,
}

/// Compiled tokenizer for words and sentences
#[derive(Debug, Clone)]
pub struct TextScanner {
    word: Regex,
    sentence_end: Regex,
}

impl TextScanner {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            word: Regex::new(WORD_PATTERN)?,
            sentence_end: Regex::new(SENTENCE_END_PATTERN)?,
        })
    }

    /// Word tokens (letters, combining marks, apostrophes) in text order
    pub fn tokens<'a>(&self, text: &'a str, offsets: &OffsetMap) -> Vec<Token<'a>> {
        self.word
            .find_iter(text)
            .map(|m| Token {
                text: m.as_str(),
                span: offsets.to_char_range(m.range()),
            })
            .collect()
    }

    /// Number of word tokens in `text`
    pub fn word_count(&self, text: &str) -> usize {
        self.word.find_iter(text).count()
    }

    /// Sentence spans: each runs up to and including its terminating
    /// punctuation and whitespace; trailing text without terminal punctuation
    /// forms a final sentence.
    pub fn sentences<'a>(&self, text: &'a str, offsets: &OffsetMap) -> Vec<Token<'a>> {
        let mut sentences = Vec::new();
        let mut last = 0;
        for m in self.sentence_end.find_iter(text) {
            sentences.push(Token {
                text: &text[last..m.end()],
                span: offsets.to_char_range(last..m.end()),
            });
            last = m.end();
        }
        if last < text.len() {
            sentences.push(Token {
                text: &text[last..],
                span: offsets.to_char_range(last..text.len()),
            });
        }
        sentences
    }
}

/// Finds whole-word occurrences of `needle` in `text` (case-sensitive),
/// returning byte ranges.
pub fn whole_word_matches(text: &str, needle: &str) -> Vec<Range<usize>> {
    if needle.is_empty() {
        return Vec::new();
    }

    let is_word_char = |c: char| c.is_alphanumeric() || c == '\'' || c == '’';
    text.match_indices(needle)
        .filter(|(start, _)| {
            let end = start + needle.len();
            let before = text[..*start].chars().next_back();
            let after = text[end..].chars().next();
            !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
        })
        .map(|(start, _)| start..start + needle.len())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_use_char_offsets() {
        let scanner = TextScanner::new().unwrap();
        let text = "Déjà vu isn’t rare";
        let offsets = OffsetMap::new(text);
        let tokens = scanner.tokens(text, &offsets);

        let words: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(words, vec!["Déjà", "vu", "isn’t", "rare"]);
        assert_eq!(tokens[1].span, 5..7);
        assert_eq!(tokens[3].span, 14..18);
    }

    #[test]
    fn test_sentences_include_trailing_fragment() {
        let scanner = TextScanner::new().unwrap();
        let text = "One. Two words! And a tail";
        let offsets = OffsetMap::new(text);
        let sentences: Vec<&str> = scanner.sentences(text, &offsets).iter().map(|s| s.text).collect();
        assert_eq!(sentences, vec!["One. ", "Two words! ", "And a tail"]);
        assert_eq!(scanner.word_count("Two words! "), 2);
    }

    #[test]
    fn test_whole_word_matches() {
        assert_eq!(whole_word_matches("teh tehran teh.", "teh"), vec![0..3, 11..14]);
        assert!(whole_word_matches("anything", "").is_empty());
        assert!(whole_word_matches("steh", "teh").is_empty());
    }
}
