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

//! # Rule-based prose linter
//!
//! Deterministic checks that need no external service:
//!
//! - unknown words (dictionary lookup, opt-in)
//! - repeated adjacent words ("the the")
//! - runs of multiple spaces
//! - sentences longer than a word limit
//! - a passive voice heuristic (`was|were|is|are|been|be|being` + `-ed` word)
//!
//! Issues are emitted check by check, each in text order, so identical input
//! always yields an identical list.

use crate::provider::Provider;
use crate::text::TextScanner;
use regex::Regex;
use scribe_common::offsets::OffsetMap;
use scribe_common::{AnalysisRequest, AnalysisResult, Issue, IssueCategory, ProviderError, ProviderResult, Severity};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

const PROVIDER_NAME: &str = "prose-rules";

pub const UNKNOWN_WORD: &str = "UNKNOWN_WORD";
pub const REPEATED_WORD: &str = "REPEATED_WORD";
pub const MULTIPLE_SPACES: &str = "MULTIPLE_SPACES";
pub const LONG_SENTENCE: &str = "LONG_SENTENCE";
pub const PASSIVE_VOICE: &str = "PASSIVE_VOICE";

/// Words accepted when no word list is loaded, so that short texts are not
/// flagged wholesale.
const FALLBACK_WORDS: &str = "a an the i you he she it we they this that is are was were be been being \
    and or but if then else for while of in on to from with without by as at not do did \
    have has had can could may might will would shall should must hello world test \
    example simple text writing assistant professional creative academic code document \
    language english spanish tone style summarize expand same formal informal neutral \
    model open ai prompt output input";

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("invalid rule pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to read word list {path}: {source}")]
    WordList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which checks run and how they are tuned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    /// Unknown-word check; off unless enabled, since it needs a real word list
    pub check_spelling: bool,
    pub check_repeated_words: bool,
    pub check_spacing: bool,
    pub check_long_sentences: bool,
    pub check_passive_voice: bool,
    /// Sentences with more words than this are flagged
    pub long_sentence_words: usize,
    /// One word per line; merged with the built-in fallback words
    pub word_list: Option<PathBuf>,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            check_spelling: false,
            check_repeated_words: true,
            check_spacing: true,
            check_long_sentences: true,
            check_passive_voice: true,
            long_sentence_words: 35,
            word_list: None,
        }
    }
}

/// Provider running the built-in prose rules
#[derive(Debug, Clone)]
pub struct ProseLinter {
    settings: RuleSettings,
    dictionary: HashSet<String>,
    scanner: TextScanner,
    multiple_spaces: Regex,
    passive: Regex,
    version: String,
}

impl ProseLinter {
    pub fn new(settings: RuleSettings) -> Result<Self, RuleError> {
        let mut dictionary: HashSet<String> = FALLBACK_WORDS.split_whitespace().map(str::to_string).collect();
        if let Some(path) = &settings.word_list {
            let loaded = load_word_list(path)?;
            info!(path = %path.display(), words = loaded.len(), "loaded word list");
            dictionary.extend(loaded);
        }

        Ok(Self {
            dictionary,
            scanner: TextScanner::new()?,
            multiple_spaces: Regex::new(r" {2,}")?,
            passive: Regex::new(r"(?i)\b(?:was|were|is|are|been|be|being)\s+\p{L}+ed\b")?,
            version: format!("{}/{}", PROVIDER_NAME, env!("CARGO_PKG_VERSION")),
            settings,
        })
    }

    pub fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    fn is_known(&self, word: &str, request: &AnalysisRequest) -> bool {
        let lower = word.to_lowercase();
        self.dictionary.contains(&lower) || request.user_dictionary().contains(&lower)
    }

    fn issue(&self, rule_id: &str, category: IssueCategory, severity: Severity, start: usize, end: usize, message: String) -> scribe_common::IssueBuilder {
        Issue::builder(category, start, end).rule_id(rule_id).provider(PROVIDER_NAME).severity(severity).message(message)
    }

    fn check_unknown_words(&self, text: &str, offsets: &OffsetMap, request: &AnalysisRequest, out: &mut Vec<Issue>) -> ProviderResult<()> {
        for token in self.scanner.tokens(text, offsets) {
            if token.text.chars().count() == 1 || self.is_known(token.text, request) {
                continue;
            }
            let issue = self
                .issue(UNKNOWN_WORD, IssueCategory::Spelling, Severity::Error, token.span.start, token.span.end, format!("Unknown word: {}", token.text))
                .build()
                .map_err(span_error)?;
            out.push(issue);
        }
        Ok(())
    }

    fn check_repeated_words(&self, text: &str, offsets: &OffsetMap, out: &mut Vec<Issue>) -> ProviderResult<()> {
        let tokens = self.scanner.tokens(text, offsets);
        for pair in tokens.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);
            if previous.text.to_lowercase() != current.text.to_lowercase() {
                continue;
            }
            let issue = self
                .issue(
                    REPEATED_WORD,
                    IssueCategory::Grammar,
                    Severity::Warning,
                    previous.span.start,
                    current.span.end,
                    format!("Repeated word: \"{}\"", current.text),
                )
                .replacement(previous.text)
                .build()
                .map_err(span_error)?;
            out.push(issue);
        }
        Ok(())
    }

    fn check_spacing(&self, text: &str, offsets: &OffsetMap, out: &mut Vec<Issue>) -> ProviderResult<()> {
        for m in self.multiple_spaces.find_iter(text) {
            let span = offsets.to_char_range(m.range());
            let issue = self
                .issue(MULTIPLE_SPACES, IssueCategory::Punctuation, Severity::Warning, span.start, span.end, "Multiple spaces".to_string())
                .replacement(" ")
                .build()
                .map_err(span_error)?;
            out.push(issue);
        }
        Ok(())
    }

    fn check_long_sentences(&self, text: &str, offsets: &OffsetMap, out: &mut Vec<Issue>) -> ProviderResult<()> {
        for sentence in self.scanner.sentences(text, offsets) {
            let words = self.scanner.word_count(sentence.text);
            if words <= self.settings.long_sentence_words {
                continue;
            }
            let issue = self
                .issue(
                    LONG_SENTENCE,
                    IssueCategory::Style,
                    Severity::Warning,
                    sentence.span.start,
                    sentence.span.end,
                    format!("Long sentence ({} words)", words),
                )
                .metadata("words", words as u64)
                .build()
                .map_err(span_error)?;
            out.push(issue);
        }
        Ok(())
    }

    fn check_passive_voice(&self, text: &str, offsets: &OffsetMap, out: &mut Vec<Issue>) -> ProviderResult<()> {
        for m in self.passive.find_iter(text) {
            let span = offsets.to_char_range(m.range());
            let issue = self
                .issue(PASSIVE_VOICE, IssueCategory::Style, Severity::Info, span.start, span.end, "Possible passive voice".to_string())
                .build()
                .map_err(span_error)?;
            out.push(issue);
        }
        Ok(())
    }
}

impl Provider for ProseLinter {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn analyze(&self, request: &AnalysisRequest) -> ProviderResult<AnalysisResult> {
        let started = Instant::now();
        let text = request.text();
        if text.trim().is_empty() {
            return Ok(AnalysisResult::new(Vec::new(), started.elapsed(), self.version.as_str()));
        }

        let offsets = OffsetMap::new(text);
        let mut issues = Vec::new();
        if self.settings.check_spelling {
            self.check_unknown_words(text, &offsets, request, &mut issues)?;
        }
        if self.settings.check_repeated_words {
            self.check_repeated_words(text, &offsets, &mut issues)?;
        }
        if self.settings.check_spacing {
            self.check_spacing(text, &offsets, &mut issues)?;
        }
        if self.settings.check_long_sentences {
            self.check_long_sentences(text, &offsets, &mut issues)?;
        }
        if self.settings.check_passive_voice {
            self.check_passive_voice(text, &offsets, &mut issues)?;
        }
        issues.retain(|issue| request.permits(issue));

        debug!(provider = PROVIDER_NAME, issues = issues.len(), "prose rules complete");
        Ok(AnalysisResult::new(self.normalize(issues), started.elapsed(), self.version.as_str()))
    }
}

fn span_error(error: scribe_common::IssueError) -> ProviderError {
    ProviderError::with_source("rule produced an invalid span", error)
}

/// Reads a word list: one word per line, lowercased, letters only
fn load_word_list(path: &Path) -> Result<Vec<String>, RuleError> {
    let content = std::fs::read_to_string(path).map_err(|source| RuleError::WordList { path: path.to_path_buf(), source })?;
    Ok(content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|word| !word.is_empty() && word.chars().all(char::is_alphabetic))
        .collect())
}
