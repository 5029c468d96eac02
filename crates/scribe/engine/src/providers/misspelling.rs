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

//! Misspelling table provider
//!
//! Flags whole-word occurrences of well-known typos and offers the correct
//! spelling as the single replacement.

use crate::provider::Provider;
use crate::text::whole_word_matches;
use scribe_common::offsets::OffsetMap;
use scribe_common::{AnalysisRequest, AnalysisResult, Issue, IssueCategory, ProviderError, ProviderResult, Severity};
use std::time::Instant;
use tracing::debug;

const PROVIDER_NAME: &str = "misspelling";

/// Typos recognized by [`MisspellingProvider::new`]
pub const DEFAULT_MISSPELLINGS: &[(&str, &str)] = &[
    ("teh", "the"),
    ("maities", "mates"),
    ("recieve", "receive"),
    ("seperate", "separate"),
    ("definately", "definitely"),
];

/// Table-driven spelling provider
#[derive(Debug, Clone)]
pub struct MisspellingProvider {
    table: Vec<(String, String)>,
    version: String,
}

impl MisspellingProvider {
    /// Provider using [`DEFAULT_MISSPELLINGS`]
    pub fn new() -> Self {
        Self::with_table(DEFAULT_MISSPELLINGS.iter().map(|(typo, fix)| (*typo, *fix)))
    }

    /// Provider using a custom `(typo, fix)` table; order decides issue order
    pub fn with_table<I, S, T>(table: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            table: table.into_iter().map(|(typo, fix)| (typo.into(), fix.into())).filter(|(typo, _)| !typo.is_empty()).collect(),
            version: format!("{}/{}", PROVIDER_NAME, env!("CARGO_PKG_VERSION")),
        }
    }

    /// Rule id reported for `typo`
    pub fn rule_id(typo: &str) -> String {
        format!("SPELL_{}", typo.to_uppercase())
    }
}

impl Default for MisspellingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for MisspellingProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn analyze(&self, request: &AnalysisRequest) -> ProviderResult<AnalysisResult> {
        let started = Instant::now();
        let text = request.text();
        let offsets = OffsetMap::new(text);

        let mut issues = Vec::new();
        for (typo, fix) in &self.table {
            if request.is_known_word(typo) {
                continue;
            }
            for bytes in whole_word_matches(text, typo) {
                let span = offsets.to_char_range(bytes);
                let issue = Issue::builder(IssueCategory::Spelling, span.start, span.end)
                    .rule_id(Self::rule_id(typo))
                    .provider(PROVIDER_NAME)
                    .severity(Severity::Warning)
                    .message(format!("Did you mean \"{}\"?", fix))
                    .replacement(fix.as_str())
                    .build()
                    .map_err(|e| ProviderError::with_source(format!("invalid span for '{}'", typo), e))?;
                if request.permits(&issue) {
                    issues.push(issue);
                }
            }
        }

        debug!(provider = PROVIDER_NAME, issues = issues.len(), "misspelling scan complete");
        Ok(AnalysisResult::new(self.normalize(issues), started.elapsed(), self.version.as_str()))
    }
}
