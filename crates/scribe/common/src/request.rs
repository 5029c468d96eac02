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

//! Analysis request envelope

use crate::issue::Issue;
use crate::offsets;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Language tag used when none is given
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// How much of the document a provider is asked to look at.
///
/// This is a hint; providers are free to analyze the whole text regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisScope {
    #[default]
    FullDocument,
    Sentence,
    Window,
}

/// Immutable description of one analysis cycle's input.
///
/// Built once per cycle and shared read-only with every provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    text: String,
    language: String,
    scope: AnalysisScope,
    caret: Option<usize>,
    enabled_categories: BTreeSet<String>,
    disabled_rule_ids: BTreeSet<String>,
    user_dictionary: BTreeSet<String>,
}

impl AnalysisRequest {
    /// Request over `text` with every other field at its default
    pub fn new(text: impl Into<String>) -> Self {
        Self::builder(text).build()
    }

    pub fn builder(text: impl Into<String>) -> AnalysisRequestBuilder {
        AnalysisRequestBuilder::new(text)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text length in characters; every reported span must end at or before it
    pub fn text_len(&self) -> usize {
        offsets::char_len(&self.text)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn scope(&self) -> AnalysisScope {
        self.scope
    }

    /// Caret position in characters, `None` when unknown
    pub fn caret(&self) -> Option<usize> {
        self.caret
    }

    pub fn enabled_categories(&self) -> &BTreeSet<String> {
        &self.enabled_categories
    }

    pub fn disabled_rule_ids(&self) -> &BTreeSet<String> {
        &self.disabled_rule_ids
    }

    pub fn user_dictionary(&self) -> &BTreeSet<String> {
        &self.user_dictionary
    }

    /// Whether `word` is listed in the user dictionary (case-insensitive)
    pub fn is_known_word(&self, word: &str) -> bool {
        self.user_dictionary.contains(&word.to_lowercase())
    }

    pub fn is_rule_disabled(&self, rule_id: &str) -> bool {
        self.disabled_rule_ids.contains(rule_id)
    }

    /// Whether issues of `category` are wanted; an empty set enables all
    pub fn is_category_enabled(&self, category: &str) -> bool {
        self.enabled_categories.is_empty() || self.enabled_categories.iter().any(|enabled| enabled.eq_ignore_ascii_case(category))
    }

    /// Whether `issue` survives this request's rule and category filters
    pub fn permits(&self, issue: &Issue) -> bool {
        !self.is_rule_disabled(issue.rule_id()) && self.is_category_enabled(issue.category().as_str())
    }
}

/// Builder for [`AnalysisRequest`]
#[derive(Debug, Clone)]
pub struct AnalysisRequestBuilder {
    text: String,
    language: Option<String>,
    scope: AnalysisScope,
    caret: Option<usize>,
    enabled_categories: BTreeSet<String>,
    disabled_rule_ids: BTreeSet<String>,
    user_dictionary: BTreeSet<String>,
}

impl AnalysisRequestBuilder {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
            scope: AnalysisScope::default(),
            caret: None,
            enabled_categories: BTreeSet::new(),
            disabled_rule_ids: BTreeSet::new(),
            user_dictionary: BTreeSet::new(),
        }
    }

    /// Locale tag; blank values fall back to [`DEFAULT_LANGUAGE`]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        self.language = if language.trim().is_empty() { None } else { Some(language) };
        self
    }

    pub fn scope(mut self, scope: AnalysisScope) -> Self {
        self.scope = scope;
        self
    }

    /// Caret position; negative values mean "unknown"
    pub fn caret(mut self, position: i64) -> Self {
        self.caret = usize::try_from(position).ok();
        self
    }

    pub fn enabled_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn disabled_rule_ids<I, S>(mut self, rule_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_rule_ids = rule_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Words to accept as spelled correctly; stored lowercased
    pub fn user_dictionary<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.user_dictionary = words.into_iter().map(|word| word.into().to_lowercase()).collect();
        self
    }

    pub fn build(self) -> AnalysisRequest {
        AnalysisRequest {
            text: self.text,
            language: self.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            scope: self.scope,
            caret: self.caret,
            enabled_categories: self.enabled_categories,
            disabled_rule_ids: self.disabled_rule_ids,
            user_dictionary: self.user_dictionary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueCategory;

    #[test]
    fn test_new_applies_defaults() {
        let request = AnalysisRequest::new("hello");
        assert_eq!(request.text(), "hello");
        assert_eq!(request.language(), "en-US");
        assert_eq!(request.scope(), AnalysisScope::FullDocument);
        assert_eq!(request.caret(), None);
        assert!(request.enabled_categories().is_empty());
        assert!(request.disabled_rule_ids().is_empty());
        assert!(request.user_dictionary().is_empty());
    }

    #[test]
    fn test_builder_normalizes_bad_inputs() {
        let request = AnalysisRequest::builder("").language("   ").caret(-42).build();
        assert_eq!(request.text(), "");
        assert_eq!(request.text_len(), 0);
        assert_eq!(request.language(), DEFAULT_LANGUAGE);
        assert_eq!(request.caret(), None);
    }

    #[test]
    fn test_builder_keeps_user_preferences() {
        let request = AnalysisRequest::builder("abc")
            .language("es-ES")
            .scope(AnalysisScope::Window)
            .caret(10)
            .enabled_categories(["grammar"])
            .disabled_rule_ids(["RULE_X"])
            .user_dictionary(["ChatGPT"])
            .build();

        assert_eq!(request.language(), "es-ES");
        assert_eq!(request.scope(), AnalysisScope::Window);
        assert_eq!(request.caret(), Some(10));
        assert!(request.enabled_categories().contains("grammar"));
        assert!(request.is_rule_disabled("RULE_X"));
        assert!(request.is_known_word("chatgpt"));
        assert!(!request.is_known_word("chat"));
    }

    #[test]
    fn test_user_dictionary_is_stored_lowercased() {
        let request = AnalysisRequest::builder("text").user_dictionary(["Déjà", "SCRIBE", "scribe"]).build();

        assert_eq!(request.user_dictionary().len(), 2);
        assert!(request.user_dictionary().contains("déjà"));
        assert!(request.is_known_word("DÉJÀ"));
        assert!(request.is_known_word("Scribe"));
        assert!(!request.is_known_word("scrib"));
    }

    #[test]
    fn test_permits_filters_rules_and_categories() {
        let request = AnalysisRequest::builder("text").enabled_categories(["Spelling"]).disabled_rule_ids(["SPELL_TEH"]).build();

        let disabled = Issue::builder(IssueCategory::Spelling, 0, 1).rule_id("SPELL_TEH").build().unwrap();
        let allowed = Issue::builder(IssueCategory::Spelling, 0, 1).rule_id("UNKNOWN_WORD").build().unwrap();
        let wrong_category = Issue::builder(IssueCategory::Style, 0, 1).rule_id("LONG_SENTENCE").build().unwrap();

        assert!(!request.permits(&disabled));
        assert!(request.permits(&allowed));
        assert!(!request.permits(&wrong_category));
        assert!(AnalysisRequest::new("text").permits(&wrong_category));
    }

    #[test]
    fn test_text_len_counts_characters() {
        assert_eq!(AnalysisRequest::new("naïve").text_len(), 5);
    }
}
