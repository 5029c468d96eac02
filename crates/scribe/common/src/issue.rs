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

//! Issue model
//!
//! An [`Issue`] describes one problem found in a text: where it is, how bad it
//! is, which rule found it and how it could be fixed. Issues are immutable
//! once built and are only created through [`IssueBuilder`], which rejects
//! inverted spans.

use crate::error::IssueError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Rule id used when a provider does not name the rule
pub const UNKNOWN_RULE: &str = "UNKNOWN_RULE";

/// Provider label used when a provider does not name itself
pub const UNKNOWN_PROVIDER: &str = "unknown";

/// Kind of problem an issue reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Spelling,
    Grammar,
    Style,
    Punctuation,
}

impl IssueCategory {
    pub const ALL: [IssueCategory; 4] = [IssueCategory::Spelling, IssueCategory::Grammar, IssueCategory::Style, IssueCategory::Punctuation];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Spelling => "spelling",
            IssueCategory::Grammar => "grammar",
            IssueCategory::Style => "style",
            IssueCategory::Punctuation => "punctuation",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown issue category: {}", s))
    }
}

/// How strongly an issue should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    #[default]
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => f.write_str("info"),
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// One detected problem in an analyzed text.
///
/// `start` and `end` are character offsets forming the half-open span
/// `[start, end)`. A zero-length span marks a position (e.g. a missing comma).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    id: String,
    rule_id: String,
    provider: String,
    category: IssueCategory,
    severity: Severity,
    start: usize,
    end: usize,
    message: String,
    replacements: Vec<String>,
    metadata: BTreeMap<String, Value>,
}

impl Issue {
    /// Start building an issue for the span `[start, end)`
    pub fn builder(category: IssueCategory, start: usize, end: usize) -> IssueBuilder {
        IssueBuilder::new(category, start, end)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn category(&self) -> IssueCategory {
        self.category
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Candidate fixes, best first
    pub fn replacements(&self) -> &[String] {
        &self.replacements
    }

    /// Provider-specific extras
    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    /// Span length in characters
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the span fits inside a text of `text_len` characters
    pub fn is_within(&self, text_len: usize) -> bool {
        self.end <= text_len
    }

    /// Provider-independent key collapsing identical findings: `rule@start:end`
    pub fn dedup_key(&self) -> String {
        format!("{}@{}:{}", self.rule_id, self.start, self.end)
    }
}

/// Builder for [`Issue`]; unset fields take the documented defaults.
#[derive(Debug, Clone)]
pub struct IssueBuilder {
    id: Option<String>,
    rule_id: Option<String>,
    provider: Option<String>,
    category: IssueCategory,
    severity: Severity,
    start: usize,
    end: usize,
    message: Option<String>,
    replacements: Vec<String>,
    metadata: BTreeMap<String, Value>,
}

impl IssueBuilder {
    pub fn new(category: IssueCategory, start: usize, end: usize) -> Self {
        Self {
            id: None,
            rule_id: None,
            provider: None,
            category,
            severity: Severity::default(),
            start,
            end,
            message: None,
            replacements: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Use a caller-supplied identifier instead of a generated UUID
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Append one candidate fix
    pub fn replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacements.push(replacement.into());
        self
    }

    /// Replace the candidate fixes with `replacements`, keeping their order
    pub fn replacements<I, S>(mut self, replacements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replacements = replacements.into_iter().map(Into::into).collect();
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Finish the issue, rejecting `end < start`
    pub fn build(self) -> Result<Issue, IssueError> {
        if self.end < self.start {
            return Err(IssueError::InvalidSpan { start: self.start, end: self.end });
        }

        Ok(Issue {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            rule_id: self.rule_id.unwrap_or_else(|| UNKNOWN_RULE.to_string()),
            provider: self.provider.unwrap_or_else(|| UNKNOWN_PROVIDER.to_string()),
            category: self.category,
            severity: self.severity,
            start: self.start,
            end: self.end,
            message: self.message.unwrap_or_default(),
            replacements: self.replacements,
            metadata: self.metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_span_and_fields() {
        let issue = Issue::builder(IssueCategory::Spelling, 2, 5)
            .rule_id("SPELL_RULE")
            .provider("Fake")
            .message("Spelling issue")
            .replacement("cat")
            .metadata("category", "spelling")
            .build()
            .unwrap();

        assert_eq!(issue.rule_id(), "SPELL_RULE");
        assert_eq!(issue.provider(), "Fake");
        assert_eq!(issue.category(), IssueCategory::Spelling);
        assert_eq!(issue.severity(), Severity::Warning);
        assert_eq!((issue.start(), issue.end()), (2, 5));
        assert_eq!(issue.replacements(), ["cat".to_string()]);
        assert_eq!(issue.metadata().get("category"), Some(&Value::from("spelling")));
        assert!(!issue.id().is_empty());
        assert_eq!(issue.dedup_key(), "SPELL_RULE@2:5");
    }

    #[test]
    fn test_inverted_span_is_rejected() {
        let err = Issue::builder(IssueCategory::Grammar, 5, 2).rule_id("R").build().unwrap_err();
        assert_eq!(err, IssueError::InvalidSpan { start: 5, end: 2 });
        assert_eq!(err.to_string(), "invalid span: 5..2");
    }

    #[test]
    fn test_empty_span_is_allowed() {
        let issue = Issue::builder(IssueCategory::Punctuation, 5, 5).rule_id("R").build().unwrap();
        assert!(issue.is_empty());
        assert_eq!(issue.len(), 0);
        assert_eq!(issue.dedup_key(), "R@5:5");
    }

    #[test]
    fn test_defaults() {
        let issue = Issue::builder(IssueCategory::Style, 0, 1).build().unwrap();
        assert_eq!(issue.rule_id(), UNKNOWN_RULE);
        assert_eq!(issue.provider(), UNKNOWN_PROVIDER);
        assert_eq!(issue.message(), "");
        assert!(issue.replacements().is_empty());
        assert!(issue.metadata().is_empty());
    }

    #[test]
    fn test_generated_ids_are_unique_and_explicit_ids_kept() {
        let a = Issue::builder(IssueCategory::Style, 0, 1).build().unwrap();
        let b = Issue::builder(IssueCategory::Style, 0, 1).build().unwrap();
        assert_ne!(a.id(), b.id());

        let fixed = Issue::builder(IssueCategory::Style, 0, 1).id("issue-1").build().unwrap();
        assert_eq!(fixed.id(), "issue-1");
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Grammar".parse::<IssueCategory>(), Ok(IssueCategory::Grammar));
        assert_eq!(" spelling ".parse::<IssueCategory>(), Ok(IssueCategory::Spelling));
        assert!("tone".parse::<IssueCategory>().is_err());
    }

    #[test]
    fn test_severity_parsing() {
        assert_eq!("ERROR".parse::<Severity>(), Ok(Severity::Error));
        assert_eq!(" info".parse::<Severity>(), Ok(Severity::Info));
        assert_eq!(Severity::Warning.to_string().parse::<Severity>(), Ok(Severity::Warning));
        assert!("fatal".parse::<Severity>().is_err());
    }

    proptest! {
        #[test]
        fn prop_build_accepts_exactly_ordered_spans(start in 0usize..1000, end in 0usize..1000) {
            let built = Issue::builder(IssueCategory::Grammar, start, end).rule_id("R").build();
            prop_assert_eq!(built.is_ok(), end >= start);
            if let Ok(issue) = built {
                prop_assert_eq!(issue.dedup_key(), format!("R@{}:{}", start, end));
            }
        }
    }
}
