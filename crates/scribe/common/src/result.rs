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

//! Analysis result envelope

use crate::issue::Issue;
use crate::offsets;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;

/// Normalized wrapper around one provider's (or the composite's) findings.
///
/// Issues keep the order in which they were produced; nothing here sorts them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnalysisResult {
    issues: Vec<Issue>,
    elapsed_millis: u64,
    provider_version: String,
}

impl AnalysisResult {
    pub fn new(issues: Vec<Issue>, elapsed: Duration, provider_version: impl Into<String>) -> Self {
        Self {
            issues,
            elapsed_millis: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            provider_version: provider_version.into(),
        }
    }

    /// No issues, no elapsed time, no version tag
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed_millis
    }

    pub fn provider_version(&self) -> &str {
        &self.provider_version
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Copy of this result keeping only the first issue for each
    /// [`Issue::dedup_key`], in original order
    pub fn deduplicated(&self) -> AnalysisResult {
        let mut seen = HashSet::new();
        let issues = self.issues.iter().filter(|issue| seen.insert(issue.dedup_key())).cloned().collect();
        AnalysisResult {
            issues,
            elapsed_millis: self.elapsed_millis,
            provider_version: self.provider_version.clone(),
        }
    }

    /// Apply the first replacement of the first issue to `original`.
    ///
    /// Returns `original` unchanged when there is nothing applicable.
    pub fn apply_first(&self, original: &str) -> String {
        self.issues
            .first()
            .and_then(|issue| {
                let replacement = issue.replacements().first()?;
                offsets::splice(original, issue.start(), issue.end(), replacement)
            })
            .unwrap_or_else(|| original.to_string())
    }

    /// Apply the first replacement of every issue to `original`.
    ///
    /// Edits are applied right to left so earlier offsets stay valid. Issues
    /// without replacements, with spans outside the text, or overlapping a span
    /// that was already rewritten are skipped.
    pub fn apply_all(&self, original: &str) -> String {
        let mut fixable: Vec<&Issue> = self.issues.iter().filter(|issue| !issue.replacements().is_empty()).collect();
        fixable.sort_by_key(|issue| (issue.start(), issue.end()));

        let mut out = original.to_string();
        let mut limit = offsets::char_len(original);
        for issue in fixable.into_iter().rev() {
            if issue.end() > limit {
                continue;
            }
            if let Some(patched) = offsets::splice(&out, issue.start(), issue.end(), &issue.replacements()[0]) {
                out = patched;
                limit = issue.start();
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueCategory;

    fn fix(rule: &str, start: usize, end: usize, replacement: &str) -> Issue {
        Issue::builder(IssueCategory::Spelling, start, end).rule_id(rule).replacement(replacement).build().unwrap()
    }

    #[test]
    fn test_empty() {
        let empty = AnalysisResult::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.elapsed_millis(), 0);
        assert_eq!(empty.provider_version(), "");
    }

    #[test]
    fn test_elapsed_is_reported_in_millis() {
        let result = AnalysisResult::new(Vec::new(), Duration::from_micros(2_500), "fake/1");
        assert_eq!(result.elapsed_millis(), 2);
        assert_eq!(result.provider_version(), "fake/1");
    }

    #[test]
    fn test_apply_first() {
        let result = AnalysisResult::new(vec![fix("SPELL_TEH", 4, 7, "the")], Duration::ZERO, "");
        assert_eq!(result.apply_first("Fix teh quick test."), "Fix the quick test.");
        assert_eq!(AnalysisResult::empty().apply_first("unchanged"), "unchanged");
    }

    #[test]
    fn test_apply_all_right_to_left() {
        let text = "Fix teh quick brun fox.";
        let result = AnalysisResult::new(vec![fix("SPELL_BRUN", 14, 18, "brown"), fix("SPELL_TEH", 4, 7, "the")], Duration::ZERO, "");
        assert_eq!(result.apply_all(text), "Fix the quick brown fox.");
    }

    #[test]
    fn test_apply_all_skips_overlaps_and_out_of_range() {
        let text = "abcdef";
        let no_fix = Issue::builder(IssueCategory::Style, 0, 1).build().unwrap();
        let result = AnalysisResult::new(
            vec![fix("A", 1, 4, "X"), fix("B", 3, 5, "Y"), fix("C", 4, 40, "Z"), no_fix],
            Duration::ZERO,
            "",
        );
        // "C" is out of range, "B" wins at 3..5, "A" overlaps it
        assert_eq!(result.apply_all(text), "abcYf");
    }

    #[test]
    fn test_deduplicated_keeps_first_per_key() {
        let a = fix("R", 1, 2, "x");
        let b = fix("R", 1, 2, "y");
        let c = fix("R", 2, 3, "z");
        let result = AnalysisResult::new(vec![a.clone(), b, c.clone()], Duration::from_millis(3), "composite");

        let deduped = result.deduplicated();
        assert_eq!(deduped.issues(), [a, c]);
        assert_eq!(deduped.elapsed_millis(), 3);
        assert_eq!(deduped.provider_version(), "composite");
    }
}
