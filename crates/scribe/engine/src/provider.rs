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

//! Provider contract
//!
//! Every analysis backend implements [`Provider`]. The synchronous
//! [`Provider::analyze`] may fail with a [`ProviderError`]; the derived
//! [`Provider::analyze_async`] never fails and degrades to an empty result.

use async_trait::async_trait;
use scribe_common::{AnalysisRequest, AnalysisResult, Issue, ProviderResult, offsets};
use std::sync::Arc;
use tracing::warn;

/// A text-analysis strategy (spelling, grammar, style, ...).
///
/// Implementations must be safe to call concurrently: the same instance may
/// serve several analysis cycles at once.
#[async_trait]
pub trait Provider: Send + Sync + 'static {
    /// Label used in logs and as the default issue provider
    fn name(&self) -> &str;

    /// Analyze `request.text()` and report issues.
    ///
    /// Spans must lie within `request.text_len()`. Return an empty result when
    /// nothing is found; reserve errors for I/O, timeouts and malformed input.
    fn analyze(&self, request: &AnalysisRequest) -> ProviderResult<AnalysisResult>;

    /// Non-blocking variant of [`analyze`](Provider::analyze).
    ///
    /// Runs `analyze` on the blocking pool and resolves to
    /// [`AnalysisResult::empty`] if it fails or panics.
    async fn analyze_async(self: Arc<Self>, request: Arc<AnalysisRequest>) -> AnalysisResult {
        let provider = Arc::clone(&self);
        match tokio::task::spawn_blocking(move || provider.analyze(&request)).await {
            Ok(Ok(result)) => result,
            Ok(Err(error)) => {
                warn!(provider = self.name(), kind = error.kind(), "analysis failed: {}", error);
                AnalysisResult::empty()
            }
            Err(join_error) => {
                warn!(provider = self.name(), "analysis task did not complete: {}", join_error);
                AnalysisResult::empty()
            }
        }
    }

    /// Post-process this provider's own issues before they are returned
    fn normalize(&self, issues: Vec<Issue>) -> Vec<Issue> {
        issues
    }

    /// `text` with `issue.replacements()[index]` spliced over the issue span,
    /// or `text` unchanged if the index or span does not fit
    fn apply_replacement(&self, text: &str, issue: &Issue, index: usize) -> String {
        issue
            .replacements()
            .get(index)
            .and_then(|replacement| offsets::splice(text, issue.start(), issue.end(), replacement))
            .unwrap_or_else(|| text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_common::{IssueCategory, ProviderError};
    use std::time::Duration;

    struct FlagTeh;

    impl Provider for FlagTeh {
        fn name(&self) -> &str {
            "flag-teh"
        }

        fn analyze(&self, request: &AnalysisRequest) -> ProviderResult<AnalysisResult> {
            let Some(start) = request.text().find("teh") else {
                return Ok(AnalysisResult::empty());
            };
            let issue = Issue::builder(IssueCategory::Spelling, start, start + 3)
                .rule_id("SPELL_TEH")
                .provider(self.name())
                .replacement("the")
                .build()
                .map_err(|e| ProviderError::with_source("bad span", e))?;
            Ok(AnalysisResult::new(vec![issue], Duration::from_millis(1), "fake/1"))
        }
    }

    struct AlwaysFails;

    impl Provider for AlwaysFails {
        fn name(&self) -> &str {
            "always-fails"
        }

        fn analyze(&self, _request: &AnalysisRequest) -> ProviderResult<AnalysisResult> {
            Err(ProviderError::unavailable("boom"))
        }
    }

    struct Panics;

    impl Provider for Panics {
        fn name(&self) -> &str {
            "panics"
        }

        fn analyze(&self, _request: &AnalysisRequest) -> ProviderResult<AnalysisResult> {
            panic!("rule engine crashed");
        }
    }

    #[tokio::test]
    async fn test_analyze_async_returns_provider_result() {
        let result = Arc::new(FlagTeh).analyze_async(Arc::new(AnalysisRequest::new("Fix teh test."))).await;
        assert_eq!(result.len(), 1);
        assert_eq!(result.provider_version(), "fake/1");
    }

    #[tokio::test]
    async fn test_analyze_async_maps_failure_to_empty() {
        let result = Arc::new(AlwaysFails).analyze_async(Arc::new(AnalysisRequest::new("text"))).await;
        assert_eq!(result, AnalysisResult::empty());
    }

    #[tokio::test]
    async fn test_analyze_async_maps_panic_to_empty() {
        let result = Arc::new(Panics).analyze_async(Arc::new(AnalysisRequest::new("text"))).await;
        assert_eq!(result, AnalysisResult::empty());
    }

    #[test]
    fn test_normalize_is_identity_by_default() {
        let issue = Issue::builder(IssueCategory::Style, 0, 2).build().unwrap();
        assert_eq!(FlagTeh.normalize(vec![issue.clone()]), vec![issue]);
    }

    #[test]
    fn test_apply_replacement() {
        let text = "Fix teh quick test.";
        let result = FlagTeh.analyze(&AnalysisRequest::new(text)).unwrap();
        let issue = &result.issues()[0];

        assert_eq!(FlagTeh.apply_replacement(text, issue, 0), "Fix the quick test.");
        assert_eq!(FlagTeh.apply_replacement(text, issue, 1), text);
        assert_eq!(FlagTeh.apply_replacement("short", issue, 0), "short");
    }
}
