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

//! # Fan-out aggregator
//!
//! [`CompositeProvider`] runs every registered child provider over the same
//! request and concatenates their issues in registration order. A failing
//! child is logged and contributes nothing; the composite itself never fails.
//!
//! The synchronous path visits children one after another. The asynchronous
//! path spawns one task per child and joins them once all have settled, so its
//! latency is that of the slowest child.

use crate::provider::Provider;
use async_trait::async_trait;
use futures::future::join_all;
use scribe_common::{AnalysisRequest, AnalysisResult, Issue, ProviderResult};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Provider version reported on every merged result
pub const COMPOSITE_VERSION: &str = "composite";

/// Immutable, ordered set of child providers
#[derive(Clone, Default)]
pub struct CompositeProvider {
    children: Vec<Arc<dyn Provider>>,
}

impl CompositeProvider {
    pub fn new(children: Vec<Arc<dyn Provider>>) -> Self {
        Self { children }
    }

    pub fn builder() -> CompositeBuilder {
        CompositeBuilder::default()
    }

    pub fn children(&self) -> &[Arc<dyn Provider>] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Appends `result`'s issues, dropping any that reach past the text
    fn merge(issues: &mut Vec<Issue>, child: &str, result: AnalysisResult, text_len: usize) {
        for issue in result.into_issues() {
            if issue.is_within(text_len) {
                issues.push(issue);
            } else {
                debug!(provider = child, start = issue.start(), end = issue.end(), text_len, "dropping out-of-range issue");
            }
        }
    }
}

impl fmt::Debug for CompositeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.children.iter().map(|child| child.name()).collect();
        f.debug_struct("CompositeProvider").field("children", &names).finish()
    }
}

#[async_trait]
impl Provider for CompositeProvider {
    fn name(&self) -> &str {
        COMPOSITE_VERSION
    }

    fn analyze(&self, request: &AnalysisRequest) -> ProviderResult<AnalysisResult> {
        if self.children.is_empty() {
            return Ok(AnalysisResult::empty());
        }

        let started = Instant::now();
        let mut issues = Vec::new();
        for child in &self.children {
            match panic::catch_unwind(AssertUnwindSafe(|| child.analyze(request))) {
                Ok(Ok(result)) => Self::merge(&mut issues, child.name(), result, request.text_len()),
                Ok(Err(error)) => {
                    warn!(provider = child.name(), kind = error.kind(), "provider failed, skipping: {}", error);
                }
                Err(_) => {
                    warn!(provider = child.name(), "provider panicked, skipping");
                }
            }
        }

        Ok(AnalysisResult::new(issues, started.elapsed(), COMPOSITE_VERSION))
    }

    #[instrument(skip_all)]
    async fn analyze_async(self: Arc<Self>, request: Arc<AnalysisRequest>) -> AnalysisResult {
        if self.children.is_empty() {
            return AnalysisResult::empty();
        }

        let started = Instant::now();
        let tasks = self.children.iter().map(|child| {
            let name = child.name().to_string();
            let handle = tokio::spawn(Arc::clone(child).analyze_async(Arc::clone(&request)));
            async move {
                let result = match handle.await {
                    Ok(result) => result,
                    Err(join_error) => {
                        warn!(provider = %name, "provider task did not complete: {}", join_error);
                        AnalysisResult::empty()
                    }
                };
                (name, result)
            }
        });

        let mut issues = Vec::new();
        for (name, result) in join_all(tasks).await {
            Self::merge(&mut issues, &name, result, request.text_len());
        }

        debug!(children = self.children.len(), issues = issues.len(), "fan-out complete");
        AnalysisResult::new(issues, started.elapsed(), COMPOSITE_VERSION)
    }
}

/// Collects child providers in registration order
#[derive(Default)]
pub struct CompositeBuilder {
    children: Vec<Arc<dyn Provider>>,
}

impl CompositeBuilder {
    pub fn with<P: Provider>(mut self, provider: P) -> Self {
        self.children.push(Arc::new(provider));
        self
    }

    pub fn with_shared(mut self, provider: Arc<dyn Provider>) -> Self {
        self.children.push(provider);
        self
    }

    pub fn build(self) -> CompositeProvider {
        CompositeProvider::new(self.children)
    }
}
