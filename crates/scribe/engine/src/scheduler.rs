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

//! # Debounced analysis scheduler
//!
//! [`DebouncedAnalyzer`] coalesces bursts of text changes into a single
//! analysis cycle per input stream. Each [`notify`](DebouncedAnalyzer::notify)
//! replaces the stream's pending cycle and restarts the quiet period; when the
//! period elapses the cycle analyzes the most recent text and hands a
//! [`Delivery`] to the configured [`ResultSink`].
//!
//! Cycles that have already started are never interrupted. Consumers that only
//! care about the newest text compare [`Delivery::sequence`] numbers.

use crate::provider::Provider;
use crate::timer::{TimerId, TimerRegistry};
use parking_lot::Mutex;
use scribe_common::{AnalysisRequest, AnalysisResult, AnalysisScope, DEFAULT_LANGUAGE};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, instrument};

/// Quiet period used when none is configured
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Request settings shared by every cycle; only the text varies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestTemplate {
    pub language: String,
    pub scope: AnalysisScope,
    pub enabled_categories: BTreeSet<String>,
    pub disabled_rule_ids: BTreeSet<String>,
    pub user_dictionary: BTreeSet<String>,
}

impl Default for RequestTemplate {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            scope: AnalysisScope::default(),
            enabled_categories: BTreeSet::new(),
            disabled_rule_ids: BTreeSet::new(),
            user_dictionary: BTreeSet::new(),
        }
    }
}

impl RequestTemplate {
    pub fn request(&self, text: impl Into<String>) -> AnalysisRequest {
        AnalysisRequest::builder(text)
            .language(self.language.as_str())
            .scope(self.scope)
            .enabled_categories(self.enabled_categories.iter().cloned())
            .disabled_rule_ids(self.disabled_rule_ids.iter().cloned())
            .user_dictionary(self.user_dictionary.iter().cloned())
            .build()
    }
}

/// One completed analysis cycle
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub stream: String,
    /// Increases with every `notify` on the same analyzer
    pub sequence: u64,
    pub result: AnalysisResult,
}

/// Receives completed cycles
pub trait ResultSink: Send + Sync + 'static {
    fn deliver(&self, delivery: Delivery);
}

impl<F> ResultSink for F
where
    F: Fn(Delivery) + Send + Sync + 'static,
{
    fn deliver(&self, delivery: Delivery) {
        self(delivery)
    }
}

impl ResultSink for UnboundedSender<Delivery> {
    fn deliver(&self, delivery: Delivery) {
        if let Err(rejected) = self.send(delivery) {
            debug!(stream = %rejected.0.stream, "result receiver closed, dropping delivery");
        }
    }
}

/// Per-stream debouncer in front of a provider
pub struct DebouncedAnalyzer {
    provider: Arc<dyn Provider>,
    sink: Arc<dyn ResultSink>,
    template: Arc<RequestTemplate>,
    delay: Duration,
    timers: TimerRegistry,
    state: Arc<Mutex<StreamState>>,
}

#[derive(Default)]
struct StreamState {
    sequence: u64,
    pending: HashMap<String, PendingCycle>,
}

struct PendingCycle {
    timer: TimerId,
    sequence: u64,
}

impl StreamState {
    /// Forgets `stream`'s entry if it still belongs to cycle `sequence`
    fn release(&mut self, stream: &str, sequence: u64) {
        if self.pending.get(stream).is_some_and(|cycle| cycle.sequence == sequence) {
            self.pending.remove(stream);
        }
    }
}

impl DebouncedAnalyzer {
    pub fn new(provider: Arc<dyn Provider>, sink: impl ResultSink, template: RequestTemplate, delay: Duration, handle: Handle) -> Self {
        Self {
            provider,
            sink: Arc::new(sink),
            template: Arc::new(template),
            delay,
            timers: TimerRegistry::new(handle),
            state: Arc::new(Mutex::new(StreamState::default())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn template(&self) -> &RequestTemplate {
        &self.template
    }

    /// Records a text change on `stream` and (re)starts its quiet period.
    ///
    /// Returns the sequence number the resulting delivery will carry.
    #[instrument(skip(self, text))]
    pub fn notify(&self, stream: &str, text: impl Into<String>) -> u64 {
        let text = text.into();
        let mut state = self.state.lock();
        state.sequence += 1;
        let sequence = state.sequence;

        if let Some(previous) = state.pending.remove(stream) {
            if self.timers.cancel(previous.timer) {
                debug!(sequence, "superseded pending cycle");
            }
        }

        let cycle = run_cycle(
            Arc::clone(&self.provider),
            Arc::clone(&self.sink),
            Arc::clone(&self.template),
            Arc::clone(&self.state),
            stream.to_string(),
            sequence,
            text,
        );
        let timer = self.timers.schedule(self.delay, cycle);
        state.pending.insert(stream.to_string(), PendingCycle { timer, sequence });

        sequence
    }

    /// Cancels the pending cycle of `stream`, if it has not started
    pub fn cancel(&self, stream: &str) -> bool {
        let cycle = self.state.lock().pending.remove(stream);
        cycle.is_some_and(|cycle| self.timers.cancel(cycle.timer))
    }

    /// Number of cycles waiting for their quiet period to end
    pub fn pending(&self) -> usize {
        self.timers.pending()
    }

    /// Cancels every pending cycle; started cycles still deliver
    pub fn shutdown(&self) -> usize {
        self.state.lock().pending.clear();
        let cancelled = self.timers.cancel_all();
        if cancelled > 0 {
            debug!(cancelled, "cancelled pending cycles");
        }
        cancelled
    }
}

impl Drop for DebouncedAnalyzer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[instrument(skip(provider, sink, template, state, text))]
async fn run_cycle(
    provider: Arc<dyn Provider>,
    sink: Arc<dyn ResultSink>,
    template: Arc<RequestTemplate>,
    state: Arc<Mutex<StreamState>>,
    stream: String,
    sequence: u64,
    text: String,
) {
    // Started cycles can no longer be cancelled, so the stream entry is done.
    state.lock().release(&stream, sequence);
    let request = Arc::new(template.request(text));
    let result = provider.analyze_async(request).await;
    debug!(issues = result.len(), elapsed_ms = result.elapsed_millis(), "cycle complete");
    sink.deliver(Delivery { stream, sequence, result });
}
