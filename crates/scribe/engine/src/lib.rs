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

//! Scribe Engine
//!
//! Runs writing-suggestion providers: the provider contract, the built-in
//! providers, the fan-out aggregator, and the debounced scheduler that turns
//! keystroke-level text changes into analysis cycles.

pub mod composite;
pub mod provider;
pub mod providers;
pub mod scheduler;
pub mod text;
pub mod timer;

// Re-export the types most callers need
pub use composite::{COMPOSITE_VERSION, CompositeBuilder, CompositeProvider};
pub use provider::Provider;
pub use providers::{DEFAULT_MISSPELLINGS, MisspellingProvider, NullProvider, ProseLinter, RuleError, RuleSettings};
pub use scheduler::{DEFAULT_DEBOUNCE, DebouncedAnalyzer, Delivery, RequestTemplate, ResultSink};
pub use timer::{TimerId, TimerRegistry};
