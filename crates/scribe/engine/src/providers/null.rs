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

use crate::provider::Provider;
use scribe_common::{AnalysisRequest, AnalysisResult, ProviderResult};

/// Provider that never reports anything.
///
/// Stands in wherever a provider is required but no analysis should happen
/// (offline mode, UI wiring, tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProvider;

impl Provider for NullProvider {
    fn name(&self) -> &str {
        "null"
    }

    fn analyze(&self, _request: &AnalysisRequest) -> ProviderResult<AnalysisResult> {
        Ok(AnalysisResult::empty())
    }
}
