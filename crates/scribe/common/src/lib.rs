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

//! Scribe Common
//!
//! Value types shared by every suggestion provider: the issue model, the
//! request and result envelopes, and the provider failure type.

pub mod error;
pub mod issue;
pub mod offsets;
pub mod request;
pub mod result;

pub use error::{BoxError, IssueError, ProviderError, ProviderResult};
pub use issue::{Issue, IssueBuilder, IssueCategory, Severity, UNKNOWN_PROVIDER, UNKNOWN_RULE};
pub use request::{AnalysisRequest, AnalysisRequestBuilder, AnalysisScope, DEFAULT_LANGUAGE};
pub use result::AnalysisResult;
