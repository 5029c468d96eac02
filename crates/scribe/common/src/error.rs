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

//! Error types shared by every provider and by the issue model.

use thiserror::Error;

/// Boxed lower-level cause carried by a [`ProviderError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for a single provider's analysis
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failure of one provider to complete an analysis.
///
/// This is never used to signal "no issues found"; an empty
/// [`AnalysisResult`](crate::AnalysisResult) is the success value for that.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("provider timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("malformed provider response: {message}")]
    MalformedResponse { message: String },

    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl ProviderError {
    /// Internal failure with a message and no underlying cause
    pub fn new(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), source: None }
    }

    /// Internal failure wrapping a lower-level cause
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable { message: message.into() }
    }

    pub fn timeout(timeout_ms: u64) -> Self {
        Self::Timeout { timeout_ms }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse { message: message.into() }
    }

    /// Short, stable label for the failure kind, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Unavailable { .. } => "unavailable",
            ProviderError::Timeout { .. } => "timeout",
            ProviderError::MalformedResponse { .. } => "malformed_response",
            ProviderError::Internal { .. } => "internal",
        }
    }
}

/// Rejections raised while building an [`Issue`](crate::Issue).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssueError {
    #[error("invalid span: {start}..{end}")]
    InvalidSpan { start: usize, end: usize },
}
