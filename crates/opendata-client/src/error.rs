// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;

use thiserror::Error;

/// Errors that abort a fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error: HTTP {status}")]
    Http { status: u16 },

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("no usable records in response")]
    EmptyResult,
}

impl FetchError {
    /// Soft failures mean "nothing new to show" rather than "something broke".
    #[must_use]
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::EmptyResult)
    }
}

/// A record dropped from a batch because its coordinates were unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSkipped {
    /// City name as served (may be empty).
    pub name: String,
    /// Position of the record in the response.
    pub index: usize,
}

impl fmt::Display for RecordSkipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() { "<unnamed>" } else { &self.name };
        write!(f, "no coordinates for city '{}' (record {})", name, self.index)
    }
}
