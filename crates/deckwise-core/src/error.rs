// Copyright 2025 Fernando Borretti
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

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::types::ids::CardId;

#[derive(Debug, PartialEq)]
pub struct ErrorReport {
    message: String,
}

impl ErrorReport {
    pub fn new(msg: impl Into<String>) -> Self {
        ErrorReport {
            message: msg.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for ErrorReport {
    fn from(value: std::io::Error) -> Self {
        ErrorReport {
            message: format!("I/O error: {value:#?}"),
        }
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(value: serde_json::Error) -> Self {
        ErrorReport {
            message: format!("JSON error: {value:#?}"),
        }
    }
}

impl From<toml::de::Error> for ErrorReport {
    fn from(value: toml::de::Error) -> Self {
        ErrorReport {
            message: format!("TOML error: {value}"),
        }
    }
}

impl From<ReviewError> for ErrorReport {
    fn from(value: ReviewError) -> Self {
        match value {
            ReviewError::Store(report) => report,
            other => ErrorReport {
                message: other.to_string(),
            },
        }
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl Error for ErrorReport {
    fn description(&self) -> &str {
        &self.message
    }
}

pub type Fallible<T> = Result<T, ErrorReport>;

pub fn fail<T>(msg: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport {
        message: msg.into(),
    })
}

/// Failures scoped to a single user's study session. None of these are
/// retried internally: the caller is expected to fetch a fresh batch.
#[derive(Debug, PartialEq)]
pub enum ReviewError {
    /// An outcome carried a result code other than `z` or `x`.
    InvalidOutcome { index: usize, value: String },
    /// An outcome referenced a card with no record in the user's deck.
    RecordNotFound { card_id: CardId },
    /// The outcome mapping was not a contiguous `1..=N` sequence, or was
    /// otherwise unreadable.
    MalformedBatch(String),
    /// The card store failed.
    Store(ErrorReport),
}

impl Display for ReviewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewError::InvalidOutcome { index, value } => {
                write!(f, "invalid outcome '{value}' at position {index}")
            }
            ReviewError::RecordNotFound { card_id } => {
                write!(f, "no review record for card {card_id}")
            }
            ReviewError::MalformedBatch(reason) => write!(f, "malformed outcome batch: {reason}"),
            ReviewError::Store(report) => write!(f, "card store failure: {}", report.message),
        }
    }
}

impl Error for ReviewError {}

impl From<ErrorReport> for ReviewError {
    fn from(value: ErrorReport) -> Self {
        ReviewError::Store(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ErrorReport::new("deck is empty");
        assert_eq!(err.to_string(), "error: deck is empty");
    }

    #[test]
    fn test_review_error_into_report() {
        let err = ReviewError::RecordNotFound {
            card_id: CardId::new(5),
        };
        let report: ErrorReport = err.into();
        assert_eq!(report.to_string(), "error: no review record for card 5");
    }

    #[test]
    fn test_store_error_is_unwrapped() {
        let err = ReviewError::Store(ErrorReport::new("disk full"));
        let report: ErrorReport = err.into();
        assert_eq!(report, ErrorReport::new("disk full"));
    }
}
