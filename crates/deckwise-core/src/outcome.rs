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

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;

use crate::error::ReviewError;
use crate::types::ids::CardId;
use crate::types::record::MIN_EASE;
use crate::types::record::ReviewRecord;
use crate::types::timestamp::Timestamp;

/// How the user graded a card.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Answer {
    /// The user knew the card. Wire code `z`.
    Known,
    /// The user did not know the card. Wire code `x`.
    Unknown,
}

impl Answer {
    pub fn code(&self) -> &'static str {
        match self {
            Answer::Known => "z",
            Answer::Unknown => "x",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "z" => Some(Answer::Known),
            "x" => Some(Answer::Unknown),
            _ => None,
        }
    }
}

impl Display for Answer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Answer::Known => write!(f, "known"),
            Answer::Unknown => write!(f, "unknown"),
        }
    }
}

/// Applies a graded answer to a record reviewed at `now`.
pub fn apply_outcome(record: &mut ReviewRecord, answer: Answer, multiplier: u32, now: Timestamp) {
    match answer {
        Answer::Known => {
            record.ease = record.ease.saturating_mul(multiplier).max(MIN_EASE);
            if record.priority {
                // The card was answered wrong earlier in the session and is
                // now right: it stays in the batch but is no longer urgent.
                record.priority = false;
            } else {
                record.learning = false;
            }
        }
        Answer::Unknown => {
            record.ease = (record.ease / multiplier.max(1)).max(MIN_EASE);
            record.priority = true;
        }
    }
    record.last_reviewed_at = Some(now);
}

/// Applies a triage answer: known cards are set aside, unknown cards are
/// kept in rotation.
pub fn apply_sort_outcome(record: &mut ReviewRecord, answer: Answer) {
    match answer {
        Answer::Known => {
            record.to_study = false;
            record.learning = false;
        }
        Answer::Unknown => {
            record.to_study = true;
        }
    }
    record.sorted = true;
}

/// One graded card from a submitted batch.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Outcome {
    /// The 1-based position of the outcome in the batch.
    pub index: usize,
    pub card_id: CardId,
    pub answer: Answer,
}

/// A validated batch of outcomes, in submission order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutcomeBatch {
    outcomes: Vec<Outcome>,
}

#[derive(Deserialize)]
struct RawOutcome {
    id: RawCardId,
    result: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCardId {
    Text(String),
    Number(u64),
}

impl OutcomeBatch {
    /// Builds a batch from graded cards, numbering them from 1.
    pub fn new(graded: impl IntoIterator<Item = (CardId, Answer)>) -> Self {
        let outcomes = graded
            .into_iter()
            .enumerate()
            .map(|(idx, (card_id, answer))| Outcome {
                index: idx + 1,
                card_id,
                answer,
            })
            .collect();
        Self { outcomes }
    }

    /// Parses the wire shape:
    ///
    /// ```json
    /// {"1": {"id": "2516", "result": "x"}, "2": {"id": "2517", "result": "z"}}
    /// ```
    ///
    /// Numeric keys must be exactly `1..=N`. Other keys are ignored, since
    /// some callers attach extra fields such as `deck_id`.
    pub fn from_json(text: &str) -> Result<Self, ReviewError> {
        let map: Map<String, Value> = serde_json::from_str(text)
            .map_err(|e| ReviewError::MalformedBatch(format!("unreadable payload: {e}")))?;

        let mut rows: BTreeMap<usize, Value> = BTreeMap::new();
        for (key, value) in map {
            match key.parse::<usize>() {
                Ok(index) => {
                    if rows.insert(index, value).is_some() {
                        return Err(ReviewError::MalformedBatch(format!(
                            "position {index} appears more than once"
                        )));
                    }
                }
                Err(_) => log::debug!("Ignoring non-positional key '{key}' in outcome batch"),
            }
        }

        let mut outcomes = Vec::with_capacity(rows.len());
        for (expected, (index, value)) in (1..).zip(rows) {
            if index != expected {
                return Err(ReviewError::MalformedBatch(format!(
                    "expected position {expected}, found {index}"
                )));
            }
            let raw: RawOutcome = serde_json::from_value(value).map_err(|e| {
                ReviewError::MalformedBatch(format!("unreadable outcome at position {index}: {e}"))
            })?;
            let card_id = match raw.id {
                RawCardId::Number(id) => CardId::new(id),
                RawCardId::Text(text) => text.parse::<CardId>().map_err(|_| {
                    ReviewError::MalformedBatch(format!(
                        "card id '{text}' at position {index} is not numeric"
                    ))
                })?,
            };
            let answer =
                Answer::from_code(&raw.result).ok_or_else(|| ReviewError::InvalidOutcome {
                    index,
                    value: raw.result.clone(),
                })?;
            outcomes.push(Outcome {
                index,
                card_id,
                answer,
            });
        }
        Ok(Self { outcomes })
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter()
    }
}
