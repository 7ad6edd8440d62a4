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

use serde::Serialize;

use crate::config::DeckConfig;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::ReviewError;
use crate::outcome::OutcomeBatch;
use crate::outcome::apply_outcome;
use crate::outcome::apply_sort_outcome;
use crate::presentation::PresentationCard;
use crate::scheduler::learning_batch;
use crate::store::CardStore;
use crate::types::card::Card;
use crate::types::ids::UserId;
use crate::types::record::ReviewRecord;
use crate::types::timestamp::Timestamp;

/// Counts over a user's deck.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeckSummary {
    pub card_total: usize,
    pub to_study_total: usize,
    /// Cards in rotation that have been reviewed at least once.
    pub seen_total: usize,
    pub learning_total: usize,
    pub unsorted_total: usize,
}

/// A user's deck split by triage state, each half in deck order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayCards {
    pub to_study: Vec<ReviewRecord>,
    pub set_aside: Vec<ReviewRecord>,
}

/// One user's deck, as seen by the view layer.
pub struct DeckSession<'a, S: CardStore> {
    store: &'a mut S,
    user: UserId,
    config: DeckConfig,
}

impl<'a, S: CardStore> DeckSession<'a, S> {
    pub fn new(store: &'a mut S, user: UserId, config: DeckConfig) -> Self {
        Self {
            store,
            user,
            config,
        }
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    /// The cards to show next. In study mode this is the active learning
    /// batch, selecting and persisting a new one if none is active. In
    /// sorting mode it is every card not yet triaged.
    pub fn get_study_batch(&mut self, sorting: bool) -> Result<Vec<PresentationCard>, ReviewError> {
        let mut records = self.store.list_records(self.user)?;
        let batch: Vec<ReviewRecord> = if sorting {
            records.into_iter().filter(|r| !r.sorted).collect()
        } else {
            let had_batch = records.iter().any(|r| r.learning);
            let batch: Vec<ReviewRecord> = learning_batch(&mut records, &self.config)
                .into_iter()
                .cloned()
                .collect();
            if !had_batch {
                self.store.save_records(self.user, &records)?;
            }
            batch
        };

        let mut presented = Vec::with_capacity(batch.len());
        for (i, record) in batch.iter().enumerate() {
            let card = self.store.get_card(record.card_id)?.ok_or_else(|| {
                ErrorReport::new(format!("card {} has no content.", record.card_id))
            })?;
            presented.push(PresentationCard::new(card, record, i));
        }
        log::debug!(
            "Presenting {} cards to user {} (sorting: {sorting})",
            presented.len(),
            self.user
        );
        Ok(presented)
    }

    /// Applies a batch of graded outcomes and persists the result.
    ///
    /// The batch is all-or-nothing: every card is resolved and every
    /// outcome applied to a working copy before anything is saved, so a
    /// single unknown card leaves the deck untouched.
    pub fn submit_outcomes(
        &mut self,
        batch: &OutcomeBatch,
        sorting: bool,
        now: Timestamp,
    ) -> Result<usize, ReviewError> {
        let mut updated: Vec<ReviewRecord> = Vec::with_capacity(batch.len());
        for outcome in batch.iter() {
            let pos = match updated.iter().position(|r| r.card_id == outcome.card_id) {
                Some(pos) => pos,
                None => {
                    let record = self
                        .store
                        .get_record(self.user, outcome.card_id)?
                        .ok_or(ReviewError::RecordNotFound {
                            card_id: outcome.card_id,
                        })?;
                    updated.push(record);
                    updated.len() - 1
                }
            };
            let record = &mut updated[pos];
            if sorting {
                apply_sort_outcome(record, outcome.answer);
            } else {
                apply_outcome(record, outcome.answer, self.config.ease_multiplier, now);
            }
        }
        self.store.save_records(self.user, &updated)?;
        log::info!(
            "Recorded {} outcomes for user {} (sorting: {sorting})",
            batch.len(),
            self.user
        );
        Ok(batch.len())
    }

    /// Adds cards to the user's deck. Cards already in the deck keep their
    /// review history. Returns how many cards were new to the deck.
    pub fn add_cards(&mut self, cards: &[Card]) -> Fallible<usize> {
        let mut added = 0;
        for card in cards {
            self.store.insert_card(card)?;
            if self.store.get_record(self.user, card.id)?.is_none() {
                self.store
                    .insert_record(self.user, &ReviewRecord::new(card.id))?;
                added += 1;
            }
        }
        log::debug!("Added {added} cards to the deck of user {}", self.user);
        Ok(added)
    }

    pub fn summary(&self) -> Fallible<DeckSummary> {
        let records = self.store.list_records(self.user)?;
        let to_study: Vec<&ReviewRecord> = records.iter().filter(|r| r.to_study).collect();
        Ok(DeckSummary {
            card_total: records.len(),
            to_study_total: to_study.len(),
            seen_total: to_study.iter().filter(|r| r.is_seen()).count(),
            learning_total: records.iter().filter(|r| r.learning).count(),
            unsorted_total: records.iter().filter(|r| !r.sorted).count(),
        })
    }

    pub fn display_cards(&self) -> Fallible<DisplayCards> {
        let (to_study, set_aside): (Vec<ReviewRecord>, Vec<ReviewRecord>) = self
            .store
            .list_records(self.user)?
            .into_iter()
            .partition(|r| r.to_study);
        Ok(DisplayCards {
            to_study,
            set_aside,
        })
    }
}
