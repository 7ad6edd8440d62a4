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

use std::collections::HashMap;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::ids::CardId;
use crate::types::ids::UserId;
use crate::types::record::ReviewRecord;

/// Persistence for cards and per-user review records.
///
/// Implementations must list a user's records in a stable order (the order
/// cards were added to the deck), since the scheduler takes unseen cards
/// from the head of the deck. Writes for one user must be serialized by the
/// implementation: a scheduling pass reads the whole deck and then writes it
/// back.
pub trait CardStore {
    /// All review records in the user's deck, in deck order.
    fn list_records(&self, user: UserId) -> Fallible<Vec<ReviewRecord>>;

    /// The user's record for a card, if the card is in their deck.
    fn get_record(&self, user: UserId, card_id: CardId) -> Fallible<Option<ReviewRecord>>;

    /// Overwrites existing records. Fails if any record is not in the deck.
    fn save_records(&mut self, user: UserId, records: &[ReviewRecord]) -> Fallible<()>;

    /// A card's content.
    fn get_card(&self, card_id: CardId) -> Fallible<Option<Card>>;

    /// Inserts a card, or replaces the content of an existing one.
    fn insert_card(&mut self, card: &Card) -> Fallible<()>;

    /// Appends a record to the user's deck. Fails if the card is already in
    /// the deck.
    fn insert_record(&mut self, user: UserId, record: &ReviewRecord) -> Fallible<()>;
}

/// A [`CardStore`] that keeps everything in memory.
#[derive(Default)]
pub struct MemoryStore {
    cards: HashMap<CardId, Card>,
    decks: HashMap<UserId, Vec<ReviewRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CardStore for MemoryStore {
    fn list_records(&self, user: UserId) -> Fallible<Vec<ReviewRecord>> {
        Ok(self.decks.get(&user).cloned().unwrap_or_default())
    }

    fn get_record(&self, user: UserId, card_id: CardId) -> Fallible<Option<ReviewRecord>> {
        let record = self
            .decks
            .get(&user)
            .and_then(|deck| deck.iter().find(|r| r.card_id == card_id))
            .cloned();
        Ok(record)
    }

    fn save_records(&mut self, user: UserId, records: &[ReviewRecord]) -> Fallible<()> {
        let Some(deck) = self.decks.get_mut(&user) else {
            if records.is_empty() {
                return Ok(());
            }
            return fail(format!("user {user} has no deck."));
        };
        // Check everything first so a failed save leaves the deck untouched.
        let mut positions = Vec::with_capacity(records.len());
        for record in records {
            match deck.iter().position(|r| r.card_id == record.card_id) {
                Some(pos) => positions.push(pos),
                None => {
                    return fail(format!(
                        "card {} is not in the deck of user {user}.",
                        record.card_id
                    ));
                }
            }
        }
        for (pos, record) in positions.into_iter().zip(records) {
            deck[pos] = record.clone();
        }
        Ok(())
    }

    fn get_card(&self, card_id: CardId) -> Fallible<Option<Card>> {
        Ok(self.cards.get(&card_id).cloned())
    }

    fn insert_card(&mut self, card: &Card) -> Fallible<()> {
        self.cards.insert(card.id, card.clone());
        Ok(())
    }

    fn insert_record(&mut self, user: UserId, record: &ReviewRecord) -> Fallible<()> {
        let deck = self.decks.entry(user).or_default();
        if deck.iter().any(|r| r.card_id == record.card_id) {
            return fail(format!(
                "card {} is already in the deck of user {user}.",
                record.card_id
            ));
        }
        deck.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_list_in_order() -> Fallible<()> {
        let user = UserId::new(1);
        let mut store = MemoryStore::new();
        for id in [3, 1, 2] {
            store.insert_record(user, &ReviewRecord::new(CardId::new(id)))?;
        }
        let ids: Vec<u64> = store
            .list_records(user)?
            .iter()
            .map(|r| r.card_id.into_inner())
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
        Ok(())
    }

    #[test]
    fn test_duplicate_record_rejected() -> Fallible<()> {
        let user = UserId::new(1);
        let mut store = MemoryStore::new();
        store.insert_record(user, &ReviewRecord::new(CardId::new(1)))?;
        assert!(
            store
                .insert_record(user, &ReviewRecord::new(CardId::new(1)))
                .is_err()
        );
        Ok(())
    }

    #[test]
    fn test_records_are_per_user() -> Fallible<()> {
        let mut store = MemoryStore::new();
        store.insert_record(UserId::new(1), &ReviewRecord::new(CardId::new(5)))?;
        assert!(store.get_record(UserId::new(2), CardId::new(5))?.is_none());
        assert!(store.get_record(UserId::new(1), CardId::new(5))?.is_some());
        assert!(store.list_records(UserId::new(2))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_is_all_or_nothing() -> Fallible<()> {
        let user = UserId::new(1);
        let mut store = MemoryStore::new();
        store.insert_record(user, &ReviewRecord::new(CardId::new(1)))?;
        let mut changed = ReviewRecord::new(CardId::new(1));
        changed.ease = 4;
        let stranger = ReviewRecord::new(CardId::new(2));
        assert!(store.save_records(user, &[changed, stranger]).is_err());
        assert_eq!(store.get_record(user, CardId::new(1))?.map(|r| r.ease), Some(1));
        Ok(())
    }
}
