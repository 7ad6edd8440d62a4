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

use serde::Deserialize;
use serde::Serialize;

use crate::types::ids::CardId;
use crate::types::timestamp::Timestamp;

/// The initial ease of a card. Ease never drops below this.
pub const MIN_EASE: u32 = 1;

/// Per-user review state for one card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// The card this record tracks.
    pub card_id: CardId,
    /// Difficulty multiplier. Higher means easier, so the card resurfaces
    /// less often.
    pub ease: u32,
    /// When the card was last reviewed. `None` means the card is unseen.
    pub last_reviewed_at: Option<Timestamp>,
    /// Set when the card was answered wrong and must resurface sooner.
    pub priority: bool,
    /// Set while the card is part of the active study batch.
    pub learning: bool,
    /// Set once the user has triaged the card.
    pub sorted: bool,
    /// Cleared when the card is set aside and excluded from scheduling.
    pub to_study: bool,
}

impl ReviewRecord {
    /// A fresh record for a card just added to a deck.
    pub fn new(card_id: CardId) -> Self {
        Self {
            card_id,
            ease: MIN_EASE,
            last_reviewed_at: None,
            priority: false,
            learning: false,
            sorted: false,
            to_study: true,
        }
    }

    pub fn is_seen(&self) -> bool {
        self.last_reviewed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record() {
        let record = ReviewRecord::new(CardId::new(7));
        assert_eq!(record.ease, 1);
        assert!(!record.is_seen());
        assert!(!record.priority);
        assert!(!record.learning);
        assert!(!record.sorted);
        assert!(record.to_study);
    }
}
