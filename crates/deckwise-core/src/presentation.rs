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

use crate::types::card::Card;
use crate::types::ids::CardId;
use crate::types::record::ReviewRecord;

/// A card as handed to the view layer. Serializes to
/// `{"id": .., "questions": [..], "answers": [..], "i": .., "ease": ..}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresentationCard {
    pub id: CardId,
    pub questions: Vec<String>,
    pub answers: Vec<String>,
    /// Position in the batch, starting at 0.
    pub i: usize,
    pub ease: u32,
}

impl PresentationCard {
    pub fn new(card: Card, record: &ReviewRecord, i: usize) -> Self {
        Self {
            id: record.card_id,
            questions: card.questions,
            answers: card.answers,
            i,
            ease: record.ease,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_wire_shape() -> Fallible<()> {
        let card = Card::word(CardId::new(12), "你好", "你好", "nǐ hǎo", "hello");
        let record = ReviewRecord {
            ease: 4,
            ..ReviewRecord::new(CardId::new(12))
        };
        let presented = PresentationCard::new(card, &record, 3);
        assert_eq!(
            serde_json::to_value(&presented)?,
            json!({
                "id": "12",
                "questions": ["你好", "你好"],
                "answers": ["nǐ hǎo", "hello"],
                "i": 3,
                "ease": 4
            })
        );
        Ok(())
    }
}
