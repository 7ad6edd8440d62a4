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

use deckwise_core::Card;
use deckwise_core::CardId;
use deckwise_core::CardKind;
use deckwise_core::DeckConfig;
use deckwise_core::DeckSession;
use deckwise_core::Fallible;
use deckwise_core::UserId;
use deckwise_core::fail;

use crate::db::Database;

/// A card as described on the command line.
pub struct NewCard {
    pub kind: CardKind,
    pub name: Option<String>,
    pub questions: Vec<String>,
    pub answers: Vec<String>,
    pub frequency: u32,
}

pub fn add_card(
    db: &mut Database,
    user: UserId,
    config: DeckConfig,
    card: NewCard,
) -> Fallible<()> {
    let id = db.next_card_id()?;
    let card = build_card(id, card)?;
    let mut session = DeckSession::new(db, user, config);
    session.add_cards(&[card])?;
    println!("Added card {id}.");
    Ok(())
}

fn build_card(id: CardId, card: NewCard) -> Fallible<Card> {
    let NewCard {
        kind,
        name,
        questions,
        answers,
        frequency,
    } = card;
    let name = match name.or_else(|| questions.first().cloned()) {
        Some(name) => name,
        None => return fail("a card needs at least one question."),
    };
    if answers.is_empty() {
        return fail("a card needs at least one answer.");
    }
    Ok(Card::new(id, kind, name, questions, answers).with_frequency(frequency))
}
