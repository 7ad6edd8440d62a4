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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::types::ids::CardId;

/// The kind of vocabulary item a card drills. All kinds share the same
/// question/answer shape; the kind only records where the card came from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Word,
    Character,
    Sentence,
}

impl CardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardKind::Word => "word",
            CardKind::Character => "character",
            CardKind::Sentence => "sentence",
        }
    }
}

impl Display for CardKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for CardKind {
    type Error = ErrorReport;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "word" => Ok(CardKind::Word),
            "character" => Ok(CardKind::Character),
            "sentence" => Ok(CardKind::Sentence),
            _ => Err(ErrorReport::new(format!("invalid card kind: '{value}'"))),
        }
    }
}

/// A card's content. Shared by every user; per-user state lives in
/// [`ReviewRecord`](crate::types::record::ReviewRecord).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub kind: CardKind,
    pub name: String,
    /// Corpus frequency, used only for display ordering by callers.
    pub frequency: u32,
    pub questions: Vec<String>,
    pub answers: Vec<String>,
}

impl Card {
    pub fn new(
        id: CardId,
        kind: CardKind,
        name: impl Into<String>,
        questions: Vec<String>,
        answers: Vec<String>,
    ) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            frequency: 0,
            questions,
            answers,
        }
    }

    /// A vocabulary word: asked in simplified and traditional script,
    /// answered with pinyin and the English gloss.
    pub fn word(
        id: CardId,
        simplified: &str,
        traditional: &str,
        pinyin: &str,
        english: &str,
    ) -> Self {
        Self::new(
            id,
            CardKind::Word,
            simplified,
            vec![simplified.to_string(), traditional.to_string()],
            vec![pinyin.to_string(), english.to_string()],
        )
    }

    pub fn character(id: CardId, character: &str, pinyin: &str, meaning: &str) -> Self {
        Self::new(
            id,
            CardKind::Character,
            character,
            vec![character.to_string()],
            vec![pinyin.to_string(), meaning.to_string()],
        )
    }

    pub fn sentence(id: CardId, sentence: &str, translation: &str) -> Self {
        Self::new(
            id,
            CardKind::Sentence,
            sentence,
            vec![sentence.to_string()],
            vec![translation.to_string()],
        )
    }

    pub fn with_frequency(self, frequency: u32) -> Self {
        Self { frequency, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_shape() {
        let card = Card::word(CardId::new(1), "学习", "學習", "xué xí", "to study");
        assert_eq!(card.kind, CardKind::Word);
        assert_eq!(card.name, "学习");
        assert_eq!(card.questions, vec!["学习", "學習"]);
        assert_eq!(card.answers, vec!["xué xí", "to study"]);
        assert_eq!(card.frequency, 0);
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in [CardKind::Word, CardKind::Character, CardKind::Sentence] {
            assert_eq!(CardKind::try_from(kind.as_str()), Ok(kind));
        }
        assert!(CardKind::try_from("phrase").is_err());
    }

    #[test]
    fn test_with_frequency() {
        let card = Card::character(CardId::new(2), "学", "xué", "study").with_frequency(42);
        assert_eq!(card.frequency, 42);
    }
}
