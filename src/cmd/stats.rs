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

use clap::ValueEnum;
use deckwise_core::DeckConfig;
use deckwise_core::DeckSession;
use deckwise_core::DeckSummary;
use deckwise_core::Fallible;
use deckwise_core::UserId;

use crate::db::Database;

#[derive(ValueEnum, Clone, Copy, PartialEq)]
pub enum StatsFormat {
    /// Plain text, one figure per line.
    Text,
    /// A JSON object.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(
    db: &mut Database,
    user: UserId,
    config: DeckConfig,
    format: StatsFormat,
) -> Fallible<()> {
    let summary = DeckSession::new(db, user, config).summary()?;
    println!("{}", render_stats(&summary, format)?);
    Ok(())
}

fn render_stats(summary: &DeckSummary, format: StatsFormat) -> Fallible<String> {
    match format {
        StatsFormat::Text => Ok(format!(
            "Cards in deck: {}\nCards to study: {}\nCards seen: {}\nCards in current batch: {}\nCards not yet sorted: {}",
            summary.card_total,
            summary.to_study_total,
            summary.seen_total,
            summary.learning_total,
            summary.unsorted_total,
        )),
        StatsFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> DeckSummary {
        DeckSummary {
            card_total: 5,
            to_study_total: 4,
            seen_total: 2,
            learning_total: 3,
            unsorted_total: 1,
        }
    }

    #[test]
    fn test_render_text() -> Fallible<()> {
        let text = render_stats(&summary(), StatsFormat::Text)?;
        assert!(text.starts_with("Cards in deck: 5\n"));
        assert!(text.contains("Cards seen: 2"));
        Ok(())
    }

    #[test]
    fn test_render_json() -> Fallible<()> {
        let json = render_stats(&summary(), StatsFormat::Json)?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value["card_total"], 5);
        assert_eq!(value["unsorted_total"], 1);
        Ok(())
    }

    #[test]
    fn test_print_stats_on_empty_deck() -> Fallible<()> {
        let mut db = Database::open_in_memory()?;
        print_stats(&mut db, UserId::new(1), DeckConfig::default(), StatsFormat::Text)
    }
}
