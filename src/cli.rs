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

use std::fs::read_to_string;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use deckwise_core::CardKind;
use deckwise_core::DeckConfig;
use deckwise_core::Fallible;
use deckwise_core::UserId;

use crate::cmd::add::NewCard;
use crate::cmd::add::add_card;
use crate::cmd::batch::print_batch;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::cmd::submit::submit_outcomes;
use crate::db::Database;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the deck database. Created if it does not exist.
    #[arg(long, global = true, default_value = "deckwise.db")]
    db: String,
    /// The user whose deck to work on.
    #[arg(long, global = true, default_value_t = 1)]
    user: u64,
    /// Path to a TOML file with deck settings. By default, the built-in defaults are used.
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a card to the store and to the user's deck.
    Add {
        /// What kind of item the card drills.
        kind: KindArg,
        /// Display name. By default, the first question is used.
        #[arg(long)]
        name: Option<String>,
        /// A question field. Repeat for several.
        #[arg(long = "question", required = true)]
        questions: Vec<String>,
        /// An answer field. Repeat for several.
        #[arg(long = "answer", required = true)]
        answers: Vec<String>,
        /// Corpus frequency of the item.
        #[arg(long, default_value_t = 0)]
        frequency: u32,
    },
    /// Print the cards to study next, as JSON.
    Batch {
        /// Print the cards not yet triaged instead of the study batch.
        #[arg(long)]
        sorting: bool,
    },
    /// Record graded outcomes for the cards of a batch.
    Submit {
        /// Treat the outcomes as triage answers.
        #[arg(long)]
        sorting: bool,
        /// Path to the outcome payload. By default, it is read from stdin.
        file: Option<String>,
    },
    /// Print deck statistics.
    Stats {
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
}

#[derive(ValueEnum, Clone, Copy)]
enum KindArg {
    Word,
    Character,
    Sentence,
}

impl From<KindArg> for CardKind {
    fn from(kind: KindArg) -> CardKind {
        match kind {
            KindArg::Word => CardKind::Word,
            KindArg::Character => CardKind::Character,
            KindArg::Sentence => CardKind::Sentence,
        }
    }
}

fn load_config(path: Option<String>) -> Fallible<DeckConfig> {
    match path {
        Some(path) => {
            let text = read_to_string(&path)?;
            let config = DeckConfig::from_toml(&text)?;
            log::debug!("Loaded deck config from {path}: {config:?}");
            Ok(config)
        }
        None => Ok(DeckConfig::default()),
    }
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    let config = load_config(cli.config)?;
    let user = UserId::new(cli.user);
    let mut db = Database::open(&cli.db)?;
    match cli.command {
        Command::Add {
            kind,
            name,
            questions,
            answers,
            frequency,
        } => {
            let card = NewCard {
                kind: kind.into(),
                name,
                questions,
                answers,
                frequency,
            };
            add_card(&mut db, user, config, card)
        }
        Command::Batch { sorting } => print_batch(&mut db, user, config, sorting),
        Command::Submit { sorting, file } => submit_outcomes(&mut db, user, config, sorting, file),
        Command::Stats { format } => print_stats(&mut db, user, config, format),
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_config() -> Fallible<()> {
        assert_eq!(load_config(None)?, DeckConfig::default());
        Ok(())
    }

    #[test]
    fn test_load_config_file() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("deck.toml");
        write(&path, "batch_size = 3\n")?;
        let config = load_config(Some(path.display().to_string()))?;
        assert_eq!(config.batch_size, 3);
        assert_eq!(config.ease_multiplier, 2);
        Ok(())
    }

    #[test]
    fn test_missing_config_file() {
        assert!(load_config(Some("./no-such-deck.toml".to_string())).is_err());
    }
}
