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

use deckwise_core::DeckConfig;
use deckwise_core::DeckSession;
use deckwise_core::Fallible;
use deckwise_core::PresentationCard;
use deckwise_core::UserId;

use crate::db::Database;

pub fn print_batch(
    db: &mut Database,
    user: UserId,
    config: DeckConfig,
    sorting: bool,
) -> Fallible<()> {
    let batch: Vec<PresentationCard> =
        DeckSession::new(db, user, config).get_study_batch(sorting)?;
    if batch.is_empty() {
        log::info!("No cards to study.");
    }
    println!("{}", serde_json::to_string_pretty(&batch)?);
    Ok(())
}
