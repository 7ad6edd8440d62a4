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
use std::io::Read;
use std::io::stdin;

use deckwise_core::DeckConfig;
use deckwise_core::DeckSession;
use deckwise_core::Fallible;
use deckwise_core::OutcomeBatch;
use deckwise_core::Timestamp;
use deckwise_core::UserId;

use crate::db::Database;

pub fn submit_outcomes(
    db: &mut Database,
    user: UserId,
    config: DeckConfig,
    sorting: bool,
    file: Option<String>,
) -> Fallible<()> {
    let payload = read_payload(file)?;
    let count = apply_payload(db, user, config, sorting, &payload, Timestamp::now())?;
    println!("Recorded {count} outcomes.");
    Ok(())
}

fn read_payload(file: Option<String>) -> Fallible<String> {
    match file {
        Some(path) => Ok(read_to_string(path)?),
        None => {
            let mut payload = String::new();
            stdin().read_to_string(&mut payload)?;
            Ok(payload)
        }
    }
}

fn apply_payload(
    db: &mut Database,
    user: UserId,
    config: DeckConfig,
    sorting: bool,
    payload: &str,
    now: Timestamp,
) -> Fallible<usize> {
    let batch = OutcomeBatch::from_json(payload)?;
    let count = DeckSession::new(db, user, config).submit_outcomes(&batch, sorting, now)?;
    Ok(count)
}
