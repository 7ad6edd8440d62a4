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
use deckwise_core::CardStore;
use deckwise_core::ErrorReport;
use deckwise_core::Fallible;
use deckwise_core::ReviewRecord;
use deckwise_core::Timestamp;
use deckwise_core::UserId;
use deckwise_core::fail;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;

const SCHEMA: &str = "
    create table if not exists cards (
        card_id integer primary key,
        kind text not null,
        name text not null,
        frequency integer not null,
        questions text not null,
        answers text not null
    ) strict;

    create table if not exists review_records (
        user_id integer not null,
        card_id integer not null references cards (card_id),
        ease integer not null,
        last_reviewed_at text,
        priority integer not null,
        learning integer not null,
        sorted integer not null,
        to_study integer not null,
        primary key (user_id, card_id)
    ) strict;
";

const RECORD_COLUMNS: &str =
    "card_id, ease, last_reviewed_at, priority, learning, sorted, to_study";

fn db_error(err: rusqlite::Error) -> ErrorReport {
    ErrorReport::new(format!("database error: {err}"))
}

/// A review record as stored, before the timestamp is parsed.
struct RawRecord {
    card_id: i64,
    ease: i64,
    last_reviewed_at: Option<String>,
    priority: bool,
    learning: bool,
    sorted: bool,
    to_study: bool,
}

impl RawRecord {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            card_id: row.get(0)?,
            ease: row.get(1)?,
            last_reviewed_at: row.get(2)?,
            priority: row.get(3)?,
            learning: row.get(4)?,
            sorted: row.get(5)?,
            to_study: row.get(6)?,
        })
    }

    fn into_record(self) -> Fallible<ReviewRecord> {
        let last_reviewed_at = match self.last_reviewed_at {
            Some(s) => Some(Timestamp::try_from(s)?),
            None => None,
        };
        let ease = u32::try_from(self.ease)
            .map_err(|_| ErrorReport::new(format!("invalid ease in database: {}", self.ease)))?;
        Ok(ReviewRecord {
            card_id: CardId::new(self.card_id as u64),
            ease,
            last_reviewed_at,
            priority: self.priority,
            learning: self.learning,
            sorted: self.sorted,
            to_study: self.to_study,
        })
    }
}

/// SQLite-backed card store.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &str) -> Fallible<Self> {
        let conn = Connection::open(path).map_err(db_error)?;
        log::debug!("Opened database at {path}");
        Self::init(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Fallible<Self> {
        let conn = Connection::open_in_memory().map_err(db_error)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Fallible<Self> {
        conn.execute_batch("pragma foreign_keys = on;")
            .map_err(db_error)?;
        conn.execute_batch(SCHEMA).map_err(db_error)?;
        Ok(Self { conn })
    }

    /// The smallest card id greater than every id in use.
    pub fn next_card_id(&self) -> Fallible<CardId> {
        let max: i64 = self
            .conn
            .query_row("select coalesce(max(card_id), 0) from cards", [], |row| {
                row.get(0)
            })
            .map_err(db_error)?;
        Ok(CardId::new(max as u64 + 1))
    }
}

impl CardStore for Database {
    fn list_records(&self, user: UserId) -> Fallible<Vec<ReviewRecord>> {
        let sql = format!(
            "select {RECORD_COLUMNS} from review_records where user_id = ? order by rowid"
        );
        let mut stmt = self.conn.prepare(&sql).map_err(db_error)?;
        let rows = stmt
            .query_map([user.into_inner() as i64], RawRecord::from_row)
            .map_err(db_error)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(db_error)?.into_record()?);
        }
        Ok(records)
    }

    fn get_record(&self, user: UserId, card_id: CardId) -> Fallible<Option<ReviewRecord>> {
        let sql = format!(
            "select {RECORD_COLUMNS} from review_records where user_id = ? and card_id = ?"
        );
        let raw = self
            .conn
            .query_row(
                &sql,
                [user.into_inner() as i64, card_id.into_inner() as i64],
                RawRecord::from_row,
            )
            .optional()
            .map_err(db_error)?;
        raw.map(RawRecord::into_record).transpose()
    }

    fn save_records(&mut self, user: UserId, records: &[ReviewRecord]) -> Fallible<()> {
        let tx = self.conn.transaction().map_err(db_error)?;
        for record in records {
            let changed = tx
                .execute(
                    "update review_records
                     set ease = ?, last_reviewed_at = ?, priority = ?, learning = ?, sorted = ?, to_study = ?
                     where user_id = ? and card_id = ?",
                    params![
                        record.ease,
                        record.last_reviewed_at.map(|ts| ts.to_string()),
                        record.priority,
                        record.learning,
                        record.sorted,
                        record.to_study,
                        user.into_inner() as i64,
                        record.card_id.into_inner() as i64,
                    ],
                )
                .map_err(db_error)?;
            if changed == 0 {
                // Dropping the transaction rolls back the earlier updates.
                return fail(format!(
                    "card {} is not in the deck of user {user}.",
                    record.card_id
                ));
            }
        }
        tx.commit().map_err(db_error)?;
        Ok(())
    }

    fn get_card(&self, card_id: CardId) -> Fallible<Option<Card>> {
        let raw = self
            .conn
            .query_row(
                "select kind, name, frequency, questions, answers from cards where card_id = ?",
                [card_id.into_inner() as i64],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, u32>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()
            .map_err(db_error)?;
        let Some((kind, name, frequency, questions, answers)) = raw else {
            return Ok(None);
        };
        let card = Card::new(
            card_id,
            CardKind::try_from(kind.as_str())?,
            name,
            serde_json::from_str(&questions)?,
            serde_json::from_str(&answers)?,
        )
        .with_frequency(frequency);
        Ok(Some(card))
    }

    fn insert_card(&mut self, card: &Card) -> Fallible<()> {
        self.conn
            .execute(
                "insert into cards (card_id, kind, name, frequency, questions, answers)
                 values (?, ?, ?, ?, ?, ?)
                 on conflict (card_id) do update set
                     kind = excluded.kind,
                     name = excluded.name,
                     frequency = excluded.frequency,
                     questions = excluded.questions,
                     answers = excluded.answers",
                params![
                    card.id.into_inner() as i64,
                    card.kind.as_str(),
                    card.name,
                    card.frequency,
                    serde_json::to_string(&card.questions)?,
                    serde_json::to_string(&card.answers)?,
                ],
            )
            .map_err(db_error)?;
        Ok(())
    }

    fn insert_record(&mut self, user: UserId, record: &ReviewRecord) -> Fallible<()> {
        if self.get_record(user, record.card_id)?.is_some() {
            return fail(format!(
                "card {} is already in the deck of user {user}.",
                record.card_id
            ));
        }
        let sql = format!(
            "insert into review_records (user_id, {RECORD_COLUMNS}) values (?, ?, ?, ?, ?, ?, ?, ?)"
        );
        self.conn
            .execute(
                &sql,
                params![
                    user.into_inner() as i64,
                    record.card_id.into_inner() as i64,
                    record.ease,
                    record.last_reviewed_at.map(|ts| ts.to_string()),
                    record.priority,
                    record.learning,
                    record.sorted,
                    record.to_study,
                ],
            )
            .map_err(db_error)?;
        Ok(())
    }
}
