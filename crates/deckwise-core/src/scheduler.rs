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

//! Selection of the active study batch.
//!
//! Seen cards are keyed by how long after the oldest review they were last
//! reviewed, scaled by their ease. A small key means the card was reviewed
//! long ago relative to its difficulty, so it is due sooner. Ease acts as a
//! decay multiplier: well-known cards need a proportionally older review to
//! compete with hard ones.

use std::collections::BTreeMap;

use crate::config::DeckConfig;
use crate::types::record::ReviewRecord;
use crate::types::timestamp::Timestamp;

/// How many records a call to [`select_batch`] marked as learning, by
/// source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Seen cards taken from the bucket queue.
    pub due: usize,
    /// Unseen cards.
    pub new: usize,
}

/// Marks the records that make up the next study session as learning.
///
/// Records with `to_study` cleared are never touched. Buckets of records
/// sharing a key are taken whole, so the number of due cards may exceed
/// `batch_size`.
pub fn select_batch(records: &mut [ReviewRecord], config: &DeckConfig) -> Selection {
    let (seen, unseen): (Vec<usize>, Vec<usize>) = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.to_study)
        .map(|(idx, _)| idx)
        .partition(|&idx| records[idx].is_seen());

    let min_time: Option<Timestamp> = seen
        .iter()
        .filter_map(|&idx| records[idx].last_reviewed_at)
        .min();
    let Some(min_time) = min_time else {
        // Nothing has been studied yet: the session is the head of the deck.
        let mut new = 0;
        for &idx in unseen.iter().take(config.batch_size) {
            records[idx].learning = true;
            new += 1;
        }
        log::debug!("No seen cards, selected {new} unseen cards");
        return Selection { due: 0, new };
    };

    let mut buckets: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for &idx in seen.iter() {
        let record = &mut records[idx];
        if let Some(last_reviewed_at) = record.last_reviewed_at {
            let delta = last_reviewed_at.millis_since(min_time);
            let key = delta.saturating_mul(i64::from(record.ease));
            buckets.entry(key).or_default().push(idx);
        }
        if !record.priority {
            record.learning = false;
        }
    }
    log::debug!(
        "Grouped {} seen cards into {} buckets",
        seen.len(),
        buckets.len()
    );

    let mut due = 0;
    while due < config.batch_size {
        let Some((_, bucket)) = buckets.pop_first() else {
            break;
        };
        for idx in bucket {
            records[idx].learning = true;
            due += 1;
        }
    }

    let mut new = 0;
    for &idx in unseen.iter().take(config.new_card_batch_size) {
        records[idx].learning = true;
        new += 1;
    }

    log::debug!("Selected {due} due cards and {new} new cards");
    Selection { due, new }
}

/// Returns the active study batch, selecting a fresh one first if no record
/// is currently learning. Calling this repeatedly without recording any
/// outcome returns the same batch.
pub fn learning_batch<'a>(
    records: &'a mut [ReviewRecord],
    config: &DeckConfig,
) -> Vec<&'a ReviewRecord> {
    if !records.iter().any(|record| record.learning) {
        select_batch(records, config);
    }
    let records: &'a [ReviewRecord] = records;
    records.iter().filter(|record| record.learning).collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::types::ids::CardId;

    fn make_timestamp(s: &str) -> Timestamp {
        let ndt = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.3f").unwrap();
        Timestamp::new(ndt)
    }

    fn unseen(id: u64) -> ReviewRecord {
        ReviewRecord::new(CardId::new(id))
    }

    fn seen(id: u64, at: &str, ease: u32) -> ReviewRecord {
        ReviewRecord {
            ease,
            last_reviewed_at: Some(make_timestamp(at)),
            ..ReviewRecord::new(CardId::new(id))
        }
    }

    fn config(batch_size: usize, new_card_batch_size: usize) -> DeckConfig {
        DeckConfig {
            batch_size,
            new_card_batch_size,
            ease_multiplier: 2,
        }
    }

    fn learning_ids(records: &[ReviewRecord]) -> Vec<u64> {
        records
            .iter()
            .filter(|r| r.learning)
            .map(|r| r.card_id.into_inner())
            .collect()
    }

    #[test]
    fn test_empty_deck() {
        let mut records: Vec<ReviewRecord> = Vec::new();
        let selection = select_batch(&mut records, &DeckConfig::default());
        assert_eq!(selection, Selection::default());
        assert!(learning_batch(&mut records, &DeckConfig::default()).is_empty());
    }

    #[test]
    fn test_all_unseen_takes_head_of_deck() {
        let mut records = vec![unseen(1), unseen(2), unseen(3)];
        let selection = select_batch(&mut records, &config(2, 10));
        assert_eq!(selection, Selection { due: 0, new: 2 });
        assert_eq!(learning_ids(&records), vec![1, 2]);
        assert!(!records[2].learning);
        assert!(!records[2].is_seen());
    }

    #[test]
    fn test_all_unseen_never_exceeds_deck() {
        for batch_size in 0..6 {
            let mut records = vec![unseen(1), unseen(2), unseen(3)];
            let selection = select_batch(&mut records, &config(batch_size, 0));
            let expected = batch_size.min(3);
            assert_eq!(selection.new, expected);
            let ids: Vec<u64> = (1..=expected as u64).collect();
            assert_eq!(learning_ids(&records), ids);
        }
    }

    #[test]
    fn test_smallest_key_first() {
        // Keys: a = 0, b = 100s * 1, c = 50s * 4 = 200s.
        let mut records = vec![
            seen(1, "2024-01-01T12:00:00.000", 1),
            seen(2, "2024-01-01T12:01:40.000", 1),
            seen(3, "2024-01-01T12:00:50.000", 4),
        ];
        let selection = select_batch(&mut records, &config(2, 10));
        assert_eq!(selection, Selection { due: 2, new: 0 });
        assert_eq!(learning_ids(&records), vec![1, 2]);
    }

    #[test]
    fn test_ties_are_never_split() {
        let mut records = vec![
            seen(1, "2024-01-01T12:00:00.000", 1),
            seen(2, "2024-01-02T12:00:00.000", 2),
            seen(3, "2024-01-02T12:00:00.000", 2),
            seen(4, "2024-01-03T12:00:00.000", 2),
        ];
        let selection = select_batch(&mut records, &config(2, 10));
        // The first bucket holds card 1; the second holds 2 and 3 and is
        // taken whole even though it overshoots.
        assert_eq!(selection.due, 3);
        assert_eq!(learning_ids(&records), vec![1, 2, 3]);
    }

    #[test]
    fn test_non_priority_learning_is_cleared() {
        let mut far = seen(3, "2024-01-09T12:00:00.000", 1);
        far.learning = true;
        let mut urgent = seen(4, "2024-01-09T12:00:00.000", 8);
        urgent.learning = true;
        urgent.priority = true;
        let mut records = vec![
            seen(1, "2024-01-01T12:00:00.000", 1),
            seen(2, "2024-01-02T12:00:00.000", 1),
            far,
            urgent,
        ];
        select_batch(&mut records, &config(2, 10));
        assert_eq!(learning_ids(&records), vec![1, 2, 4]);
    }

    #[test]
    fn test_new_cards_are_added_independently() {
        let mut records = vec![
            unseen(1),
            seen(2, "2024-01-01T12:00:00.000", 1),
            unseen(3),
            seen(4, "2024-01-02T12:00:00.000", 1),
            unseen(5),
        ];
        let selection = select_batch(&mut records, &config(2, 2));
        assert_eq!(selection, Selection { due: 2, new: 2 });
        assert_eq!(learning_ids(&records), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_zero_batch_sizes_select_nothing() {
        let mut records = vec![seen(1, "2024-01-01T12:00:00.000", 1), unseen(2)];
        let selection = select_batch(&mut records, &config(0, 0));
        assert_eq!(selection, Selection::default());
        assert!(learning_ids(&records).is_empty());
    }

    #[test]
    fn test_set_aside_records_are_ignored() {
        let mut aside = seen(1, "2024-01-01T12:00:00.000", 1);
        aside.to_study = false;
        let mut aside_new = unseen(2);
        aside_new.to_study = false;
        let mut records = vec![
            aside,
            aside_new,
            seen(3, "2024-01-02T12:00:00.000", 1),
            unseen(4),
        ];
        select_batch(&mut records, &config(5, 5));
        assert_eq!(learning_ids(&records), vec![3, 4]);
    }

    #[test]
    fn test_learning_batch_is_memoized() {
        let mut records = vec![
            seen(1, "2024-01-01T12:00:00.000", 1),
            seen(2, "2024-01-02T12:00:00.000", 1),
            seen(3, "2024-01-03T12:00:00.000", 1),
            unseen(4),
        ];
        let config = config(1, 1);
        let first: Vec<CardId> = learning_batch(&mut records, &config)
            .into_iter()
            .map(|r| r.card_id)
            .collect();
        let second: Vec<CardId> = learning_batch(&mut records, &config)
            .into_iter()
            .map(|r| r.card_id)
            .collect();
        assert_eq!(first, vec![CardId::new(1), CardId::new(4)]);
        assert_eq!(first, second);
    }
}
