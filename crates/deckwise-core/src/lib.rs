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

//! deckwise-core: the scheduling and review-outcome engine of deckwise.
//!
//! This library has no I/O of its own. It provides:
//! - The per-user review record and card types
//! - The priority-bucket scheduler that picks the next study batch
//! - Application of graded and triage answers to review records
//! - A `CardStore` trait for persistence, and a session façade over it

pub mod config;
pub mod error;
pub mod outcome;
pub mod presentation;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use config::DeckConfig;
pub use error::{ErrorReport, Fallible, ReviewError, fail};
pub use outcome::{Answer, Outcome, OutcomeBatch, apply_outcome, apply_sort_outcome};
pub use presentation::PresentationCard;
pub use scheduler::{Selection, learning_batch, select_batch};
pub use session::{DeckSession, DeckSummary, DisplayCards};
pub use store::{CardStore, MemoryStore};
pub use types::card::{Card, CardKind};
pub use types::ids::{CardId, UserId};
pub use types::record::ReviewRecord;
pub use types::timestamp::Timestamp;
