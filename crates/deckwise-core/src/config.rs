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

use crate::error::Fallible;
use crate::error::fail;

const DEFAULT_BATCH_SIZE: usize = 20;
const DEFAULT_NEW_CARD_BATCH_SIZE: usize = 10;
const DEFAULT_EASE_MULTIPLIER: u32 = 2;

/// Per-deck scheduling parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeckConfig {
    /// How many already-seen cards to put in a study session.
    pub batch_size: usize,
    /// How many unseen cards to add on top of the seen ones.
    pub new_card_batch_size: usize,
    /// Factor by which ease grows on a correct answer and shrinks on a
    /// wrong one.
    pub ease_multiplier: u32,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            new_card_batch_size: DEFAULT_NEW_CARD_BATCH_SIZE,
            ease_multiplier: DEFAULT_EASE_MULTIPLIER,
        }
    }
}

impl DeckConfig {
    /// Parse a deck configuration from TOML. Missing keys take their
    /// defaults.
    pub fn from_toml(text: &str) -> Fallible<Self> {
        let config: DeckConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Fallible<()> {
        if self.ease_multiplier == 0 {
            return fail("ease_multiplier must be at least 1.");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorReport;

    #[test]
    fn test_defaults() {
        let config = DeckConfig::default();
        assert_eq!(config.batch_size, 20);
        assert_eq!(config.new_card_batch_size, 10);
        assert_eq!(config.ease_multiplier, 2);
    }

    #[test]
    fn test_empty_toml_is_default() -> Fallible<()> {
        assert_eq!(DeckConfig::from_toml("")?, DeckConfig::default());
        Ok(())
    }

    #[test]
    fn test_partial_toml() -> Fallible<()> {
        let config = DeckConfig::from_toml("batch_size = 5\nease_multiplier = 3\n")?;
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.new_card_batch_size, 10);
        assert_eq!(config.ease_multiplier, 3);
        Ok(())
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(DeckConfig::from_toml("card_number = 5\n").is_err());
    }

    #[test]
    fn test_zero_multiplier_rejected() {
        assert_eq!(
            DeckConfig::from_toml("ease_multiplier = 0\n"),
            Err(ErrorReport::new("ease_multiplier must be at least 1."))
        );
    }
}
