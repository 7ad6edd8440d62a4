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
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;

/// Identifies a card. On the wire card ids travel as decimal strings, so
/// that is how they serialize.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardId(u64);

impl CardId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CardId {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(CardId)
            .map_err(|_| ErrorReport::new(format!("invalid card id: '{s}'")))
    }
}

impl TryFrom<String> for CardId {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CardId> for String {
    fn from(id: CardId) -> String {
        id.to_string()
    }
}

/// Identifies the owner of a deck.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct UserId(u64);

impl UserId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_parse() -> Fallible<()> {
        let id: CardId = "2516".parse()?;
        assert_eq!(id, CardId::new(2516));
        Ok(())
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let result: Result<CardId, _> = "abc".parse();
        assert_eq!(
            result.err(),
            Some(ErrorReport::new("invalid card id: 'abc'"))
        );
    }

    #[test]
    fn test_serialize_as_string() -> Fallible<()> {
        let serialized = serde_json::to_string(&CardId::new(5))?;
        assert_eq!(serialized, "\"5\"");
        let id: CardId = serde_json::from_str("\"5\"")?;
        assert_eq!(id, CardId::new(5));
        Ok(())
    }
}
