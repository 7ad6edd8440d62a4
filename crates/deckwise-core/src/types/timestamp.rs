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

use chrono::NaiveDateTime;
use chrono::SubsecRound;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;

const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// A timestamp without a timezone and millisecond precision.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn new(ndt: NaiveDateTime) -> Self {
        Self(ndt.trunc_subsecs(3))
    }

    /// Converts a timestamp into a `NaiveDateTime`.
    pub fn into_inner(self) -> NaiveDateTime {
        self.0
    }

    /// The current timestamp in the user's local time.
    #[cfg(feature = "clock")]
    pub fn now() -> Self {
        Self(chrono::Local::now().naive_local().trunc_subsecs(3))
    }

    /// Milliseconds elapsed from `earlier` to `self`. Negative if `earlier`
    /// is actually later.
    pub fn millis_since(self, earlier: Timestamp) -> i64 {
        (self.0 - earlier.0).num_milliseconds()
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl TryFrom<String> for Timestamp {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let ndt = NaiveDateTime::parse_from_str(&value, FORMAT)
            .map_err(|_| ErrorReport::new(format!("Failed to parse timestamp: '{value}'.")))?;
        Ok(Timestamp(ndt))
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> String {
        ts.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_timestamp_to_string() {
        let ndt = NaiveDateTime::parse_from_str("2023-10-05T14:30:15.123", FORMAT).unwrap();
        let ts = Timestamp(ndt);
        assert_eq!(ts.to_string(), "2023-10-05T14:30:15.123");
    }

    #[test]
    fn test_try_from_string() {
        let ts = Timestamp::try_from("2023-10-05T14:30:15.123".to_string()).unwrap();
        let expected = NaiveDateTime::parse_from_str("2023-10-05T14:30:15.123", FORMAT).unwrap();
        assert_eq!(ts.0, expected);
    }

    #[test]
    fn test_try_from_bad_string() {
        let result = Timestamp::try_from("yesterday".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_millis_since() -> Fallible<()> {
        let a = Timestamp::try_from("2024-01-01T12:00:00.000".to_string())?;
        let b = Timestamp::try_from("2024-01-01T12:00:01.500".to_string())?;
        assert_eq!(b.millis_since(a), 1500);
        assert_eq!(a.millis_since(b), -1500);
        assert_eq!(a.millis_since(a), 0);
        Ok(())
    }

    #[test]
    fn test_serde() -> Fallible<()> {
        let ts: Timestamp = serde_json::from_str("\"2023-10-05T14:30:15.123\"")?;
        assert_eq!(serde_json::to_string(&ts)?, "\"2023-10-05T14:30:15.123\"");
        Ok(())
    }
}
