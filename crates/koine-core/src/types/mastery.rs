// Copyright 2025 The koine Authors
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

use std::collections::HashMap;
use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::types::entity_id::EntityId;

/// How well the learner knows an entity, always in `[0, 1]`.
///
/// Construction clamps, so out-of-range and NaN inputs never escape.
#[derive(Clone, Copy, PartialEq, PartialOrd, Debug, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct MasteryLevel(f64);

/// The mastery level at which an entity counts as learned.
pub const MASTERED_THRESHOLD: f64 = 0.8;

impl MasteryLevel {
    pub const ZERO: MasteryLevel = MasteryLevel(0.0);
    pub const FULL: MasteryLevel = MasteryLevel(1.0);

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_mastered(self) -> bool {
        self.0 >= MASTERED_THRESHOLD
    }

    /// Whether a raw value is already inside the valid range.
    pub fn in_range(value: f64) -> bool {
        (0.0..=1.0).contains(&value)
    }
}

impl From<f64> for MasteryLevel {
    fn from(value: f64) -> Self {
        MasteryLevel::new(value)
    }
}

impl From<MasteryLevel> for f64 {
    fn from(level: MasteryLevel) -> f64 {
        level.0
    }
}

impl Display for MasteryLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}%", self.0 * 100.0)
    }
}

/// The durable mapping from entity to mastery level. Missing entities have
/// mastery zero.
pub type MasteryMap = HashMap<EntityId, MasteryLevel>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps() {
        assert_eq!(MasteryLevel::new(1.5).value(), 1.0);
        assert_eq!(MasteryLevel::new(-0.2).value(), 0.0);
        assert_eq!(MasteryLevel::new(f64::NAN).value(), 0.0);
        assert_eq!(MasteryLevel::new(0.25).value(), 0.25);
    }

    #[test]
    fn test_display() {
        assert_eq!(MasteryLevel::new(0.35).to_string(), "35%");
        assert_eq!(MasteryLevel::FULL.to_string(), "100%");
    }

    #[test]
    fn test_deserialize_clamps() {
        let level: MasteryLevel = serde_json::from_str("1.7").unwrap();
        assert_eq!(level, MasteryLevel::FULL);
    }
}
