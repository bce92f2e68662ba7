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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::error::PracticeError;
use crate::types::entity_id::EntityId;
use crate::types::mastery::MasteryLevel;

/// The kinds of alphabet content, in the order they are taught.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Letter,
    Diphthong,
    ImproperDiphthong,
    BreathingMark,
    AccentMark,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Letter,
        EntityKind::Diphthong,
        EntityKind::ImproperDiphthong,
        EntityKind::BreathingMark,
        EntityKind::AccentMark,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Letter => "letter",
            EntityKind::Diphthong => "diphthong",
            EntityKind::ImproperDiphthong => "improper_diphthong",
            EntityKind::BreathingMark => "breathing_mark",
            EntityKind::AccentMark => "accent_mark",
        }
    }

    pub fn parse(name: &str) -> Result<Self, PracticeError> {
        let name = name.trim().replace('-', "_");
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| PracticeError::InvalidConfiguration(format!("unknown kind '{name}'.")))
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One unit of alphabet content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlphabetEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Position within its kind, starting at 1.
    pub ordinal: u32,
    /// The lowercase form, or the mark itself on a carrier vowel.
    pub glyph: String,
    pub uppercase: Option<String>,
    pub name: String,
    pub transliteration: String,
    pub pronunciation: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub mastery: MasteryLevel,
}

impl AlphabetEntity {
    /// The glyph as shown on a prompt: both cases for letters.
    pub fn display_glyph(&self) -> String {
        match &self.uppercase {
            Some(upper) => format!("{upper} {}", self.glyph),
            None => self.glyph.clone(),
        }
    }

    pub fn with_mastery(self, mastery: MasteryLevel) -> Self {
        Self { mastery, ..self }
    }
}
