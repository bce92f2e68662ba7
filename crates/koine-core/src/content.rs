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

//! Alphabet content: the bundled dataset, content-file parsing, and checks.
//!
//! A content file is a JSON array of entities. Mastery is optional in
//! content files and defaults to zero.

use std::collections::HashSet;
use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::entity::AlphabetEntity;
use crate::types::entity::EntityKind;
use crate::types::entity_id::EntityId;
use crate::types::mastery::MasteryLevel;
use crate::types::mastery::MasteryMap;

const BUNDLED_ALPHABET: &str = include_str!("../data/alphabet.json");

#[derive(Debug, Deserialize)]
struct RawEntity {
    id: EntityId,
    kind: EntityKind,
    ordinal: u32,
    glyph: String,
    uppercase: Option<String>,
    name: String,
    transliteration: String,
    pronunciation: String,
    notes: Option<String>,
    mastery: Option<f64>,
}

/// A problem found in content that still parsed.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentIssue {
    DuplicateId(EntityId),
    DuplicateOrdinal { kind: EntityKind, ordinal: u32 },
    EmptyField { id: EntityId, field: &'static str },
    MasteryOutOfRange { id: EntityId, value: f64 },
}

impl Display for ContentIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentIssue::DuplicateId(id) => write!(f, "duplicate entity id '{id}'"),
            ContentIssue::DuplicateOrdinal { kind, ordinal } => {
                write!(f, "duplicate ordinal {ordinal} among {kind} entities")
            }
            ContentIssue::EmptyField { id, field } => {
                write!(f, "entity '{id}' has an empty {field}")
            }
            ContentIssue::MasteryOutOfRange { id, value } => {
                write!(f, "entity '{id}' has mastery {value} outside [0, 1]")
            }
        }
    }
}

/// The full alphabet shipped with the library.
pub fn bundled_alphabet() -> Fallible<Vec<AlphabetEntity>> {
    parse_content([("alphabet.json", BUNDLED_ALPHABET)])
}

/// Parse content files given as `(filename, text)` pairs. Entities come back
/// sorted by kind, then ordinal.
pub fn parse_content<'a>(
    files: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Fallible<Vec<AlphabetEntity>> {
    let (entities, _) = parse_content_checked(files)?;
    Ok(entities)
}

/// Like [`parse_content`], also reporting the issues found along the way.
pub fn parse_content_checked<'a>(
    files: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Fallible<(Vec<AlphabetEntity>, Vec<ContentIssue>)> {
    let mut issues = Vec::new();
    let mut entities = Vec::new();
    for (filename, text) in files {
        let raw: Vec<RawEntity> = serde_json::from_str(text)
            .map_err(|e| ErrorReport::new(format!("Failed to parse {filename}: {e}")))?;
        for raw in raw {
            let mastery = match raw.mastery {
                Some(value) => {
                    if !MasteryLevel::in_range(value) {
                        issues.push(ContentIssue::MasteryOutOfRange {
                            id: raw.id.clone(),
                            value,
                        });
                    }
                    MasteryLevel::new(value)
                }
                None => MasteryLevel::ZERO,
            };
            entities.push(AlphabetEntity {
                id: raw.id,
                kind: raw.kind,
                ordinal: raw.ordinal,
                glyph: raw.glyph,
                uppercase: raw.uppercase,
                name: raw.name,
                transliteration: raw.transliteration,
                pronunciation: raw.pronunciation,
                notes: raw.notes,
                mastery,
            });
        }
    }
    entities.sort_by(|a, b| (a.kind, a.ordinal).cmp(&(b.kind, b.ordinal)));
    issues.extend(validate_content(&entities));
    Ok((entities, issues))
}

pub fn validate_content(entities: &[AlphabetEntity]) -> Vec<ContentIssue> {
    let mut issues = Vec::new();
    let mut ids: HashSet<&EntityId> = HashSet::new();
    let mut ordinals: HashSet<(EntityKind, u32)> = HashSet::new();
    for entity in entities {
        if !ids.insert(&entity.id) {
            issues.push(ContentIssue::DuplicateId(entity.id.clone()));
        }
        if !ordinals.insert((entity.kind, entity.ordinal)) {
            issues.push(ContentIssue::DuplicateOrdinal {
                kind: entity.kind,
                ordinal: entity.ordinal,
            });
        }
        let fields: [(&'static str, &str); 3] = [
            ("glyph", entity.glyph.as_str()),
            ("transliteration", entity.transliteration.as_str()),
            ("pronunciation", entity.pronunciation.as_str()),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                issues.push(ContentIssue::EmptyField {
                    id: entity.id.clone(),
                    field,
                });
            }
        }
    }
    issues
}

/// The entities of the given kinds. No kinds means every kind.
pub fn filter_kinds(entities: Vec<AlphabetEntity>, kinds: &[EntityKind]) -> Vec<AlphabetEntity> {
    if kinds.is_empty() {
        return entities;
    }
    entities
        .into_iter()
        .filter(|e| kinds.contains(&e.kind))
        .collect()
}

/// Overlay stored mastery levels onto freshly loaded content.
pub fn apply_mastery(entities: Vec<AlphabetEntity>, levels: &MasteryMap) -> Vec<AlphabetEntity> {
    entities
        .into_iter()
        .map(|e| match levels.get(&e.id) {
            Some(level) => e.with_mastery(*level),
            None => e,
        })
        .collect()
}
