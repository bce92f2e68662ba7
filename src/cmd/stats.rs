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
use std::io::Write;

use clap::ValueEnum;
use koine_core::AlphabetEntity;
use koine_core::EntityKind;
use koine_core::MasteryLevel;
use serde::Serialize;

use crate::collection::Collection;
use crate::db::SessionRow;
use crate::error::Fallible;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum StatsFormat {
    Text,
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
pub struct Stats {
    pub entities: Vec<EntityStats>,
    pub kinds: Vec<KindStats>,
    pub sessions: SessionStats,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct EntityStats {
    pub id: String,
    pub kind: EntityKind,
    pub glyph: String,
    pub name: String,
    pub mastery: f64,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct KindStats {
    pub kind: EntityKind,
    pub count: usize,
    pub average_mastery: f64,
    pub mastered: usize,
}

#[derive(Serialize, Debug, Default, PartialEq)]
pub struct SessionStats {
    pub count: usize,
    pub exercises: usize,
    pub correct: usize,
    pub incorrect: usize,
}

pub fn compute_stats(entities: &[AlphabetEntity], sessions: &[SessionRow]) -> Stats {
    let per_entity = entities
        .iter()
        .map(|e| EntityStats {
            id: e.id.to_string(),
            kind: e.kind,
            glyph: e.display_glyph(),
            name: e.name.clone(),
            mastery: e.mastery.value(),
        })
        .collect();
    let kinds = EntityKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let of_kind: Vec<&AlphabetEntity> =
                entities.iter().filter(|e| e.kind == kind).collect();
            if of_kind.is_empty() {
                return None;
            }
            let total: f64 = of_kind.iter().map(|e| e.mastery.value()).sum();
            Some(KindStats {
                kind,
                count: of_kind.len(),
                average_mastery: total / of_kind.len() as f64,
                mastered: of_kind.iter().filter(|e| e.mastery.is_mastered()).count(),
            })
        })
        .collect();
    let sessions = sessions.iter().fold(SessionStats::default(), |acc, s| SessionStats {
        count: acc.count + 1,
        exercises: acc.exercises + s.exercises,
        correct: acc.correct + s.correct,
        incorrect: acc.incorrect + s.incorrect,
    });
    Stats {
        entities: per_entity,
        kinds,
        sessions,
    }
}

pub async fn print_stats<W: Write>(
    directory: Option<String>,
    format: StatsFormat,
    output: &mut W,
) -> Fallible<()> {
    let collection = Collection::open(directory).await?;
    let stats = compute_stats(&collection.entities()?, &collection.db.sessions()?);
    match format {
        StatsFormat::Text => write_text(&stats, output)?,
        StatsFormat::Json => {
            serde_json::to_writer_pretty(&mut *output, &stats)?;
            writeln!(output)?;
        }
    }
    Ok(())
}

fn write_text<W: Write>(stats: &Stats, output: &mut W) -> Fallible<()> {
    for kind in &stats.kinds {
        writeln!(
            output,
            "{}: {} of {} mastered, average {}",
            kind.kind,
            kind.mastered,
            kind.count,
            MasteryLevel::new(kind.average_mastery)
        )?;
        for entity in stats.entities.iter().filter(|e| e.kind == kind.kind) {
            writeln!(
                output,
                "  {:<8} {:<20} {}",
                entity.glyph,
                entity.name,
                MasteryLevel::new(entity.mastery)
            )?;
        }
    }
    let s = &stats.sessions;
    writeln!(
        output,
        "Sessions: {} ({} exercises, {} correct, {} incorrect)",
        s.count, s.exercises, s.correct, s.incorrect
    )?;
    Ok(())
}
