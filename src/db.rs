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

use std::path::Path;

use koine_core::EntityId;
use koine_core::MasteryLevel;
use koine_core::MasteryMap;
use koine_core::MasteryStore;
use koine_core::PracticeError;
use koine_core::Timestamp;
use koine_core::session::SessionSummary;
use log::debug;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::params;

use crate::error::ErrorReport;
use crate::error::Fallible;

const SCHEMA: &str = "
create table if not exists mastery (
    entity_id text primary key,
    level real not null,
    updated_at text not null
) strict;

create table if not exists sessions (
    session_id integer primary key autoincrement,
    started_at text not null,
    ended_at text not null,
    exercises integer not null,
    correct integer not null,
    incorrect integer not null
) strict;
";

/// A finished session as recorded in the database.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionRow {
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    pub exercises: usize,
    pub correct: usize,
    pub incorrect: usize,
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Fallible<Self> {
        debug!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Fallible<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Fallible<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub fn level(&self, id: &EntityId) -> Fallible<MasteryLevel> {
        let level: Option<f64> = self
            .conn
            .query_row(
                "select level from mastery where entity_id = ?1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(level.map(MasteryLevel::new).unwrap_or_default())
    }

    pub fn levels(&self) -> Fallible<MasteryMap> {
        let mut stmt = self.conn.prepare("select entity_id, level from mastery")?;
        let rows = stmt.query_map([], |row| {
            let id: String = row.get(0)?;
            let level: f64 = row.get(1)?;
            Ok((id, level))
        })?;
        let mut levels = MasteryMap::new();
        for row in rows {
            let (id, level) = row?;
            let id = EntityId::new(id).map_err(ErrorReport::from)?;
            levels.insert(id, MasteryLevel::new(level));
        }
        Ok(levels)
    }

    pub fn set_level(&self, id: &EntityId, level: MasteryLevel, now: Timestamp) -> Fallible<()> {
        self.conn.execute(
            "insert into mastery (entity_id, level, updated_at) values (?1, ?2, ?3)
             on conflict (entity_id) do update set level = excluded.level, updated_at = excluded.updated_at",
            params![id.as_str(), level.value(), now.to_string()],
        )?;
        Ok(())
    }

    /// Write several levels in one transaction. On failure nothing is saved.
    pub fn set_levels(
        &mut self,
        levels: &[(EntityId, MasteryLevel)],
        now: Timestamp,
    ) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "insert into mastery (entity_id, level, updated_at) values (?1, ?2, ?3)
                 on conflict (entity_id) do update set level = excluded.level, updated_at = excluded.updated_at",
            )?;
            let now = now.to_string();
            for (id, level) in levels {
                stmt.execute(params![id.as_str(), level.value(), now])?;
            }
        }
        tx.commit()?;
        debug!("Wrote {} mastery levels in one transaction", levels.len());
        Ok(())
    }

    /// Forget the mastery of one entity, or of every entity. Returns the
    /// number of rows removed.
    pub fn reset(&self, id: Option<&EntityId>) -> Fallible<usize> {
        let removed = match id {
            Some(id) => self.conn.execute(
                "delete from mastery where entity_id = ?1",
                params![id.as_str()],
            )?,
            None => self.conn.execute("delete from mastery", [])?,
        };
        Ok(removed)
    }

    pub fn record_session(
        &self,
        started_at: Timestamp,
        ended_at: Timestamp,
        summary: &SessionSummary,
    ) -> Fallible<()> {
        self.conn.execute(
            "insert into sessions (started_at, ended_at, exercises, correct, incorrect)
             values (?1, ?2, ?3, ?4, ?5)",
            params![
                started_at.to_string(),
                ended_at.to_string(),
                summary.answered as i64,
                summary.correct as i64,
                summary.incorrect as i64,
            ],
        )?;
        Ok(())
    }

    pub fn sessions(&self) -> Fallible<Vec<SessionRow>> {
        let mut stmt = self.conn.prepare(
            "select started_at, ended_at, exercises, correct, incorrect
             from sessions order by session_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;
        let mut sessions = Vec::new();
        for row in rows {
            let (started_at, ended_at, exercises, correct, incorrect) = row?;
            sessions.push(SessionRow {
                started_at: Timestamp::try_from(started_at)?,
                ended_at: Timestamp::try_from(ended_at)?,
                exercises: exercises as usize,
                correct: correct as usize,
                incorrect: incorrect as usize,
            });
        }
        Ok(sessions)
    }
}

impl MasteryStore for Database {
    fn get(&self, id: &EntityId) -> Result<MasteryLevel, PracticeError> {
        self.level(id)
            .map_err(|e| PracticeError::PersistenceFailure(e.to_string()))
    }

    fn get_all(&self) -> Result<MasteryMap, PracticeError> {
        self.levels()
            .map_err(|e| PracticeError::PersistenceFailure(e.to_string()))
    }

    fn set(&mut self, id: &EntityId, level: MasteryLevel) -> Result<(), PracticeError> {
        self.set_level(id, level, Timestamp::now())
            .map_err(|e| PracticeError::PersistenceFailure(e.to_string()))
    }

    fn set_all(&mut self, levels: &[(EntityId, MasteryLevel)]) -> Result<(), PracticeError> {
        self.set_levels(levels, Timestamp::now())
            .map_err(|e| PracticeError::PersistenceFailure(e.to_string()))
    }
}
