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

use crate::error::PracticeError;
use crate::types::entity_id::EntityId;
use crate::types::mastery::MasteryLevel;
use crate::types::mastery::MasteryMap;

/// Durable storage for mastery levels. Entities that were never written read
/// back as zero.
pub trait MasteryStore {
    fn get(&self, id: &EntityId) -> Result<MasteryLevel, PracticeError>;

    fn get_all(&self) -> Result<MasteryMap, PracticeError>;

    fn set(&mut self, id: &EntityId, level: MasteryLevel) -> Result<(), PracticeError>;

    /// Write several levels, in order. Stores with transactions write all of
    /// them or none.
    fn set_all(&mut self, levels: &[(EntityId, MasteryLevel)]) -> Result<(), PracticeError> {
        for (id, level) in levels {
            self.set(id, *level)?;
        }
        Ok(())
    }
}

/// A store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    levels: MasteryMap,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_levels(levels: MasteryMap) -> Self {
        Self { levels }
    }
}

impl MasteryStore for MemoryStore {
    fn get(&self, id: &EntityId) -> Result<MasteryLevel, PracticeError> {
        Ok(self.levels.get(id).copied().unwrap_or_default())
    }

    fn get_all(&self) -> Result<MasteryMap, PracticeError> {
        Ok(self.levels.clone())
    }

    fn set(&mut self, id: &EntityId, level: MasteryLevel) -> Result<(), PracticeError> {
        self.levels.insert(id.clone(), level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_entity_reads_zero() -> Result<(), PracticeError> {
        let store = MemoryStore::new();
        let id = EntityId::new("letter-alpha").unwrap();
        assert_eq!(store.get(&id)?, MasteryLevel::ZERO);
        assert!(store.get_all()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_set_then_get() -> Result<(), PracticeError> {
        let mut store = MemoryStore::new();
        let id = EntityId::new("letter-alpha").unwrap();
        store.set(&id, MasteryLevel::new(0.3))?;
        assert_eq!(store.get(&id)?, MasteryLevel::new(0.3));
        assert_eq!(store.get_all()?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_set_all_writes_in_order() -> Result<(), PracticeError> {
        let mut store = MemoryStore::new();
        let alpha = EntityId::new("letter-alpha").unwrap();
        let beta = EntityId::new("letter-beta").unwrap();
        store.set_all(&[
            (alpha.clone(), MasteryLevel::new(0.1)),
            (beta.clone(), MasteryLevel::new(0.4)),
            (alpha.clone(), MasteryLevel::new(0.2)),
        ])?;
        assert_eq!(store.get(&alpha)?, MasteryLevel::new(0.2));
        assert_eq!(store.get(&beta)?, MasteryLevel::new(0.4));
        Ok(())
    }
}
