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

use std::io::Write;

use koine_core::EntityId;
use log::info;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;

pub async fn reset_mastery<W: Write>(
    directory: Option<String>,
    entity: Option<String>,
    output: &mut W,
) -> Fallible<()> {
    let collection = Collection::open(directory).await?;
    let removed = match entity {
        Some(name) => {
            let id = EntityId::new(name)?;
            if !collection.content.entities.iter().any(|e| e.id == id) {
                return fail(format!("no entity with id '{id}'."));
            }
            collection.db.reset(Some(&id))?
        }
        None => collection.db.reset(None)?,
    };
    info!("Removed {removed} mastery rows.");
    writeln!(output, "Reset {removed} mastery level(s).")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use koine_core::MasteryLevel;
    use koine_core::Timestamp;

    use super::*;
    use crate::helper::create_tmp_collection;

    async fn seeded() -> Fallible<String> {
        let dir = create_tmp_collection()?;
        let collection = Collection::open(Some(dir.display().to_string())).await?;
        let now = Timestamp::now();
        for name in ["letter-alpha", "letter-beta"] {
            collection
                .db
                .set_level(&EntityId::new(name)?, MasteryLevel::new(0.5), now)?;
        }
        Ok(dir.display().to_string())
    }

    #[tokio::test]
    async fn test_reset_one() -> Fallible<()> {
        let dir = seeded().await?;
        let mut output: Vec<u8> = Vec::new();
        reset_mastery(Some(dir.clone()), Some("letter-beta".to_string()), &mut output).await?;
        assert_eq!(String::from_utf8(output).unwrap(), "Reset 1 mastery level(s).\n");
        let collection = Collection::open(Some(dir)).await?;
        let levels = collection.db.levels()?;
        assert_eq!(levels.len(), 1);
        assert!(levels.contains_key(&EntityId::new("letter-alpha")?));
        Ok(())
    }

    #[tokio::test]
    async fn test_reset_all() -> Fallible<()> {
        let dir = seeded().await?;
        let mut output: Vec<u8> = Vec::new();
        reset_mastery(Some(dir.clone()), None, &mut output).await?;
        assert_eq!(String::from_utf8(output).unwrap(), "Reset 2 mastery level(s).\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_entity() -> Fallible<()> {
        let dir = seeded().await?;
        let result = reset_mastery(Some(dir), Some("letter-omega".to_string()), &mut Vec::new()).await;
        assert_eq!(
            result.err().map(|e| e.to_string()),
            Some("error: no entity with id 'letter-omega'.".to_string())
        );
        Ok(())
    }
}
