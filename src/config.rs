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

use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::Path;

use koine_core::EntityKind;
use koine_core::ExerciseMix;
use koine_core::ExerciseType;
use koine_core::PracticeError;
use koine_core::generator::DEFAULT_EXERCISE_COUNT;
use koine_core::generator::DEFAULT_MATCH_PAIRS_BATCH;
use koine_core::generator::DEFAULT_OPTION_COUNT;
use log::debug;
use serde::Deserialize;

use crate::error::Fallible;

pub const CONFIG_FILE: &str = "koine.toml";

/// Match-pairs choices are lettered `a` to `z` in the terminal.
pub const MAX_MATCH_PAIRS_BATCH: usize = 26;

/// The contents of `koine.toml`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub exercise_count: Option<usize>,
    pub option_count: Option<usize>,
    pub match_pairs_batch: Option<usize>,
    pub kinds: Option<Vec<String>>,
    pub mix: Option<BTreeMap<String, u32>>,
}

/// Values given on the command line, which win over the file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub exercise_count: Option<usize>,
    /// Comma-separated kind names.
    pub kinds: Option<String>,
    /// Comma-separated exercise type names, each given weight one.
    pub types: Option<String>,
}

/// Fully resolved practice settings.
#[derive(Debug, PartialEq)]
pub struct Settings {
    pub exercise_count: usize,
    pub option_count: usize,
    pub match_pairs_batch: usize,
    /// Empty means every kind.
    pub kinds: Vec<EntityKind>,
    pub mix: ExerciseMix,
}

/// Read `koine.toml` from the collection directory, if there is one.
pub fn load_config(directory: &Path) -> Fallible<ConfigFile> {
    let path = directory.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    debug!("Reading configuration from {}", path.display());
    let text = read_to_string(&path)?;
    let config: ConfigFile = toml::from_str(&text)?;
    Ok(config)
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

impl Settings {
    pub fn resolve(file: ConfigFile, overrides: Overrides) -> Result<Settings, PracticeError> {
        let kinds: Vec<EntityKind> = match (overrides.kinds, file.kinds) {
            (Some(list), _) => split_list(&list)
                .map(EntityKind::parse)
                .collect::<Result<_, _>>()?,
            (None, Some(names)) => names
                .iter()
                .map(|name| EntityKind::parse(name))
                .collect::<Result<_, _>>()?,
            (None, None) => Vec::new(),
        };
        let mix: ExerciseMix = match (overrides.types, file.mix) {
            (Some(list), _) => {
                let mut mix = ExerciseMix::none();
                for name in split_list(&list) {
                    mix.set_weight(ExerciseType::parse(name)?, 1);
                }
                mix
            }
            (None, Some(weights)) => {
                ExerciseMix::from_named(weights.iter().map(|(name, w)| (name.as_str(), *w)))?
            }
            (None, None) => ExerciseMix::default(),
        };
        let match_pairs_batch = file.match_pairs_batch.unwrap_or(DEFAULT_MATCH_PAIRS_BATCH);
        if match_pairs_batch > MAX_MATCH_PAIRS_BATCH {
            return Err(PracticeError::InvalidConfiguration(format!(
                "match_pairs_batch is {match_pairs_batch}, but at most {MAX_MATCH_PAIRS_BATCH} pairs can be matched."
            )));
        }
        Ok(Settings {
            exercise_count: overrides
                .exercise_count
                .or(file.exercise_count)
                .unwrap_or(DEFAULT_EXERCISE_COUNT),
            option_count: file.option_count.unwrap_or(DEFAULT_OPTION_COUNT),
            match_pairs_batch,
            kinds,
            mix,
        })
    }
}
