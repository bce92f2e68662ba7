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

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::error::PracticeError;
use crate::exercise::Exercise;
use crate::exercise::ExerciseType;
use crate::exercise::MatchPair;
use crate::exercise::PracticeSet;
use crate::rng::TinyRng;
use crate::rng::shuffle;
use crate::types::entity::AlphabetEntity;
use crate::types::entity_id::EntityId;

pub const DEFAULT_EXERCISE_COUNT: usize = 10;

/// Choices offered by a select exercise, counting the correct one.
pub const DEFAULT_OPTION_COUNT: usize = 4;

pub const DEFAULT_MATCH_PAIRS_BATCH: usize = 4;

/// Relative weights of the exercise shapes in a practice set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExerciseMix {
    pub select_transliteration: u32,
    pub select_lemma: u32,
    pub match_pairs: u32,
}

impl Default for ExerciseMix {
    fn default() -> Self {
        Self {
            select_transliteration: 2,
            select_lemma: 2,
            match_pairs: 1,
        }
    }
}

impl ExerciseMix {
    /// A mix with no weight on any shape.
    pub fn none() -> Self {
        Self {
            select_transliteration: 0,
            select_lemma: 0,
            match_pairs: 0,
        }
    }

    pub fn weight(&self, ty: ExerciseType) -> u32 {
        match ty {
            ExerciseType::SelectTransliteration => self.select_transliteration,
            ExerciseType::SelectLemma => self.select_lemma,
            ExerciseType::MatchPairs => self.match_pairs,
        }
    }

    pub fn set_weight(&mut self, ty: ExerciseType, weight: u32) {
        match ty {
            ExerciseType::SelectTransliteration => self.select_transliteration = weight,
            ExerciseType::SelectLemma => self.select_lemma = weight,
            ExerciseType::MatchPairs => self.match_pairs = weight,
        }
    }

    /// Build a mix from named weights, e.g. from a configuration file. Shapes
    /// that are not named get weight zero.
    pub fn from_named<'a>(
        entries: impl IntoIterator<Item = (&'a str, u32)>,
    ) -> Result<Self, PracticeError> {
        let mut mix = ExerciseMix::none();
        for (name, weight) in entries {
            mix.set_weight(ExerciseType::parse(name)?, weight);
        }
        Ok(mix)
    }
}

#[derive(Clone, Debug)]
pub struct PracticeConfig {
    /// The entities exercises may be drawn from.
    pub pool: Vec<AlphabetEntity>,
    pub exercise_count: usize,
    pub mix: ExerciseMix,
    pub option_count: usize,
    pub match_pairs_batch: usize,
}

impl PracticeConfig {
    pub fn new(pool: Vec<AlphabetEntity>) -> Self {
        Self {
            pool,
            exercise_count: DEFAULT_EXERCISE_COUNT,
            mix: ExerciseMix::default(),
            option_count: DEFAULT_OPTION_COUNT,
            match_pairs_batch: DEFAULT_MATCH_PAIRS_BATCH,
        }
    }
}

/// Draws pool indices without replacement until the pool is used up, then
/// with replacement.
struct Draw {
    len: usize,
    bag: Vec<usize>,
}

impl Draw {
    fn new(len: usize, rng: &mut TinyRng) -> Self {
        Self {
            len,
            bag: shuffle((0..len).collect(), rng),
        }
    }

    fn next(&mut self, rng: &mut TinyRng) -> usize {
        self.bag.pop().unwrap_or_else(|| rng.index(self.len))
    }

    /// Draw an index satisfying `accept`, or `None` if no index does.
    fn next_where(&mut self, accept: impl Fn(usize) -> bool, rng: &mut TinyRng) -> Option<usize> {
        if let Some(pos) = self.bag.iter().rposition(|&idx| accept(idx)) {
            return Some(self.bag.remove(pos));
        }
        let rest: Vec<usize> = (0..self.len).filter(|&idx| accept(idx)).collect();
        if rest.is_empty() {
            None
        } else {
            Some(rest[rng.index(rest.len())])
        }
    }
}

/// Generate the exercises for one practice session.
pub fn generate_practice_set(
    config: &PracticeConfig,
    rng: &mut TinyRng,
) -> Result<PracticeSet, PracticeError> {
    let pool: &[AlphabetEntity] = &config.pool;
    if pool.is_empty() {
        return Err(PracticeError::EmptyContentPool);
    }
    if config.exercise_count == 0 {
        return Err(PracticeError::InvalidConfiguration(
            "the exercise count must be at least one.".to_string(),
        ));
    }
    if config.option_count < 2 {
        return Err(PracticeError::InvalidConfiguration(
            "select exercises need at least two options.".to_string(),
        ));
    }
    if config.mix.match_pairs > 0 && config.match_pairs_batch < 2 {
        return Err(PracticeError::InvalidConfiguration(
            "match-pairs exercises need a batch of at least two.".to_string(),
        ));
    }

    // Matching needs at least two entities.
    let weights: Vec<u32> = ExerciseType::ALL
        .iter()
        .map(|ty| match ty {
            ExerciseType::MatchPairs if pool.len() < 2 => 0,
            ty => config.mix.weight(*ty),
        })
        .collect();
    if weights.iter().all(|w| *w == 0) {
        return Err(PracticeError::InvalidConfiguration(
            "no exercise type has a positive weight.".to_string(),
        ));
    }

    let mut draw = Draw::new(pool.len(), rng);
    let mut exercises: Vec<Exercise> = Vec::with_capacity(config.exercise_count);
    for _ in 0..config.exercise_count {
        let choice = rng.choose_weighted(&weights).ok_or_else(|| {
            PracticeError::InvalidConfiguration("no exercise type could be chosen.".to_string())
        })?;
        let exercise = match ExerciseType::ALL[choice] {
            ExerciseType::SelectTransliteration => {
                let target = draw.next(rng);
                let options = select_options(pool, target, config.option_count, rng, |e| {
                    e.transliteration.as_str()
                });
                Exercise::SelectTransliteration {
                    target: pool[target].id.clone(),
                    options,
                }
            }
            ExerciseType::SelectLemma => {
                let target = draw.next(rng);
                let options =
                    select_options(pool, target, config.option_count, rng, |e| e.glyph.as_str());
                Exercise::SelectLemma {
                    target: pool[target].id.clone(),
                    options,
                }
            }
            ExerciseType::MatchPairs => {
                match_pairs(pool, &mut draw, config.match_pairs_batch, rng)
            }
        };
        exercises.push(exercise);
    }
    Ok(PracticeSet::new(exercises))
}

/// The shuffled options for a select exercise: the target plus up to
/// `option_count - 1` distractors. Distractors never share the target's
/// displayed `label`, nor each other's.
fn select_options<'a>(
    pool: &'a [AlphabetEntity],
    target: usize,
    option_count: usize,
    rng: &mut TinyRng,
    label: impl Fn(&'a AlphabetEntity) -> &'a str,
) -> Vec<EntityId> {
    let target_entity = &pool[target];
    let mut seen: HashSet<&str> = HashSet::from([label(target_entity)]);
    let candidates: Vec<usize> = (0..pool.len())
        .filter(|&idx| pool[idx].id != target_entity.id)
        .collect();
    let mut options = vec![target_entity.id.clone()];
    for idx in shuffle(candidates, rng) {
        if options.len() >= option_count {
            break;
        }
        let entity = &pool[idx];
        if seen.insert(label(entity)) && !options.contains(&entity.id) {
            options.push(entity.id.clone());
        }
    }
    shuffle(options, rng)
}

fn match_pairs(
    pool: &[AlphabetEntity],
    draw: &mut Draw,
    batch: usize,
    rng: &mut TinyRng,
) -> Exercise {
    let batch = batch.min(pool.len());
    let mut chosen: Vec<usize> = vec![draw.next(rng)];
    while chosen.len() < batch {
        // Prefer entities whose transliteration is not on the board yet, so
        // every pairing is unambiguous.
        let fresh = |idx: usize| {
            chosen.iter().all(|&c| {
                c != idx
                    && pool[c].id != pool[idx].id
                    && pool[c].transliteration != pool[idx].transliteration
            })
        };
        let next = match draw.next_where(fresh, rng) {
            Some(idx) => Some(idx),
            None => draw.next_where(|idx| !chosen.contains(&idx), rng),
        };
        match next {
            Some(idx) => chosen.push(idx),
            None => break,
        }
    }
    let pairs: Vec<MatchPair> = chosen
        .iter()
        .map(|&idx| MatchPair {
            entity: pool[idx].id.clone(),
            transliteration: pool[idx].transliteration.clone(),
        })
        .collect();
    let choices: Vec<String> = shuffle(
        pairs.iter().map(|p| p.transliteration.clone()).collect(),
        rng,
    );
    Exercise::MatchPairs { pairs, choices }
}
