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

//! A practice session: grading, scoring, and the capped write-back.
//!
//! Scoring during a session only touches the session's own running levels.
//! Nothing reaches the store until [`PracticeSession::finish`], which applies
//! the session cap relative to the levels captured at the start.

use crate::error::Fallible;
use crate::error::PracticeError;
use crate::error::fail;
use crate::exercise::Exercise;
use crate::exercise::ExerciseType;
use crate::exercise::PracticeSet;
use crate::exercise::Response;
use crate::scoring::apply_session_cap;
use crate::scoring::score_answer;
use crate::store::MasteryStore;
use crate::types::entity_id::EntityId;
use crate::types::mastery::MasteryLevel;
use crate::types::mastery::MasteryMap;

/// The result for one target of an answered exercise.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityResult {
    pub entity: EntityId,
    pub correct: bool,
    pub before: MasteryLevel,
    pub after: MasteryLevel,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub exercise_type: ExerciseType,
    pub results: Vec<EntityResult>,
}

impl Outcome {
    /// Whether every target was answered correctly.
    pub fn all_correct(&self) -> bool {
        self.results.iter().all(|r| r.correct)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub answered: usize,
    pub skipped: usize,
    /// Targets answered correctly, counting each match-pairs entity.
    pub correct: usize,
    pub incorrect: usize,
    /// The capped levels that were written to the store.
    pub levels: MasteryMap,
}

pub struct PracticeSession {
    set: PracticeSet,
    cursor: usize,
    initial: MasteryMap,
    updated: MasteryMap,
    answered: usize,
    skipped: usize,
    correct: usize,
    incorrect: usize,
}

impl PracticeSession {
    /// Start a session. `initial` is the mastery map as of session start.
    pub fn new(set: PracticeSet, initial: MasteryMap) -> Self {
        Self {
            set,
            cursor: 0,
            initial,
            updated: MasteryMap::new(),
            answered: 0,
            skipped: 0,
            correct: 0,
            incorrect: 0,
        }
    }

    /// The exercise to answer next, or `None` once the set is exhausted.
    pub fn current(&self) -> Option<&Exercise> {
        self.set.get(self.cursor)
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.set.len()
    }

    pub fn progress(&self) -> Progress {
        let done = self.cursor.min(self.set.len());
        Progress {
            total: self.set.len(),
            answered: done,
            remaining: self.set.len() - done,
        }
    }

    /// The running level of an entity within this session.
    pub fn level(&self, id: &EntityId) -> MasteryLevel {
        self.updated
            .get(id)
            .or_else(|| self.initial.get(id))
            .copied()
            .unwrap_or_default()
    }

    /// Levels of the entities touched so far, before the session cap.
    pub fn updated_levels(&self) -> &MasteryMap {
        &self.updated
    }

    /// Score one answer for one entity against its running level.
    pub fn score_answer(
        &mut self,
        entity: &EntityId,
        exercise_type: ExerciseType,
        is_correct: bool,
    ) -> MasteryLevel {
        let after = score_answer(exercise_type, is_correct, self.level(entity));
        self.updated.insert(entity.clone(), after);
        after
    }

    /// Grade a response to the current exercise, score its targets, and move
    /// on. On error nothing is scored and the session stays put.
    pub fn answer(&mut self, response: &Response) -> Fallible<Outcome> {
        let Some(exercise) = self.current() else {
            return fail("the session has no exercises left.");
        };
        let exercise_type = exercise.exercise_type();
        let graded: Vec<(EntityId, bool)> = exercise.grade(response)?;
        let mut results = Vec::with_capacity(graded.len());
        for (entity, correct) in graded {
            let before = self.level(&entity);
            let after = self.score_answer(&entity, exercise_type, correct);
            if correct {
                self.correct += 1;
            } else {
                self.incorrect += 1;
            }
            results.push(EntityResult {
                entity,
                correct,
                before,
                after,
            });
        }
        self.answered += 1;
        self.cursor += 1;
        Ok(Outcome {
            exercise_type,
            results,
        })
    }

    /// Move past the current exercise without scoring it.
    pub fn skip(&mut self) {
        if !self.is_finished() {
            self.skipped += 1;
            self.cursor += 1;
        }
    }

    /// End the session: cap the increases and write every touched entity.
    pub fn finish<S: MasteryStore + ?Sized>(
        self,
        store: &mut S,
    ) -> Result<SessionSummary, PracticeError> {
        let levels = apply_session_cap_and_persist(&self.initial, &self.updated, store)?;
        Ok(SessionSummary {
            answered: self.answered,
            skipped: self.skipped,
            correct: self.correct,
            incorrect: self.incorrect,
            levels,
        })
    }
}

/// Cap each entity's net increase against `initial` and write the result in
/// id order, as one `set_all` batch.
pub fn apply_session_cap_and_persist<S: MasteryStore + ?Sized>(
    initial: &MasteryMap,
    updated: &MasteryMap,
    store: &mut S,
) -> Result<MasteryMap, PracticeError> {
    let capped: MasteryMap = apply_session_cap(initial, updated);
    let mut writes: Vec<(EntityId, MasteryLevel)> =
        capped.iter().map(|(id, level)| (id.clone(), *level)).collect();
    writes.sort_by(|a, b| a.0.cmp(&b.0));
    store.set_all(&writes)?;
    Ok(capped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::MatchPair;
    use crate::store::MemoryStore;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn id(s: &str) -> EntityId {
        EntityId::new(s).unwrap()
    }

    fn transliteration(target: &str) -> Exercise {
        Exercise::SelectTransliteration {
            target: id(target),
            options: vec![id("alpha"), id("beta"), id("gamma")],
        }
    }

    /// A store whose writes always fail.
    struct BrokenStore;

    impl MasteryStore for BrokenStore {
        fn get(&self, _: &EntityId) -> Result<MasteryLevel, PracticeError> {
            Ok(MasteryLevel::ZERO)
        }

        fn get_all(&self) -> Result<MasteryMap, PracticeError> {
            Ok(MasteryMap::new())
        }

        fn set(&mut self, _: &EntityId, _: MasteryLevel) -> Result<(), PracticeError> {
            Err(PracticeError::PersistenceFailure("disk full".to_string()))
        }
    }

    #[test]
    fn test_repeated_entity_gets_one_cap() -> Result<(), PracticeError> {
        let set = PracticeSet::new(vec![
            transliteration("alpha"),
            transliteration("alpha"),
            transliteration("alpha"),
        ]);
        let mut store = MemoryStore::new();
        let mut session = PracticeSession::new(set, store.get_all()?);
        for _ in 0..3 {
            let outcome = session.answer(&Response::Choice(id("alpha"))).unwrap();
            assert!(outcome.all_correct());
        }
        assert!(session.is_finished());
        assert!(approx_eq(session.level(&id("alpha")).value(), 0.3));
        let summary = session.finish(&mut store)?;
        assert_eq!(summary.correct, 3);
        assert!(approx_eq(store.get(&id("alpha"))?.value(), 0.2));
        Ok(())
    }

    #[test]
    fn test_decrease_is_not_capped() -> Result<(), PracticeError> {
        let alpha = id("alpha");
        let mut store = MemoryStore::with_levels(MasteryMap::from([(
            alpha.clone(),
            MasteryLevel::new(0.5),
        )]));
        let set = PracticeSet::new(vec![transliteration("alpha")]);
        let mut session = PracticeSession::new(set, store.get_all()?);
        let outcome = session.answer(&Response::Choice(id("beta"))).unwrap();
        assert!(!outcome.all_correct());
        assert_eq!(outcome.results[0].before, MasteryLevel::new(0.5));
        let summary = session.finish(&mut store)?;
        assert_eq!(summary.incorrect, 1);
        assert!(approx_eq(store.get(&alpha)?.value(), 0.35));
        Ok(())
    }

    #[test]
    fn test_wrong_shape_does_not_advance() {
        let set = PracticeSet::new(vec![transliteration("alpha")]);
        let mut session = PracticeSession::new(set, MasteryMap::new());
        assert!(session.answer(&Response::Pairs(vec![])).is_err());
        assert_eq!(session.progress().answered, 0);
        assert!(session.updated_levels().is_empty());
    }

    #[test]
    fn test_answer_after_end() {
        let mut session = PracticeSession::new(PracticeSet::default(), MasteryMap::new());
        assert!(session.current().is_none());
        assert!(session.answer(&Response::Choice(id("alpha"))).is_err());
    }

    #[test]
    fn test_match_pairs_scores_each_target() -> Result<(), PracticeError> {
        let set = PracticeSet::new(vec![Exercise::MatchPairs {
            pairs: vec![
                MatchPair {
                    entity: id("alpha"),
                    transliteration: "a".to_string(),
                },
                MatchPair {
                    entity: id("beta"),
                    transliteration: "b".to_string(),
                },
            ],
            choices: vec!["b".to_string(), "a".to_string()],
        }]);
        let initial = MasteryMap::from([(id("beta"), MasteryLevel::new(0.5))]);
        let mut session = PracticeSession::new(set, initial);
        let outcome = session
            .answer(&Response::Pairs(vec![
                (id("alpha"), "a".to_string()),
                (id("beta"), "a".to_string()),
            ]))
            .unwrap();
        assert_eq!(outcome.exercise_type, ExerciseType::MatchPairs);
        assert!(approx_eq(outcome.results[0].after.value(), 0.05));
        assert!(approx_eq(outcome.results[1].after.value(), 0.45));
        let mut store = MemoryStore::new();
        let summary = session.finish(&mut store)?;
        assert_eq!((summary.correct, summary.incorrect), (1, 1));
        assert_eq!(summary.levels.len(), 2);
        Ok(())
    }

    #[test]
    fn test_guessing_every_pair_scores_nothing() {
        let pairs: Vec<MatchPair> = ["alpha", "beta"]
            .iter()
            .map(|name| MatchPair {
                entity: id(name),
                transliteration: name[..1].to_string(),
            })
            .collect();
        let choices = vec!["a".to_string(), "b".to_string()];
        let guesses: Vec<(EntityId, String)> = pairs
            .iter()
            .flat_map(|pair| choices.iter().map(|c| (pair.entity.clone(), c.clone())))
            .collect();
        let set = PracticeSet::new(vec![Exercise::MatchPairs { pairs, choices }]);
        let mut session = PracticeSession::new(set, MasteryMap::new());
        assert!(session.answer(&Response::Pairs(guesses)).is_err());
        assert_eq!(session.progress().answered, 0);
        assert!(session.updated_levels().is_empty());
    }

    #[test]
    fn test_skip_leaves_levels_alone() -> Result<(), PracticeError> {
        let set = PracticeSet::new(vec![transliteration("alpha"), transliteration("beta")]);
        let mut session = PracticeSession::new(set, MasteryMap::new());
        session.skip();
        assert_eq!(
            session.progress(),
            Progress {
                total: 2,
                answered: 1,
                remaining: 1
            }
        );
        session.answer(&Response::Choice(id("beta"))).unwrap();
        let summary = session.finish(&mut MemoryStore::new())?;
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.levels.len(), 1);
        Ok(())
    }

    #[test]
    fn test_store_failure_surfaces() {
        let set = PracticeSet::new(vec![transliteration("alpha")]);
        let mut session = PracticeSession::new(set, MasteryMap::new());
        session.answer(&Response::Choice(id("alpha"))).unwrap();
        let result = session.finish(&mut BrokenStore);
        assert_eq!(
            result,
            Err(PracticeError::PersistenceFailure("disk full".to_string()))
        );
    }

    #[test]
    fn test_score_answer_uses_running_level() {
        let mut session = PracticeSession::new(PracticeSet::default(), MasteryMap::new());
        let alpha = id("alpha");
        session.score_answer(&alpha, ExerciseType::SelectLemma, true);
        let level = session.score_answer(&alpha, ExerciseType::SelectLemma, true);
        assert!(approx_eq(level.value(), 0.3));
    }
}
