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

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::PracticeError;
use crate::error::fail;
use crate::types::entity_id::EntityId;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    /// Shown a glyph, pick its transliteration.
    SelectTransliteration,
    /// Shown a transliteration, pick the glyph.
    SelectLemma,
    /// Match several glyphs to their transliterations at once.
    MatchPairs,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 3] = [
        ExerciseType::SelectTransliteration,
        ExerciseType::SelectLemma,
        ExerciseType::MatchPairs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseType::SelectTransliteration => "select_transliteration",
            ExerciseType::SelectLemma => "select_lemma",
            ExerciseType::MatchPairs => "match_pairs",
        }
    }

    pub fn parse(name: &str) -> Result<Self, PracticeError> {
        let normalized = name.trim().replace('-', "_");
        ExerciseType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == normalized)
            .ok_or_else(|| PracticeError::UnsupportedExerciseType(name.to_string()))
    }
}

impl Display for ExerciseType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One glyph and the transliteration it has to be matched with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchPair {
    pub entity: EntityId,
    pub transliteration: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Exercise {
    SelectTransliteration {
        target: EntityId,
        /// Contains `target` exactly once.
        options: Vec<EntityId>,
    },
    SelectLemma {
        target: EntityId,
        /// Contains `target` exactly once.
        options: Vec<EntityId>,
    },
    MatchPairs {
        /// The targets in prompt order, each with its correct answer.
        pairs: Vec<MatchPair>,
        /// The transliterations of `pairs`, in the order they are offered.
        choices: Vec<String>,
    },
}

/// A learner's answer to an exercise.
#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    Choice(EntityId),
    Pairs(Vec<(EntityId, String)>),
}

impl Exercise {
    pub fn exercise_type(&self) -> ExerciseType {
        match self {
            Exercise::SelectTransliteration { .. } => ExerciseType::SelectTransliteration,
            Exercise::SelectLemma { .. } => ExerciseType::SelectLemma,
            Exercise::MatchPairs { .. } => ExerciseType::MatchPairs,
        }
    }

    /// The entities whose mastery this exercise tests.
    pub fn targets(&self) -> Vec<&EntityId> {
        match self {
            Exercise::SelectTransliteration { target, .. }
            | Exercise::SelectLemma { target, .. } => vec![target],
            Exercise::MatchPairs { pairs, .. } => pairs.iter().map(|p| &p.entity).collect(),
        }
    }

    /// Every entity the exercise mentions, targets and distractors alike.
    pub fn referenced(&self) -> BTreeSet<&EntityId> {
        match self {
            Exercise::SelectTransliteration { options, .. }
            | Exercise::SelectLemma { options, .. } => options.iter().collect(),
            Exercise::MatchPairs { pairs, .. } => pairs.iter().map(|p| &p.entity).collect(),
        }
    }

    /// Grade a response, returning each target with whether it was answered
    /// correctly. A response of the wrong shape is an error.
    pub fn grade(&self, response: &Response) -> Fallible<Vec<(EntityId, bool)>> {
        match (self, response) {
            (
                Exercise::SelectTransliteration { target, options }
                | Exercise::SelectLemma { target, options },
                Response::Choice(choice),
            ) => {
                if !options.contains(choice) {
                    return fail(format!("'{choice}' is not one of the options."));
                }
                Ok(vec![(target.clone(), choice == target)])
            }
            (Exercise::MatchPairs { pairs, choices }, Response::Pairs(given)) => {
                // One answer per target. A target left out counts as wrong.
                let mut answers: HashMap<&EntityId, &str> = HashMap::new();
                for (entity, translit) in given {
                    if !pairs.iter().any(|pair| pair.entity == *entity) {
                        return fail(format!("'{entity}' is not part of this exercise."));
                    }
                    if !choices.contains(translit) {
                        return fail(format!("'{translit}' is not one of the choices."));
                    }
                    if answers.insert(entity, translit.as_str()).is_some() {
                        return fail(format!("'{entity}' is answered more than once."));
                    }
                }
                Ok(pairs
                    .iter()
                    .map(|pair| {
                        let correct = answers
                            .get(&pair.entity)
                            .is_some_and(|translit| *translit == pair.transliteration);
                        (pair.entity.clone(), correct)
                    })
                    .collect())
            }
            _ => fail(format!(
                "response does not fit a {} exercise.",
                self.exercise_type()
            )),
        }
    }
}

/// The exercises for one session, in presentation order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PracticeSet {
    exercises: Vec<Exercise>,
}

impl PracticeSet {
    pub fn new(exercises: Vec<Exercise>) -> Self {
        Self { exercises }
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Exercise> {
        self.exercises.get(idx)
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    /// How many exercises of the given shape the set holds.
    pub fn count_of(&self, ty: ExerciseType) -> usize {
        self.exercises
            .iter()
            .filter(|e| e.exercise_type() == ty)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> EntityId {
        EntityId::new(s).unwrap()
    }

    #[test]
    fn test_parse_exercise_type() {
        assert_eq!(
            ExerciseType::parse("select-lemma"),
            Ok(ExerciseType::SelectLemma)
        );
        assert_eq!(
            ExerciseType::parse("listen"),
            Err(PracticeError::UnsupportedExerciseType("listen".to_string()))
        );
    }

    #[test]
    fn test_grade_choice() -> Fallible<()> {
        let exercise = Exercise::SelectLemma {
            target: id("alpha"),
            options: vec![id("beta"), id("alpha"), id("gamma")],
        };
        assert_eq!(
            exercise.grade(&Response::Choice(id("alpha")))?,
            vec![(id("alpha"), true)]
        );
        assert_eq!(
            exercise.grade(&Response::Choice(id("gamma")))?,
            vec![(id("alpha"), false)]
        );
        assert!(exercise.grade(&Response::Choice(id("omega"))).is_err());
        Ok(())
    }

    #[test]
    fn test_grade_pairs() -> Fallible<()> {
        let exercise = Exercise::MatchPairs {
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
        };
        let response = Response::Pairs(vec![
            (id("alpha"), "a".to_string()),
            (id("beta"), "a".to_string()),
        ]);
        assert_eq!(
            exercise.grade(&response)?,
            vec![(id("alpha"), true), (id("beta"), false)]
        );
        Ok(())
    }

    #[test]
    fn test_grade_pairs_one_answer_per_target() -> Fallible<()> {
        let exercise = Exercise::MatchPairs {
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
        };
        // Guessing every choice for every glyph is rejected.
        let shotgun = Response::Pairs(vec![
            (id("alpha"), "a".to_string()),
            (id("alpha"), "b".to_string()),
            (id("beta"), "a".to_string()),
            (id("beta"), "b".to_string()),
        ]);
        assert!(exercise.grade(&shotgun).is_err());
        let stranger = Response::Pairs(vec![(id("gamma"), "a".to_string())]);
        assert!(exercise.grade(&stranger).is_err());
        let off_board = Response::Pairs(vec![(id("alpha"), "z".to_string())]);
        assert!(exercise.grade(&off_board).is_err());
        // A missing answer is wrong, not an error.
        let partial = Response::Pairs(vec![(id("beta"), "b".to_string())]);
        assert_eq!(
            exercise.grade(&partial)?,
            vec![(id("alpha"), false), (id("beta"), true)]
        );
        Ok(())
    }

    #[test]
    fn test_grade_wrong_shape() {
        let exercise = Exercise::SelectTransliteration {
            target: id("alpha"),
            options: vec![id("alpha")],
        };
        let result = exercise.grade(&Response::Pairs(vec![]));
        assert!(result.is_err());
    }
}
