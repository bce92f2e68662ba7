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

//! The mastery scoring rule.
//!
//! Every answer moves an entity's mastery by a fixed step that depends on the
//! exercise type. Recalling a glyph from its sound is harder than recognising
//! a glyph, so it earns more and costs less. Match-pairs exercises test
//! several entities at once, so each entity moves by a smaller step.

use crate::exercise::ExerciseType;
use crate::types::mastery::MasteryLevel;
use crate::types::mastery::MasteryMap;

/// The largest net increase any entity may gain in one session.
pub const SESSION_CAP: f64 = 0.2;

/// Mastery gained on a correct answer.
pub fn correct_step(ty: ExerciseType) -> f64 {
    match ty {
        ExerciseType::SelectTransliteration => 0.10,
        ExerciseType::SelectLemma => 0.15,
        ExerciseType::MatchPairs => 0.05,
    }
}

/// Mastery lost on an incorrect answer.
pub fn incorrect_step(ty: ExerciseType) -> f64 {
    match ty {
        ExerciseType::SelectTransliteration => 0.15,
        ExerciseType::SelectLemma => 0.10,
        ExerciseType::MatchPairs => 0.05,
    }
}

pub fn mastery_after_correct_answer(current: MasteryLevel, ty: ExerciseType) -> MasteryLevel {
    MasteryLevel::new(current.value() + correct_step(ty))
}

pub fn mastery_after_incorrect_answer(current: MasteryLevel, ty: ExerciseType) -> MasteryLevel {
    MasteryLevel::new(current.value() - incorrect_step(ty))
}

pub fn score_answer(ty: ExerciseType, is_correct: bool, current: MasteryLevel) -> MasteryLevel {
    if is_correct {
        mastery_after_correct_answer(current, ty)
    } else {
        mastery_after_incorrect_answer(current, ty)
    }
}

/// Limit the net increase of one entity over a session to [`SESSION_CAP`].
/// Decreases pass through unchanged.
pub fn cap_session_increase(initial: MasteryLevel, updated: MasteryLevel) -> MasteryLevel {
    let increase = updated.value() - initial.value();
    if increase > 0.0 {
        MasteryLevel::new(initial.value() + increase.min(SESSION_CAP))
    } else {
        updated
    }
}

/// Apply the session cap to every entity in `updated`, measured against its
/// level at session start. Entities absent from `initial` started at zero.
pub fn apply_session_cap(initial: &MasteryMap, updated: &MasteryMap) -> MasteryMap {
    updated
        .iter()
        .map(|(id, level)| {
            let start = initial.get(id).copied().unwrap_or_default();
            (id.clone(), cap_session_increase(start, *level))
        })
        .collect()
}
