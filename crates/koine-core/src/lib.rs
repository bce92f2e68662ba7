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

//! koine-core: Core library for Koine Greek alphabet practice.
//!
//! This library provides storage-agnostic types and algorithms for:
//! - Alphabet content (letters, diphthongs, breathing and accent marks)
//! - Practice set generation
//! - Mastery scoring with a per-session cap
//! - Practice sessions that grade answers and persist mastery

pub mod content;
pub mod error;
pub mod exercise;
pub mod generator;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use content::{bundled_alphabet, parse_content};
pub use error::{ErrorReport, Fallible, PracticeError, fail};
pub use exercise::{Exercise, ExerciseType, PracticeSet, Response};
pub use generator::{ExerciseMix, PracticeConfig, generate_practice_set};
pub use scoring::score_answer;
pub use session::{PracticeSession, apply_session_cap_and_persist};
pub use store::{MasteryStore, MemoryStore};
pub use types::entity::{AlphabetEntity, EntityKind};
pub use types::entity_id::EntityId;
pub use types::mastery::{MasteryLevel, MasteryMap};
pub use types::timestamp::Timestamp;
