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

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

#[derive(Debug, PartialEq)]
pub struct ErrorReport {
    message: String,
}

impl ErrorReport {
    pub fn new(msg: impl Into<String>) -> Self {
        ErrorReport {
            message: msg.into(),
        }
    }

    /// The message without the `error:` prefix.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for ErrorReport {
    fn from(value: std::io::Error) -> Self {
        ErrorReport {
            message: format!("I/O error: {value:#?}"),
        }
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(value: serde_json::Error) -> Self {
        ErrorReport {
            message: format!("JSON error: {value:#?}"),
        }
    }
}

impl From<PracticeError> for ErrorReport {
    fn from(value: PracticeError) -> Self {
        ErrorReport {
            message: value.to_string(),
        }
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl Error for ErrorReport {
    fn description(&self) -> &str {
        &self.message
    }
}

pub type Fallible<T> = Result<T, ErrorReport>;

pub fn fail<T>(msg: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport {
        message: msg.into(),
    })
}

/// Failures a caller of the practice API has to handle.
#[derive(Clone, Debug, PartialEq)]
pub enum PracticeError {
    /// There are no entities to build a practice set from.
    EmptyContentPool,
    /// The mastery store could not read or write a value.
    PersistenceFailure(String),
    /// The configuration names an exercise shape with no generator.
    UnsupportedExerciseType(String),
    /// The configuration cannot produce a practice set.
    InvalidConfiguration(String),
}

impl Display for PracticeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PracticeError::EmptyContentPool => {
                write!(f, "no content is available to practice.")
            }
            PracticeError::PersistenceFailure(msg) => {
                write!(f, "failed to persist mastery levels: {msg}")
            }
            PracticeError::UnsupportedExerciseType(name) => {
                write!(f, "unsupported exercise type: '{name}'.")
            }
            PracticeError::InvalidConfiguration(msg) => {
                write!(f, "invalid practice configuration: {msg}")
            }
        }
    }
}

impl Error for PracticeError {}
