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

use std::fs::write;
use std::path::PathBuf;

use tempfile::tempdir;

use crate::error::Fallible;

/// A fresh directory that outlives the test.
pub fn create_tmp_directory() -> Fallible<PathBuf> {
    let dir: PathBuf = tempdir()?.keep();
    Ok(dir.canonicalize()?)
}

/// A collection directory holding a small content file with four letters.
pub fn create_tmp_collection() -> Fallible<PathBuf> {
    let dir = create_tmp_directory()?;
    write(
        dir.join("letters.json"),
        r#"[
  {"id": "letter-alpha", "kind": "letter", "ordinal": 1, "glyph": "α", "uppercase": "Α",
   "name": "alpha", "transliteration": "a", "pronunciation": "a as in father"},
  {"id": "letter-beta", "kind": "letter", "ordinal": 2, "glyph": "β", "uppercase": "Β",
   "name": "beta", "transliteration": "b", "pronunciation": "b as in bat"},
  {"id": "letter-gamma", "kind": "letter", "ordinal": 3, "glyph": "γ", "uppercase": "Γ",
   "name": "gamma", "transliteration": "g", "pronunciation": "g as in got"},
  {"id": "letter-delta", "kind": "letter", "ordinal": 4, "glyph": "δ", "uppercase": "Δ",
   "name": "delta", "transliteration": "d", "pronunciation": "d as in dog"}
]"#,
    )?;
    Ok(dir)
}
