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

use std::env::current_dir;
use std::io::Write;
use std::path::PathBuf;

use crate::collection::load_content;
use crate::error::Fallible;
use crate::error::fail;

pub async fn check_collection<W: Write>(directory: Option<String>, output: &mut W) -> Fallible<()> {
    let directory: PathBuf = match directory {
        Some(dir) => PathBuf::from(dir),
        None => current_dir()?,
    };
    if !directory.exists() {
        return fail("directory does not exist.");
    }
    let content = load_content(&directory).await?;
    if content.issues.is_empty() {
        writeln!(
            output,
            "OK: {} entities in {} content files.",
            content.entities.len(),
            content.files
        )?;
        return Ok(());
    }
    for issue in &content.issues {
        writeln!(output, "{issue}")?;
    }
    fail(format!("{} issue(s) found in content.", content.issues.len()))
}
