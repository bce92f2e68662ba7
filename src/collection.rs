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
use std::path::Path;
use std::path::PathBuf;

use koine_core::AlphabetEntity;
use koine_core::bundled_alphabet;
use koine_core::content::ContentIssue;
use koine_core::content::apply_mastery;
use koine_core::content::parse_content_checked;
use log::info;
use tokio::fs::read_to_string;
use walkdir::WalkDir;

use crate::db::Database;
use crate::error::Fallible;
use crate::error::fail;

pub const DATABASE_FILE: &str = "koine.db";

/// Alphabet content as loaded from a collection directory.
pub struct Content {
    pub entities: Vec<AlphabetEntity>,
    pub issues: Vec<ContentIssue>,
    /// How many content files were read. Zero means the bundled alphabet.
    pub files: usize,
}

/// Load every `*.json` file under the directory. With no content files, the
/// bundled alphabet is used.
pub async fn load_content(directory: &Path) -> Fallible<Content> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path.to_path_buf());
        }
    }
    if paths.is_empty() {
        info!("No content files found, using the bundled alphabet.");
        return Ok(Content {
            entities: bundled_alphabet()?,
            issues: Vec::new(),
            files: 0,
        });
    }
    let mut files: Vec<(String, String)> = Vec::with_capacity(paths.len());
    for path in &paths {
        let text = read_to_string(path).await?;
        let name = path
            .strip_prefix(directory)
            .unwrap_or(path)
            .display()
            .to_string();
        files.push((name, text));
    }
    let (entities, issues) =
        parse_content_checked(files.iter().map(|(name, text)| (name.as_str(), text.as_str())))?;
    info!(
        "Loaded {} entities from {} content files.",
        entities.len(),
        files.len()
    );
    Ok(Content {
        entities,
        issues,
        files: files.len(),
    })
}

pub struct Collection {
    pub directory: PathBuf,
    pub db: Database,
    pub content: Content,
}

impl Collection {
    pub async fn open(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        if !directory.exists() {
            return fail("directory does not exist.");
        }
        let directory = directory.canonicalize()?;
        let content = load_content(&directory).await?;
        let db = Database::open(&directory.join(DATABASE_FILE))?;
        Ok(Self {
            directory,
            db,
            content,
        })
    }

    /// The loaded content with stored mastery levels applied.
    pub fn entities(&self) -> Fallible<Vec<AlphabetEntity>> {
        let levels = self.db.levels()?;
        Ok(apply_mastery(self.content.entities.clone(), &levels))
    }
}
