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

//! The terminal drill.
//!
//! Select exercises take an option number. Match-pairs exercises take one
//! option letter per glyph. `skip` moves past an exercise and `quit` ends the
//! session early; either way, what was answered is saved.

use std::collections::HashMap;
use std::io::BufRead;
use std::io::Write;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use koine_core::AlphabetEntity;
use koine_core::EntityId;
use koine_core::Exercise;
use koine_core::ExerciseType;
use koine_core::PracticeConfig;
use koine_core::PracticeSession;
use koine_core::Response;
use koine_core::Timestamp;
use koine_core::content::ContentIssue;
use koine_core::content::filter_kinds;
use koine_core::generate_practice_set;
use koine_core::rng::TinyRng;
use koine_core::session::Outcome;
use koine_core::session::SessionSummary;
use log::debug;
use log::info;

use crate::collection::Collection;
use crate::config::Overrides;
use crate::config::Settings;
use crate::config::load_config;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

pub struct PracticeOptions {
    pub directory: Option<String>,
    pub overrides: Overrides,
    /// Fixes the random draw, for reproducible sessions.
    pub seed: Option<u64>,
}

enum Input {
    Answer(String),
    Skip,
    Quit,
}

/// Entities by id, for rendering prompts and feedback.
struct Lookup<'a> {
    entities: HashMap<&'a EntityId, &'a AlphabetEntity>,
}

impl<'a> Lookup<'a> {
    fn new(entities: &'a [AlphabetEntity]) -> Self {
        Self {
            entities: entities.iter().map(|e| (&e.id, e)).collect(),
        }
    }

    fn get(&self, id: &EntityId) -> Fallible<&'a AlphabetEntity> {
        self.entities
            .get(id)
            .copied()
            .ok_or_else(|| ErrorReport::new(format!("unknown entity '{id}'.")))
    }
}

pub async fn practice<R: BufRead, W: Write>(
    options: PracticeOptions,
    mut input: R,
    mut output: W,
) -> Fallible<SessionSummary> {
    let collection = Collection::open(options.directory).await?;
    let duplicates = collection
        .content
        .issues
        .iter()
        .filter(|issue| matches!(issue, ContentIssue::DuplicateId(_)))
        .count();
    if duplicates > 0 {
        return fail(format!(
            "{duplicates} duplicate entity id(s) in content, run `koine check` for details."
        ));
    }
    let settings = Settings::resolve(load_config(&collection.directory)?, options.overrides)?;
    let entities: Vec<AlphabetEntity> = collection.entities()?;
    let Collection { mut db, .. } = collection;
    let pool = filter_kinds(entities.clone(), &settings.kinds);

    let config = PracticeConfig {
        pool,
        exercise_count: settings.exercise_count,
        mix: settings.mix,
        option_count: settings.option_count,
        match_pairs_batch: settings.match_pairs_batch,
    };
    let seed = options.seed.unwrap_or_else(clock_seed);
    debug!("Generating practice set with seed {seed}");
    let set = generate_practice_set(&config, &mut TinyRng::from_seed(seed))?;
    info!(
        "Generated {} exercises ({} select-transliteration, {} select-lemma, {} match-pairs).",
        set.len(),
        set.count_of(ExerciseType::SelectTransliteration),
        set.count_of(ExerciseType::SelectLemma),
        set.count_of(ExerciseType::MatchPairs)
    );

    let started_at = Timestamp::now();
    let mut session = PracticeSession::new(set, db.levels()?);
    let lookup = Lookup::new(&entities);
    drill(&mut session, &lookup, &mut input, &mut output)?;

    let summary = session.finish(&mut db)?;
    info!("Wrote {} mastery levels.", summary.levels.len());
    db.record_session(started_at, Timestamp::now(), &summary)?;
    print_summary(&summary, &lookup, &mut output)?;
    Ok(summary)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn drill<R: BufRead, W: Write>(
    session: &mut PracticeSession,
    lookup: &Lookup,
    input: &mut R,
    output: &mut W,
) -> Fallible<()> {
    while let Some(exercise) = session.current().cloned() {
        let progress = session.progress();
        let header = format!("[{}/{}]", progress.answered + 1, progress.total);
        let response = match &exercise {
            Exercise::SelectTransliteration { target, options } => {
                let target = lookup.get(target)?;
                writeln!(
                    output,
                    "{header} Which transliteration matches {}?",
                    target.display_glyph()
                )?;
                let labels = options
                    .iter()
                    .map(|id| Ok(lookup.get(id)?.transliteration.clone()))
                    .collect::<Fallible<Vec<String>>>()?;
                select(options, &labels, input, output)?
            }
            Exercise::SelectLemma { target, options } => {
                let target = lookup.get(target)?;
                writeln!(
                    output,
                    "{header} Which glyph is transliterated '{}' ({})?",
                    target.transliteration, target.pronunciation
                )?;
                let labels = options
                    .iter()
                    .map(|id| Ok(lookup.get(id)?.display_glyph()))
                    .collect::<Fallible<Vec<String>>>()?;
                select(options, &labels, input, output)?
            }
            Exercise::MatchPairs { pairs, choices } => {
                writeln!(output, "{header} Match each glyph to its transliteration:")?;
                for (idx, choice) in choices.iter().enumerate() {
                    writeln!(output, "  {}) {choice}", option_letter(idx))?;
                }
                let mut given: Vec<(EntityId, String)> = Vec::with_capacity(pairs.len());
                let mut stopped: Option<Input> = None;
                for pair in pairs {
                    let glyph = lookup.get(&pair.entity)?.display_glyph();
                    match prompt_letter(&glyph, choices.len(), input, output)? {
                        Input::Answer(letter) => {
                            let idx = letter_index(&letter).unwrap_or(0);
                            given.push((pair.entity.clone(), choices[idx].clone()));
                        }
                        other => {
                            stopped = Some(other);
                            break;
                        }
                    }
                }
                match stopped {
                    Some(other) => other,
                    None => {
                        let outcome = session.answer(&Response::Pairs(given))?;
                        print_outcome(&outcome, lookup, output)?;
                        continue;
                    }
                }
            }
        };
        match response {
            Input::Answer(choice) => {
                let outcome = session.answer(&Response::Choice(EntityId::new(choice)?))?;
                print_outcome(&outcome, lookup, output)?;
            }
            Input::Skip => {
                writeln!(output, "Skipped.")?;
                session.skip();
            }
            Input::Quit => {
                writeln!(output, "Ending the session early.")?;
                break;
            }
        }
    }
    Ok(())
}

/// Read one line, or `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Fallible<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn control(line: &str) -> Option<Input> {
    match line.to_lowercase().as_str() {
        "skip" | "s" => Some(Input::Skip),
        "quit" | "q" => Some(Input::Quit),
        _ => None,
    }
}

/// Show numbered options and read a choice. An `Input::Answer` carries the
/// chosen entity id.
fn select<R: BufRead, W: Write>(
    options: &[EntityId],
    labels: &[String],
    input: &mut R,
    output: &mut W,
) -> Fallible<Input> {
    for (idx, label) in labels.iter().enumerate() {
        writeln!(output, "  {}) {label}", idx + 1)?;
    }
    loop {
        write!(output, "> ")?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(Input::Quit);
        };
        if let Some(ctl) = control(&line) {
            return Ok(ctl);
        }
        match line.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => {
                return Ok(Input::Answer(options[n - 1].to_string()));
            }
            _ => writeln!(
                output,
                "Please enter a number between 1 and {}.",
                options.len()
            )?,
        }
    }
}

fn prompt_letter<R: BufRead, W: Write>(
    glyph: &str,
    count: usize,
    input: &mut R,
    output: &mut W,
) -> Fallible<Input> {
    loop {
        write!(output, "  {glyph} > ")?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(Input::Quit);
        };
        if let Some(ctl) = control(&line) {
            return Ok(ctl);
        }
        match letter_index(&line) {
            Some(idx) if idx < count => return Ok(Input::Answer(line)),
            _ => writeln!(
                output,
                "Please enter a letter between a and {}.",
                option_letter(count - 1)
            )?,
        }
    }
}

fn option_letter(idx: usize) -> char {
    (b'a'..=b'z').nth(idx).map(char::from).unwrap_or('?')
}

fn letter_index(line: &str) -> Option<usize> {
    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_lowercase() => Some((c as u8 - b'a') as usize),
        _ => None,
    }
}

fn print_outcome<W: Write>(outcome: &Outcome, lookup: &Lookup, output: &mut W) -> Fallible<()> {
    if outcome.all_correct() {
        writeln!(output, "Correct!")?;
    }
    for result in &outcome.results {
        let entity = lookup.get(&result.entity)?;
        if !result.correct {
            writeln!(
                output,
                "Incorrect: {} is '{}'.",
                entity.display_glyph(),
                entity.transliteration
            )?;
        }
        writeln!(
            output,
            "  {}: {} -> {}",
            entity.name, result.before, result.after
        )?;
    }
    Ok(())
}

fn print_summary<W: Write>(
    summary: &SessionSummary,
    lookup: &Lookup,
    output: &mut W,
) -> Fallible<()> {
    writeln!(
        output,
        "Session complete: {} correct, {} incorrect, {} skipped.",
        summary.correct, summary.incorrect, summary.skipped
    )?;
    let mut ids: Vec<&EntityId> = summary.levels.keys().collect();
    ids.sort();
    for id in ids {
        let entity = lookup.get(id)?;
        writeln!(output, "  {}: {}", entity.name, summary.levels[id])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::collection::DATABASE_FILE;
    use crate::db::Database;
    use crate::helper::create_tmp_collection;
    use crate::helper::create_tmp_directory;

    fn options(directory: &std::path::Path, count: usize, types: &str) -> PracticeOptions {
        PracticeOptions {
            directory: Some(directory.display().to_string()),
            overrides: Overrides {
                exercise_count: Some(count),
                kinds: None,
                types: Some(types.to_string()),
            },
            seed: Some(42),
        }
    }

    #[tokio::test]
    async fn test_quit_immediately_saves_nothing() -> Fallible<()> {
        let dir = create_tmp_collection()?;
        let mut output: Vec<u8> = Vec::new();
        let summary = practice(
            options(&dir, 3, "select_lemma"),
            Cursor::new("quit\n"),
            &mut output,
        )
        .await?;
        assert_eq!(summary.answered, 0);
        assert!(summary.levels.is_empty());
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("[1/3] Which glyph is transliterated"));
        assert!(text.contains("Ending the session early."));
        Ok(())
    }

    #[tokio::test]
    async fn test_end_of_input_ends_session() -> Fallible<()> {
        let dir = create_tmp_collection()?;
        let summary = practice(
            options(&dir, 2, "select_transliteration"),
            Cursor::new(""),
            Vec::new(),
        )
        .await?;
        assert_eq!(summary.answered, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_answers_are_scored_and_persisted() -> Fallible<()> {
        let dir = create_tmp_collection()?;
        // Option 1 every time: some answers right, some wrong, all scored.
        let summary = practice(
            options(&dir, 4, "select_transliteration"),
            Cursor::new("1\n1\n1\n1\n"),
            Vec::new(),
        )
        .await?;
        assert_eq!(summary.answered, 4);
        assert_eq!(summary.correct + summary.incorrect, 4);
        let db = Database::open(&dir.join(DATABASE_FILE))?;
        let stored = db.levels()?;
        assert_eq!(stored.len(), summary.levels.len());
        for (id, level) in &summary.levels {
            assert_eq!(stored[id], *level);
            assert!(level.value() <= 0.2 + 1e-9);
        }
        assert_eq!(db.sessions()?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_input_reprompts() -> Fallible<()> {
        let dir = create_tmp_collection()?;
        let mut output: Vec<u8> = Vec::new();
        let summary = practice(
            options(&dir, 1, "select_lemma"),
            Cursor::new("nine\n0\n2\n"),
            &mut output,
        )
        .await?;
        assert_eq!(summary.answered, 1);
        let text = String::from_utf8(output).unwrap();
        assert_eq!(
            text.matches("Please enter a number between 1 and 4.").count(),
            2
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_match_pairs_in_order() -> Fallible<()> {
        let dir = create_tmp_collection()?;
        let mut output: Vec<u8> = Vec::new();
        let summary = practice(
            options(&dir, 1, "match_pairs"),
            Cursor::new("a\nb\nc\nd\n"),
            &mut output,
        )
        .await?;
        assert_eq!(summary.answered, 1);
        assert_eq!(summary.correct + summary.incorrect, 4);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Match each glyph to its transliteration:"));
        Ok(())
    }

    #[tokio::test]
    async fn test_skip() -> Fallible<()> {
        let dir = create_tmp_collection()?;
        let summary = practice(
            options(&dir, 2, "select_lemma"),
            Cursor::new("skip\nskip\n"),
            Vec::new(),
        )
        .await?;
        assert_eq!(summary.skipped, 2);
        assert!(summary.levels.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_session_cap_across_repeats() -> Fallible<()> {
        let dir = create_tmp_collection()?;
        // Eight exercises over four letters: every letter comes up twice.
        // Whatever was answered, no letter gains more than the cap.
        let summary = practice(
            options(&dir, 8, "select_lemma"),
            Cursor::new("1\n2\n3\n4\n1\n2\n3\n4\n"),
            Vec::new(),
        )
        .await?;
        for level in summary.levels.values() {
            assert!(level.value() <= 0.2 + 1e-9);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_pool_is_an_error() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let mut opts = options(&dir, 3, "select_lemma");
        opts.overrides.kinds = Some("letter".to_string());
        std::fs::write(dir.join("empty.json"), "[]")?;
        let result = practice(opts, Cursor::new(""), Vec::new()).await;
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: no content is available to practice.");
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_ids_refuse_to_practice() -> Fallible<()> {
        let dir = create_tmp_collection()?;
        std::fs::write(
            dir.join("extra.json"),
            r#"[
  {"id": "letter-alpha", "kind": "letter", "ordinal": 5, "glyph": "ε",
   "name": "epsilon", "transliteration": "e", "pronunciation": "e as in bet"}
]"#,
        )?;
        let result = practice(options(&dir, 3, "match_pairs"), Cursor::new(""), Vec::new()).await;
        assert_eq!(
            result.err().map(|e| e.to_string()),
            Some(
                "error: 1 duplicate entity id(s) in content, run `koine check` for details."
                    .to_string()
            )
        );
        let db = Database::open(&dir.join(DATABASE_FILE))?;
        assert!(db.sessions()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_letter_index() {
        assert_eq!(letter_index("a"), Some(0));
        assert_eq!(letter_index("d"), Some(3));
        assert_eq!(letter_index("ab"), None);
        assert_eq!(letter_index("A"), None);
        assert_eq!(letter_index(""), None);
    }

    #[test]
    fn test_option_letter() {
        assert_eq!(option_letter(0), 'a');
        assert_eq!(option_letter(25), 'z');
        assert_eq!(option_letter(26), '?');
        assert_eq!(option_letter(300), '?');
    }
}
