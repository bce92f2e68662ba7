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

use clap::Parser;

use crate::cmd::check::check_collection;
use crate::cmd::practice::PracticeOptions;
use crate::cmd::practice::practice;
use crate::cmd::reset::reset_mastery;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::config::Overrides;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Practice the alphabet in the terminal.
    Practice {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Number of exercises in the session. Overrides `exercise_count` in koine.toml.
        #[arg(long)]
        count: Option<usize>,
        /// Comma-separated entity kinds to practice, e.g. `letter,diphthong`.
        #[arg(long)]
        kinds: Option<String>,
        /// Comma-separated exercise types, e.g. `select_lemma,match_pairs`.
        #[arg(long)]
        types: Option<String>,
        /// Seed for the random draw.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print mastery statistics.
    Stats {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// Check the integrity of the alphabet content.
    Check {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Forget stored mastery levels.
    Reset {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Only reset this entity. By default, every entity is reset.
        #[arg(long)]
        entity: Option<String>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Practice {
            directory,
            count,
            kinds,
            types,
            seed,
        } => {
            let options = PracticeOptions {
                directory,
                overrides: Overrides {
                    exercise_count: count,
                    kinds,
                    types,
                },
                seed,
            };
            let stdin = std::io::stdin();
            practice(options, stdin.lock(), std::io::stdout()).await?;
            Ok(())
        }
        Command::Stats { directory, format } => {
            print_stats(directory, format, &mut std::io::stdout()).await
        }
        Command::Check { directory } => check_collection(directory, &mut std::io::stdout()).await,
        Command::Reset { directory, entity } => {
            reset_mastery(directory, entity, &mut std::io::stdout()).await
        }
    }
}
