// Eraword – A multilingual word-snake puzzle engine
// Copyright (C) 2026  The Eraword developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, mpsc, Mutex, PoisonError};
use std::{fmt, thread};
use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use eraword::catalog::{Catalog, ThemeId};
use eraword::config::Config;
use eraword::generator::{Generator, PlacementError};
use eraword::language::Language;
use eraword::loader::{self, CatalogSource};
use eraword::resolver::Resolver;

#[derive(Parser)]
#[command(name = "check-catalog")]
#[command(about = "Check that every word of a catalog can be played")]
struct Args {
    #[arg(
        long = "catalog",
        value_name = "LANG=PATH",
        required = true,
        help = "A catalog document as LANG=PATH. Repeat once per language",
    )]
    catalogs: Vec<CatalogSource>,

    #[arg(long, help = "JSON configuration file")]
    config: Option<PathBuf>,
}

enum WordMessageKind {
    RoundTrip { surface: String, found: String },
    WrongTheme { surface: String, found: Option<ThemeId> },
    Placement(PlacementError),
}

struct WordMessage {
    theme: ThemeId,
    canonical: String,
    language: Language,
    kind: WordMessageKind,
}

struct WordJob {
    theme: ThemeId,
    canonical: String,
}

struct WordQueue {
    jobs: Mutex<VecDeque<WordJob>>,
}

struct Checker {
    catalog: Arc<Catalog>,
    resolver: Resolver,
    generator: Generator,
    grid_size: usize,
}

impl fmt::Display for WordMessageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WordMessageKind::RoundTrip { surface, found } => {
                write!(f, "“{}” resolves back to “{}”", surface, found)
            },
            WordMessageKind::WrongTheme { surface, found: Some(found) } => {
                write!(f, "“{}” is attributed to {}", surface, found)
            },
            WordMessageKind::WrongTheme { surface, found: None } => {
                write!(f, "“{}” isn’t attributed to any theme", surface)
            },
            WordMessageKind::Placement(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Display for WordMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}): {}",
            self.theme,
            self.canonical,
            self.language,
            self.kind,
        )
    }
}

impl WordQueue {
    fn new(jobs: VecDeque<WordJob>) -> WordQueue {
        WordQueue { jobs: Mutex::new(jobs) }
    }

    fn next(&self) -> Option<WordJob> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner).pop_front()
    }
}

impl Checker {
    fn check_word(
        &self,
        job: &WordJob,
        tx: &mpsc::Sender<WordMessage>,
    ) -> Result<(), mpsc::SendError<WordMessage>> {
        let send = |language, kind| {
            tx.send(WordMessage {
                theme: job.theme.clone(),
                canonical: job.canonical.clone(),
                language,
                kind,
            })
        };

        for &language in self.catalog.languages() {
            let surface = self.resolver.translate(&job.canonical, language);

            let found = self.resolver.canonical_of(&surface);

            if found != job.canonical {
                send(
                    language,
                    WordMessageKind::RoundTrip {
                        surface: surface.clone(),
                        found,
                    },
                )?;
            }

            let theme = self.resolver.find_theme(&surface, language);

            if theme != Some(&job.theme) {
                send(
                    language,
                    WordMessageKind::WrongTheme {
                        surface: surface.clone(),
                        found: theme.cloned(),
                    },
                )?;
            }

            // Seeded so that a failure can be reproduced
            let mut rng = StdRng::seed_from_u64(0);

            if let Err(e) = self.generator.generate(
                &language.uppercase(&surface),
                self.grid_size,
                language.alphabet(),
                &mut rng,
            ) {
                send(language, WordMessageKind::Placement(e))?;
            }
        }

        Ok(())
    }

    fn check_words(
        &self,
        words: &WordQueue,
        tx: mpsc::Sender<WordMessage>,
    ) -> Result<(), mpsc::SendError<WordMessage>> {
        while let Some(job) = words.next() {
            self.check_word(&job, &tx)?;
        }

        Ok(())
    }
}

fn load_catalog(args: &Args) -> Result<(Config, Catalog), ()> {
    let config = match args.config.as_ref() {
        Some(path) => Config::load(path).map_err(|e| {
            eprintln!("{}", e);
        })?,
        None => Config::default(),
    };

    let catalog = loader::load_sources(
        &args.catalogs,
        &config.era_names,
        &config.unlock_prices,
    ).map_err(|e| {
        eprintln!("{}", e);
    })?;

    Ok((config, catalog))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn")
    ).init();

    let args = Args::parse();

    let Ok((config, catalog)) = load_catalog(&args)
    else {
        return ExitCode::FAILURE;
    };

    let jobs = catalog.themes()
        .iter()
        .flat_map(|theme| {
            theme.canonical_words().iter().map(|canonical| WordJob {
                theme: theme.id().clone(),
                canonical: canonical.clone(),
            })
        })
        .collect::<VecDeque<_>>();

    let n_words = jobs.len();

    if n_words == 0 {
        eprintln!("the catalog has no words");
        return ExitCode::FAILURE;
    }

    info!("checking {} words", n_words);

    let words = Arc::new(WordQueue::new(jobs));
    let checker = Arc::new(Checker {
        resolver: Resolver::new(&catalog),
        catalog: Arc::new(catalog),
        generator: Generator::new(config.placement_attempts),
        grid_size: config.grid_size,
    });

    let (tx, rx) = mpsc::channel();
    let n_threads = Into::<usize>::into(
        thread::available_parallelism().unwrap_or(std::num::NonZeroUsize::MIN)
    ).min(n_words);

    let handles = (0..n_threads).map(|_| {
        let words = Arc::clone(&words);
        let checker = Arc::clone(&checker);
        let tx = tx.clone();

        thread::spawn(move || checker.check_words(&words, tx))
    }).collect::<Vec<_>>();

    std::mem::drop(tx);

    let mut result = ExitCode::SUCCESS;

    for message in rx {
        result = ExitCode::FAILURE;

        eprintln!("{}", message);
    }

    for handle in handles {
        if let Err(e) = handle.join() {
            std::panic::resume_unwind(e);
        }
    }

    result
}
