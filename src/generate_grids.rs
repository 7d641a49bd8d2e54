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

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use eraword::catalog::{Catalog, ThemeId};
use eraword::config::Config;
use eraword::language::{self, Language};
use eraword::loader::{self, CatalogLoader, CatalogSource};
use eraword::save_state::SaveState;
use eraword::session::Session;

#[derive(Parser)]
#[command(name = "generate-grids")]
#[command(about = "Generate the word grids for a catalog")]
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

    #[arg(long, help = "Only generate the grids for this theme")]
    theme: Option<String>,

    #[arg(long, default_value = "en", help = "Language to show the words in")]
    language: Language,

    #[arg(long, help = "Override the grid size from the configuration")]
    size: Option<usize>,

    #[arg(long, help = "Seed for the random number generator")]
    seed: Option<u64>,

    #[arg(
        long,
        help = "Save file to reuse grids from and store new grids in",
    )]
    save: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<Config, ()> {
    let mut config = match args.config.as_ref() {
        Some(path) => Config::load(path).map_err(|e| {
            eprintln!("{}", e);
        })?,
        None => Config::default(),
    };

    if let Some(size) = args.size {
        if size == 0 {
            eprintln!("the grid size must be at least 1");
            return Err(());
        }

        config.grid_size = size;
    }

    Ok(config)
}

fn load_catalog(
    sources: Vec<CatalogSource>,
    config: &Config,
) -> Result<Arc<Catalog>, ()> {
    let eras = config.era_names.clone();
    let prices = config.unlock_prices.clone();

    CatalogLoader::spawn(move || loader::load_sources(&sources, &eras, &prices))
        .wait(&config.load_retry)
        .map_err(|e| eprintln!("{}", e))
}

fn find_theme(catalog: &Catalog, name: &str) -> Option<ThemeId> {
    let name = language::normalize(name);

    catalog.themes()
        .iter()
        .find(|theme| {
            language::normalize(theme.id().as_str()) == name
                || catalog.languages().iter().any(|&language| {
                    language::normalize(theme.name(language)) == name
                })
        })
        .map(|theme| theme.id().clone())
}

fn print_theme(session: &mut Session, theme: &ThemeId) -> Result<(), ()> {
    let language = session.language();
    let title = session.catalog()
        .theme(theme)
        .map(|theme| theme.name(language).to_string())
        .unwrap_or_else(|| theme.to_string());

    println!("# {}", title);

    let entries = session.theme_puzzles(theme).map_err(|e| {
        eprintln!("{}", e);
    })?;

    for entry in entries {
        println!();

        match entry.grid {
            Some(grid) => {
                println!("{}. {}", entry.index + 1, entry.surface);
                println!("{}", grid.highlighted());
                println!(
                    "{}",
                    grid.path()
                        .iter()
                        .map(|pos| pos.to_string())
                        .collect::<Vec<_>>()
                        .join(" "),
                );
            },
            None => {
                println!("{}. {} (skipped)", entry.index + 1, entry.surface);
            },
        }
    }

    println!();

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn")
    ).init();

    let args = Args::parse();

    let Ok(config) = load_config(&args)
    else {
        return ExitCode::FAILURE;
    };

    let Ok(catalog) = load_catalog(args.catalogs.clone(), &config)
    else {
        return ExitCode::FAILURE;
    };

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut session = Session::with_rng(Arc::clone(&catalog), &config, rng);

    if let Some(path) = args.save.as_ref() {
        match SaveState::load_if_exists(path) {
            Ok(Some(save_state)) => session.restore(save_state),
            Ok(None) => (),
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            },
        }
    }

    if let Err(e) = session.set_language(args.language) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let themes = match args.theme.as_ref() {
        Some(name) => match find_theme(&catalog, name) {
            Some(theme) => vec![theme],
            None => {
                eprintln!("there is no theme called “{}”", name);
                return ExitCode::FAILURE;
            },
        },
        None => catalog.themes()
            .iter()
            .map(|theme| theme.id().clone())
            .collect(),
    };

    for theme in themes.iter() {
        if print_theme(&mut session, theme).is_err() {
            return ExitCode::FAILURE;
        }
    }

    if let Some(path) = args.save.as_ref() {
        if let Err(e) = session.save_state().save_to_path(path) {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
