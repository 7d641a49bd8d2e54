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

use std::collections::BTreeSet;
use std::sync::Arc;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use super::catalog::{Catalog, Theme, ThemeId};
use super::config::Config;
use super::generator::{self, Generator};
use super::grid::GridPuzzle;
use super::grid_cache::GridCache;
use super::hints::{HintEconomy, HintError, HintLevel};
use super::language::{self, Language};
use super::points::{InsufficientPoints, Points};
use super::resolver::Resolver;
use super::save_state::{SaveState, SavedGrid, SAVE_VERSION};
use super::tracker::SolveTracker;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("there is no theme called “{0}”")]
    UnknownTheme(ThemeId),
    #[error("“{word}” isn’t one of the words in {theme}")]
    UnknownWord { theme: ThemeId, word: String },
    #[error("the catalog has no words in language {0}")]
    UnsupportedLanguage(Language),
    #[error(transparent)]
    Hint(#[from] HintError),
    #[error(transparent)]
    InsufficientPoints(#[from] InsufficientPoints),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct { canonical: String, index: usize, points_awarded: u32 },
    AlreadySolved { canonical: String },
    NotInTheme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintReveal {
    FirstLetter(char),
    WordLength(usize),
}

// One word of a theme as the player sees it in the current language
#[derive(Debug, Clone)]
pub struct PuzzleEntry<'a> {
    pub index: usize,
    pub surface: &'a str,
    pub canonical: &'a str,
    pub solved: bool,
    // `None` if the word couldn’t be placed in a grid
    pub grid: Option<&'a GridPuzzle>,
}

#[derive(Debug)]
pub struct Session {
    catalog: Arc<Catalog>,
    resolver: Resolver,
    generator: Generator,
    tracker: SolveTracker,
    economy: HintEconomy,
    points: Points,
    unlocked: BTreeSet<ThemeId>,
    grids: GridCache,
    language: Language,
    grid_size: usize,
    points_per_word: u32,
    rng: StdRng,
}

impl Session {
    pub fn new(catalog: Arc<Catalog>, config: &Config) -> Session {
        Session::with_rng(catalog, config, StdRng::from_entropy())
    }

    pub fn with_rng(
        catalog: Arc<Catalog>,
        config: &Config,
        rng: StdRng,
    ) -> Session {
        Session {
            resolver: Resolver::new(&catalog),
            tracker: SolveTracker::new(&catalog),
            generator: Generator::new(config.placement_attempts),
            economy: HintEconomy::new(config.hint_costs),
            points: Points::new(config.starting_points),
            unlocked: BTreeSet::new(),
            grids: GridCache::new(),
            language: Language::En,
            grid_size: config.grid_size,
            points_per_word: config.points_per_word,
            catalog,
            rng,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn tracker(&self) -> &SolveTracker {
        &self.tracker
    }

    pub fn points(&self) -> Points {
        self.points
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) -> Result<(), SessionError> {
        if !self.catalog.has_language(language) {
            return Err(SessionError::UnsupportedLanguage(language));
        }

        self.language = language;

        Ok(())
    }

    fn theme(&self, id: &ThemeId) -> Result<&Theme, SessionError> {
        self.catalog
            .theme(id)
            .ok_or_else(|| SessionError::UnknownTheme(id.clone()))
    }

    // Grids are generated the first time a word is shown and then
    // reused
    pub fn theme_puzzles(
        &mut self,
        theme: &ThemeId,
    ) -> Result<Vec<PuzzleEntry<'_>>, SessionError> {
        let catalog = Arc::clone(&self.catalog);
        let language = self.language;

        for word in catalog
            .theme(theme)
            .ok_or_else(|| SessionError::UnknownTheme(theme.clone()))?
            .words(language)
        {
            self.grids.get_or_generate(
                language,
                &word.surface_form,
                self.grid_size,
                &self.generator,
                &mut self.rng,
            );
        }

        let this = &*self;
        let theme_data = this.theme(theme)?;

        Ok(theme_data.words(language)
            .iter()
            .enumerate()
            .map(|(index, word)| PuzzleEntry {
                index,
                surface: &word.surface_form,
                canonical: word.canonical(),
                solved: this.tracker.is_solved(theme, word.canonical()),
                grid: this.grids.get(language, &word.surface_form),
            })
            .collect())
    }

    pub fn grid_for(&self, word: &str) -> Option<&GridPuzzle> {
        self.grids.get(self.language, word)
    }

    fn index_in_theme(
        &self,
        theme: &Theme,
        word: &str,
    ) -> Result<(String, usize), SessionError> {
        let canonical = language::normalize(&self.resolver.canonical_of(word));

        match theme.index_of(&canonical) {
            Some(index) => Ok((canonical, index)),
            None => Err(SessionError::UnknownWord {
                theme: theme.id().clone(),
                word: word.to_string(),
            }),
        }
    }

    // The guess can be written in any language of the catalog
    pub fn submit_guess(
        &mut self,
        theme: &ThemeId,
        guess: &str,
    ) -> Result<GuessOutcome, SessionError> {
        let theme_data = self.theme(theme)?;

        let (canonical, index) = match self.index_in_theme(theme_data, guess) {
            Ok(found) => found,
            Err(SessionError::UnknownWord { .. }) => {
                debug!("“{}” isn’t in {}", guess, theme);
                return Ok(GuessOutcome::NotInTheme);
            },
            Err(e) => return Err(e),
        };

        if !self.tracker.mark_solved(theme, &canonical) {
            return Ok(GuessOutcome::AlreadySolved { canonical });
        }

        self.points.award(self.points_per_word);

        info!("{}: solved “{}” ({})", theme, canonical, guess);

        Ok(GuessOutcome::Correct {
            canonical,
            index,
            points_awarded: self.points_per_word,
        })
    }

    pub fn is_solved(&self, theme: &ThemeId, word: &str) -> bool {
        self.tracker.is_solved(theme, &self.resolver.canonical_of(word))
    }

    pub fn solved_words(&self, theme: &ThemeId) -> Result<Vec<&str>, SessionError> {
        let theme_data = self.theme(theme)?;

        Ok(theme_data.words(self.language)
            .iter()
            .filter(|word| self.tracker.is_solved(theme, word.canonical()))
            .map(|word| word.surface_form.as_str())
            .collect())
    }

    pub fn hint_available(
        &self,
        theme: &ThemeId,
        word: &str,
        level: HintLevel,
    ) -> bool {
        let Some(theme_data) = self.catalog.theme(theme)
        else {
            return false;
        };

        match self.index_in_theme(theme_data, word) {
            Ok((canonical, _)) => self.economy.is_available(
                &self.tracker,
                theme,
                &canonical,
                level,
            ),
            Err(_) => false,
        }
    }

    pub fn hint_levels_used(
        &self,
        theme: &ThemeId,
        word: &str,
    ) -> BTreeSet<HintLevel> {
        self.tracker.hint_levels_used(theme, &self.resolver.canonical_of(word))
    }

    pub fn hint_cost(&self, level: HintLevel) -> u32 {
        self.economy.cost(level)
    }

    pub fn buy_hint(
        &mut self,
        theme: &ThemeId,
        word: &str,
        level: HintLevel,
    ) -> Result<HintReveal, SessionError> {
        let theme_data = self.catalog
            .theme(theme)
            .ok_or_else(|| SessionError::UnknownTheme(theme.clone()))?;
        let (canonical, index) = self.index_in_theme(theme_data, word)?;

        self.economy.purchase(
            &mut self.tracker,
            &mut self.points,
            theme,
            &canonical,
            level,
        )?;

        debug!("{}: bought hint {} for “{}”", theme, level, canonical);

        // Reveal the word as it is written in the current language
        let surface = theme_data.words(self.language)
            .get(index)
            .map(|word| word.surface_form.as_str())
            .unwrap_or(canonical.as_str());
        let letters = generator::placeable_letters(
            &self.language.uppercase(surface),
        );

        Ok(match level {
            HintLevel::FirstLetter => {
                HintReveal::FirstLetter(letters.first().copied().unwrap_or('?'))
            },
            HintLevel::WordLength => HintReveal::WordLength(letters.len()),
        })
    }

    pub fn is_unlocked(&self, theme: &ThemeId) -> bool {
        self.unlocked.contains(theme)
            || self.catalog
                .theme(theme)
                .map(|theme| theme.unlock_price() == 0)
                .unwrap_or(false)
    }

    // Unlocking a theme that is already unlocked costs nothing
    pub fn unlock_theme(&mut self, theme: &ThemeId) -> Result<(), SessionError> {
        let price = self.theme(theme)?.unlock_price();

        if self.is_unlocked(theme) {
            return Ok(());
        }

        self.points.spend(price)?;
        self.unlocked.insert(theme.clone());

        info!("unlocked {} for {} points", theme, price);

        Ok(())
    }

    // Grids, points and unlocked themes are kept
    pub fn reset_progress(&mut self) {
        self.tracker.reset();
    }

    // Throws away the grids for a word in every language
    pub fn reset_grid(&mut self, word: &str) -> bool {
        let canonical = self.resolver.canonical_of(word);
        let mut removed = false;

        for &language in self.catalog.languages() {
            let surface = self.resolver.translate(&canonical, language);
            removed |= self.grids.remove(language, &surface);
        }

        removed
    }

    pub fn reset_all_grids(&mut self) {
        self.grids.clear();
    }

    pub fn save_state(&self) -> SaveState {
        SaveState {
            version: SAVE_VERSION,
            language: self.language,
            points: self.points,
            unlocked_themes: self.unlocked.clone(),
            solved: self.tracker.solved_words(),
            hints: self.tracker.hints_used(),
            grids: self.grids
                .iter()
                .map(|(key, puzzle)| SavedGrid {
                    language: key.language,
                    word: key.word.clone(),
                    puzzle: puzzle.clone(),
                })
                .collect(),
        }
    }

    // The saved grids are used as they are. A grid that doesn’t spell
    // the word it is saved under is dropped and generated again later.
    pub fn restore(&mut self, save_state: SaveState) {
        self.tracker.restore(save_state.solved, save_state.hints);
        self.points = save_state.points;
        self.unlocked = save_state.unlocked_themes;

        if self.set_language(save_state.language).is_err() {
            debug!(
                "saved language {} isn’t in the catalog, keeping {}",
                save_state.language,
                self.language,
            );
        }

        self.grids.clear();

        for grid in save_state.grids {
            let letters = generator::placeable_letters(
                &grid.language.key(&grid.word),
            );

            if !letters.iter().copied().eq(grid.puzzle.target_word().chars()) {
                warn!(
                    "{}: saved grid for “{}” spells “{}”, ignoring it",
                    grid.language,
                    grid.word,
                    grid.puzzle.target_word(),
                );
                continue;
            }

            self.grids.insert(grid.language, &grid.word, grid.puzzle);
        }
    }
}
