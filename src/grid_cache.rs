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

use std::collections::{BTreeMap, HashMap};
use log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};
use super::generator::{Generator, PlacementError};
use super::grid::GridPuzzle;
use super::language::Language;

#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize,
)]
pub struct GridKey {
    pub language: Language,
    pub word: String,
}

impl GridKey {
    pub fn new(language: Language, word: &str) -> GridKey {
        GridKey {
            language,
            word: language.key(word),
        }
    }
}

// Words are only ever matched exactly. Words that couldn’t be placed
// are remembered so that they aren’t retried until the cache is reset.
#[derive(Clone, Debug, Default)]
pub struct GridCache {
    grids: BTreeMap<GridKey, GridPuzzle>,
    skipped: HashMap<GridKey, PlacementError>,
}

impl GridCache {
    pub fn new() -> GridCache {
        GridCache::default()
    }

    pub fn get(&self, language: Language, word: &str) -> Option<&GridPuzzle> {
        self.grids.get(&GridKey::new(language, word))
    }

    // Returns `None` if the word can’t be placed
    pub fn get_or_generate<R: Rng + ?Sized>(
        &mut self,
        language: Language,
        word: &str,
        size: usize,
        generator: &Generator,
        rng: &mut R,
    ) -> Option<&GridPuzzle> {
        let key = GridKey::new(language, word);

        if self.skipped.contains_key(&key) {
            return None;
        }

        if !self.grids.contains_key(&key) {
            match generator.generate(
                &language.uppercase(word),
                size,
                language.alphabet(),
                rng,
            ) {
                Ok(puzzle) => {
                    self.grids.insert(key.clone(), puzzle);
                },
                Err(e) => {
                    if e.is_configuration_error() {
                        warn!("{}: skipping “{}”: {}", language, word, e);
                    } else {
                        warn!(
                            "{}: skipping “{}” for this session: {}",
                            language,
                            word,
                            e,
                        );
                    }
                    self.skipped.insert(key, e);
                    return None;
                },
            }
        }

        self.grids.get(&key)
    }

    pub fn skipped(
        &self,
        language: Language,
        word: &str,
    ) -> Option<&PlacementError> {
        self.skipped.get(&GridKey::new(language, word))
    }

    // Stores a grid exactly as given, for example from a save file
    pub fn insert(&mut self, language: Language, word: &str, puzzle: GridPuzzle) {
        let key = GridKey::new(language, word);

        self.skipped.remove(&key);
        self.grids.insert(key, puzzle);
    }

    pub fn remove(&mut self, language: Language, word: &str) -> bool {
        let key = GridKey::new(language, word);
        let was_skipped = self.skipped.remove(&key).is_some();

        self.grids.remove(&key).is_some() || was_skipped
    }

    pub fn clear(&mut self) {
        self.grids.clear();
        self.skipped.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GridKey, &GridPuzzle)> {
        self.grids.iter()
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}
