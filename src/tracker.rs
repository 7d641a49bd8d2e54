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

use std::collections::{BTreeMap, BTreeSet, HashMap};
use log::{debug, warn};
use super::catalog::{Catalog, ThemeId};
use super::hints::HintLevel;
use super::language;

pub type SolvedWords = BTreeMap<ThemeId, BTreeSet<String>>;
pub type HintsUsed = BTreeMap<ThemeId, BTreeMap<String, BTreeSet<HintLevel>>>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct ThemeProgress {
    solved: BTreeSet<String>,
    hints: BTreeMap<String, BTreeSet<HintLevel>>,
}

// The canonical sets are the only state. The index view is derived
// from them using the catalog order.
#[derive(Clone, Debug)]
pub struct SolveTracker {
    orders: HashMap<ThemeId, Vec<String>>,
    progress: BTreeMap<ThemeId, ThemeProgress>,
}

impl SolveTracker {
    pub fn new(catalog: &Catalog) -> SolveTracker {
        let orders = catalog.themes()
            .iter()
            .map(|theme| (theme.id().clone(), theme.canonical_words().to_vec()))
            .collect();

        SolveTracker {
            orders,
            progress: BTreeMap::new(),
        }
    }

    // Returns whether the word wasn’t already solved
    pub fn mark_solved(&mut self, theme: &ThemeId, canonical: &str) -> bool {
        let canonical = language::normalize(canonical);

        if self.index_of(theme, &canonical).is_none() {
            debug!("“{}” solved but it isn’t part of {}", canonical, theme);
        }

        self.progress
            .entry(theme.clone())
            .or_default()
            .solved
            .insert(canonical)
    }

    pub fn is_solved(&self, theme: &ThemeId, canonical: &str) -> bool {
        self.progress
            .get(theme)
            .map(|progress| {
                progress.solved.contains(&language::normalize(canonical))
            })
            .unwrap_or(false)
    }

    pub fn all_solved_canonical(&self) -> BTreeSet<String> {
        self.progress
            .values()
            .flat_map(|progress| progress.solved.iter().cloned())
            .collect()
    }

    pub fn solved_count(&self, theme: &ThemeId) -> usize {
        self.progress
            .get(theme)
            .map(|progress| progress.solved.len())
            .unwrap_or(0)
    }

    pub fn is_theme_solved(&self, theme: &ThemeId) -> bool {
        let Some(order) = self.orders.get(theme)
        else {
            return false;
        };

        !order.is_empty()
            && order.iter().all(|canonical| self.is_solved(theme, canonical))
    }

    pub fn hint_levels_used(
        &self,
        theme: &ThemeId,
        canonical: &str,
    ) -> BTreeSet<HintLevel> {
        self.progress
            .get(theme)
            .and_then(|progress| {
                progress.hints.get(&language::normalize(canonical))
            })
            .cloned()
            .unwrap_or_default()
    }

    // The caller is expected to have checked that the hint is available
    // and charged for it
    pub fn use_hint(
        &mut self,
        theme: &ThemeId,
        canonical: &str,
        level: HintLevel,
    ) -> bool {
        self.progress
            .entry(theme.clone())
            .or_default()
            .hints
            .entry(language::normalize(canonical))
            .or_default()
            .insert(level)
    }

    // Positions in the catalog word list of the solved words
    pub fn solved_indices_for_theme(&self, theme: &ThemeId) -> BTreeSet<usize> {
        let (Some(order), Some(progress)) =
            (self.orders.get(theme), self.progress.get(theme))
        else {
            return BTreeSet::new();
        };

        order.iter()
            .enumerate()
            .filter_map(|(index, canonical)| {
                progress.solved.contains(canonical).then_some(index)
            })
            .collect()
    }

    fn index_of(&self, theme: &ThemeId, canonical: &str) -> Option<usize> {
        self.orders
            .get(theme)?
            .iter()
            .position(|word| word == canonical)
    }

    pub fn reset(&mut self) {
        self.progress.clear();
    }

    pub fn solved_words(&self) -> SolvedWords {
        self.progress
            .iter()
            .filter(|(_, progress)| !progress.solved.is_empty())
            .map(|(theme, progress)| (theme.clone(), progress.solved.clone()))
            .collect()
    }

    pub fn hints_used(&self) -> HintsUsed {
        self.progress
            .iter()
            .filter(|(_, progress)| !progress.hints.is_empty())
            .map(|(theme, progress)| (theme.clone(), progress.hints.clone()))
            .collect()
    }

    // Replaces the current progress with saved progress. Level 2 hints
    // saved without level 1 are dropped.
    pub fn restore(&mut self, solved: SolvedWords, hints: HintsUsed) {
        self.progress.clear();

        for (theme, words) in solved {
            for word in words {
                self.mark_solved(&theme, &word);
            }
        }

        for (theme, words) in hints {
            for (word, mut levels) in words {
                if levels.contains(&HintLevel::WordLength)
                    && !levels.contains(&HintLevel::FirstLetter)
                {
                    warn!(
                        "{}: saved hint {} for “{}” without hint {}, \
                         dropping it",
                        theme,
                        HintLevel::WordLength,
                        word,
                        HintLevel::FirstLetter,
                    );
                    levels.remove(&HintLevel::WordLength);
                }

                for level in levels {
                    self.use_hint(&theme, &word, level);
                }
            }
        }
    }
}
