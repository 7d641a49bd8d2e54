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

use std::collections::HashMap;
use log::{debug, warn};
use super::catalog::{Catalog, ThemeId};
use super::language::{self, Language};

// Maps the surface form of a word in any language onto its canonical
// English identity and back again. Keys are built with the rules of
// their own language.
#[derive(Debug, Clone)]
pub struct Resolver {
    // Lookup order. English is always first so that an English word is
    // never mistaken for a translation of something else.
    languages: Vec<Language>,
    // Surface key → canonical word, per language
    surfaces: HashMap<Language, HashMap<String, String>>,
    // Canonical word → display form in each language
    translations: HashMap<String, HashMap<Language, String>>,
    // Surface key → theme, per language
    themes: HashMap<Language, HashMap<String, ThemeId>>,
    first_theme: Option<ThemeId>,
}

impl Resolver {
    pub fn new(catalog: &Catalog) -> Resolver {
        let mut languages = vec![Language::En];

        languages.extend(
            catalog.languages()
                .iter()
                .copied()
                .filter(|&language| language != Language::En)
        );

        let mut resolver = Resolver {
            languages,
            surfaces: HashMap::new(),
            translations: HashMap::new(),
            themes: HashMap::new(),
            first_theme: catalog.first_theme().map(|t| t.id().clone()),
        };

        // The surface forms from each language’s own document take
        // priority over the translations listed in other documents
        for theme in catalog.themes() {
            for &language in catalog.languages() {
                for word in theme.words(language) {
                    resolver.add_surface(
                        language,
                        &word.surface_form,
                        word.canonical(),
                    );

                    resolver.themes
                        .entry(language)
                        .or_default()
                        .entry(language.key(&word.surface_form))
                        .or_insert_with(|| theme.id().clone());
                }
            }
        }

        for theme in catalog.themes() {
            for &language in catalog.languages() {
                for word in theme.words(language) {
                    for (&language, surface) in word.translations.iter() {
                        resolver.add_surface(
                            language,
                            surface,
                            word.canonical(),
                        );
                    }
                }
            }
        }

        resolver
    }

    fn add_surface(&mut self, language: Language, surface: &str, canonical: &str) {
        let key = language.key(surface);

        if key.is_empty() {
            return;
        }

        self.surfaces
            .entry(language)
            .or_default()
            .entry(key)
            .or_insert_with(|| canonical.to_string());

        self.translations
            .entry(canonical.to_string())
            .or_default()
            .entry(language)
            .or_insert_with(|| surface.trim().to_string());
    }

    // Words that aren’t in the catalog are returned unchanged
    pub fn canonical_of(&self, surface: &str) -> String {
        match self.lookup_canonical(surface) {
            Some(canonical) => canonical.to_string(),
            None => {
                debug!("“{}” isn’t in the catalog", surface);
                surface.to_string()
            },
        }
    }

    fn lookup_canonical(&self, surface: &str) -> Option<&str> {
        self.languages
            .iter()
            .find_map(|language| {
                self.surfaces.get(language)?.get(&language.key(surface))
            })
            .map(String::as_str)
    }

    pub fn is_known(&self, surface: &str) -> bool {
        self.lookup_canonical(surface).is_some()
    }

    pub fn translate(&self, canonical: &str, language: Language) -> String {
        let key = language::normalize(canonical);

        match self.translations
            .get(&key)
            .and_then(|surfaces| surfaces.get(&language))
        {
            Some(surface) => surface.clone(),
            None => {
                debug!("no {} translation for “{}”", language, canonical);
                canonical.to_string()
            },
        }
    }

    // English wins for words spelled the same in several languages
    pub fn language_of(&self, surface: &str) -> Option<Language> {
        self.languages
            .iter()
            .copied()
            .find(|language| {
                let key = language.key(surface);

                self.surfaces
                    .get(language)
                    .map(|surfaces| surfaces.contains_key(&key))
                    .unwrap_or(false)
            })
    }

    // Looks in the current language first and then in English
    pub fn find_theme(
        &self,
        surface: &str,
        current: Language,
    ) -> Option<&ThemeId> {
        [current, Language::En]
            .iter()
            .find_map(|language| {
                self.themes.get(language)?.get(&language.key(surface))
            })
    }

    // Falls back to the first theme. Only `None` for an empty catalog.
    pub fn theme_of(
        &self,
        surface: &str,
        current: Language,
    ) -> Option<&ThemeId> {
        match self.find_theme(surface, current) {
            Some(theme) => Some(theme),
            None => {
                warn!(
                    "“{}” isn’t in any {} or en theme, attributing it to \
                     the first theme",
                    surface,
                    current,
                );
                self.first_theme.as_ref()
            },
        }
    }
}
