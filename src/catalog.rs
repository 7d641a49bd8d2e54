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

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use super::language::{self, Language};

#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ThemeId(String);

impl ThemeId {
    pub fn new(name: impl Into<String>) -> ThemeId {
        ThemeId(name.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// The document shape handed over by the ingestion layer. One document
// per language.

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDocument {
    pub sets: Vec<EraDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EraDocument {
    pub era: String,
    #[serde(default)]
    pub words: Vec<WordDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WordDocument {
    pub word: String,
    // Keyed by language code. Codes we don’t support are ignored.
    #[serde(default)]
    pub translations: HashMap<String, String>,
    #[serde(default)]
    pub sentences: Vec<String>,
    #[serde(default, rename = "didYouKnow")]
    pub did_you_know: String,
    #[serde(default)]
    pub difficulty: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("no English document was supplied")]
    MissingEnglish,
    #[error("more than one document for language {0}")]
    DuplicateLanguage(Language),
    #[error("theme “{0}” appears more than once")]
    DuplicateTheme(ThemeId),
    #[error("{language}: era “{era}” doesn’t map to any English theme")]
    UnknownTheme { language: Language, era: String },
    #[error("{language}: theme “{theme}” is missing")]
    MissingTheme { language: Language, theme: ThemeId },
    #[error("{language}: {theme}: word {} has no English translation",
            .position + 1)]
    MissingCanonical {
        language: Language,
        theme: ThemeId,
        position: usize,
    },
    #[error("{language}: {theme}: expected {expected} words but found {found}")]
    CountMismatch {
        language: Language,
        theme: ThemeId,
        expected: usize,
        found: usize,
    },
    #[error("{language}: {theme}: word {} is “{found}” but the English \
             list has “{expected}”", .position + 1)]
    OrderMismatch {
        language: Language,
        theme: ThemeId,
        position: usize,
        expected: String,
        found: String,
    },
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("{}: {source}", .path.display())]
    Json { path: PathBuf, source: serde_json::Error },
}

impl CatalogDocument {
    pub fn from_reader<R: Read>(
        reader: R,
    ) -> Result<CatalogDocument, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn from_path(path: &Path) -> Result<CatalogDocument, CatalogError> {
        let file = std::fs::File::open(path).map_err(|source| {
            CatalogError::Io { path: path.to_owned(), source }
        })?;

        CatalogDocument::from_reader(std::io::BufReader::new(file))
            .map_err(|source| {
                CatalogError::Json { path: path.to_owned(), source }
            })
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "HashMap<String, String>", into = "HashMap<String, String>")]
pub struct EraTable {
    names: HashMap<String, ThemeId>,
    originals: HashMap<String, String>,
}

impl EraTable {
    pub fn new<I, K, V>(entries: I) -> EraTable
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = EraTable::default();

        for (localized, english) in entries {
            let localized = localized.into();
            let english = english.into();

            table.names.insert(
                language::normalize(&localized),
                ThemeId::new(english.clone()),
            );
            table.originals.insert(localized, english);
        }

        table
    }

    pub fn theme_for(&self, era: &str) -> Option<&ThemeId> {
        self.names.get(&language::normalize(era))
    }
}

impl From<HashMap<String, String>> for EraTable {
    fn from(map: HashMap<String, String>) -> EraTable {
        EraTable::new(map)
    }
}

impl From<EraTable> for HashMap<String, String> {
    fn from(table: EraTable) -> HashMap<String, String> {
        table.originals
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UnlockPrices {
    pub default_price: u32,
    pub first_theme_free: bool,
    // Keyed by the English theme name
    pub themes: HashMap<String, u32>,
}

impl Default for UnlockPrices {
    fn default() -> UnlockPrices {
        UnlockPrices {
            default_price: 100,
            first_theme_free: true,
            themes: HashMap::new(),
        }
    }
}

impl UnlockPrices {
    fn price_for(&self, theme_num: usize, theme: &ThemeId) -> u32 {
        if let Some(&price) = self.themes.get(theme.as_str()) {
            price
        } else if theme_num == 0 && self.first_theme_free {
            0
        } else {
            self.default_price
        }
    }
}

#[derive(Clone, Debug)]
pub struct WordRecord {
    pub surface_form: String,
    pub era: ThemeId,
    pub translations: HashMap<Language, String>,
    pub sentences: Vec<String>,
    pub fact: String,
    pub difficulty_rank: f32,
    canonical: String,
}

impl WordRecord {
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

#[derive(Clone, Debug)]
pub struct Theme {
    id: ThemeId,
    names: HashMap<Language, String>,
    unlock_price: u32,
    words: HashMap<Language, Vec<WordRecord>>,
    canonical_order: Vec<String>,
}

impl Theme {
    pub fn id(&self) -> &ThemeId {
        &self.id
    }

    pub fn name(&self, language: Language) -> &str {
        self.names
            .get(&language)
            .map(String::as_str)
            .unwrap_or(self.id.as_str())
    }

    pub fn unlock_price(&self) -> u32 {
        self.unlock_price
    }

    pub fn words(&self, language: Language) -> &[WordRecord] {
        self.words.get(&language).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn canonical_words(&self) -> &[String] {
        &self.canonical_order
    }

    pub fn index_of(&self, canonical: &str) -> Option<usize> {
        let canonical = language::normalize(canonical);

        self.canonical_order.iter().position(|w| *w == canonical)
    }

    pub fn len(&self) -> usize {
        self.canonical_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical_order.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Catalog {
    themes: Vec<Theme>,
    languages: Vec<Language>,
}

pub fn difficulty_rank(difficulty: &str) -> f32 {
    let difficulty = difficulty.trim();

    if difficulty.eq_ignore_ascii_case("easy") {
        1.0
    } else if difficulty.eq_ignore_ascii_case("medium") {
        2.0
    } else if difficulty.eq_ignore_ascii_case("hard") {
        3.0
    } else {
        difficulty.parse::<f32>().ok().filter(|r| r.is_finite()).unwrap_or(0.0)
    }
}

fn make_record(
    language: Language,
    theme: &ThemeId,
    position: usize,
    word: WordDocument,
) -> Result<WordRecord, CatalogError> {
    let translations = word.translations
        .into_iter()
        .filter_map(|(code, surface)| {
            let language = code.parse::<Language>().ok()?;
            let surface = surface.trim();
            (!surface.is_empty()).then(|| (language, surface.to_string()))
        })
        .collect::<HashMap<_, _>>();

    let english = match translations.get(&Language::En) {
        Some(english) => english.as_str(),
        None if language == Language::En => word.word.as_str(),
        None => "",
    };

    let canonical = language::normalize(english);

    if canonical.is_empty() {
        return Err(CatalogError::MissingCanonical {
            language,
            theme: theme.clone(),
            position,
        });
    }

    Ok(WordRecord {
        surface_form: word.word.trim().to_string(),
        era: theme.clone(),
        translations,
        sentences: word.sentences,
        fact: word.did_you_know,
        difficulty_rank: difficulty_rank(&word.difficulty),
        canonical,
    })
}

impl Catalog {
    // The English document decides the themes and the word order. The
    // other documents have to list the same words in the same order.
    pub fn from_documents<I>(
        documents: I,
        eras: &EraTable,
        prices: &UnlockPrices,
    ) -> Result<Catalog, CatalogError>
    where
        I: IntoIterator<Item = (Language, CatalogDocument)>,
    {
        let mut by_language = HashMap::new();
        let mut languages = Vec::new();

        for (language, document) in documents {
            if by_language.insert(language, document).is_some() {
                return Err(CatalogError::DuplicateLanguage(language));
            }
            languages.push(language);
        }

        let Some(english) = by_language.remove(&Language::En)
        else {
            return Err(CatalogError::MissingEnglish);
        };

        let mut themes = Vec::<Theme>::new();

        for set in english.sets {
            let id = ThemeId::new(set.era.as_str());

            if themes.iter().any(|theme| theme.id == id) {
                return Err(CatalogError::DuplicateTheme(id));
            }

            let words = set.words
                .into_iter()
                .enumerate()
                .map(|(position, word)| {
                    make_record(Language::En, &id, position, word)
                })
                .collect::<Result<Vec<_>, _>>()?;

            let canonical_order = words
                .iter()
                .map(|word| word.canonical.clone())
                .collect::<Vec<_>>();

            themes.push(Theme {
                unlock_price: prices.price_for(themes.len(), &id),
                names: HashMap::from([(Language::En, id.to_string())]),
                words: HashMap::from([(Language::En, words)]),
                canonical_order,
                id,
            });
        }

        // Iterate in the order the documents were given so that errors
        // are reported deterministically
        for &language in languages.iter() {
            let Some(document) = by_language.remove(&language)
            else {
                continue;
            };

            add_translated_document(&mut themes, language, document, eras)?;
        }

        Ok(Catalog { themes, languages })
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn theme(&self, id: &ThemeId) -> Option<&Theme> {
        self.themes.iter().find(|theme| theme.id == *id)
    }

    pub fn first_theme(&self) -> Option<&Theme> {
        self.themes.first()
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn has_language(&self, language: Language) -> bool {
        self.languages.contains(&language)
    }

    pub fn word_count(&self) -> usize {
        self.themes.iter().map(Theme::len).sum()
    }
}

fn add_translated_document(
    themes: &mut [Theme],
    language: Language,
    document: CatalogDocument,
    eras: &EraTable,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();

    for set in document.sets {
        let id = match eras.theme_for(&set.era) {
            Some(id) => id.clone(),
            None => ThemeId::new(set.era.as_str()),
        };

        let Some(theme) = themes.iter_mut().find(|theme| theme.id == id)
        else {
            return Err(CatalogError::UnknownTheme {
                language,
                era: set.era,
            });
        };

        if !seen.insert(id.clone()) {
            return Err(CatalogError::DuplicateTheme(id));
        }

        if set.words.len() != theme.canonical_order.len() {
            return Err(CatalogError::CountMismatch {
                language,
                theme: id,
                expected: theme.canonical_order.len(),
                found: set.words.len(),
            });
        }

        let mut words = Vec::with_capacity(set.words.len());

        for (position, word) in set.words.into_iter().enumerate() {
            let record = make_record(language, &id, position, word)?;
            let expected = &theme.canonical_order[position];

            if record.canonical != *expected {
                return Err(CatalogError::OrderMismatch {
                    language,
                    theme: id,
                    position,
                    expected: expected.clone(),
                    found: record.canonical,
                });
            }

            words.push(record);
        }

        theme.names.insert(language, set.era.trim().to_string());
        theme.words.insert(language, words);
    }

    if let Some(theme) = themes.iter().find(|theme| !seen.contains(&theme.id)) {
        return Err(CatalogError::MissingTheme {
            language,
            theme: theme.id.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_catalog {
    use super::*;

    pub static ENGLISH_DOCUMENT: &str = r#"{
        "sets": [
            {
                "era": "Ancient Egypt",
                "words": [
                    {
                        "word": "PYRAMID",
                        "translations": { "en": "PYRAMID", "tr": "PİRAMİT" },
                        "sentences": ["The pyramid rose above the sand."],
                        "didYouKnow": "The Great Pyramid was the tallest building for millennia.",
                        "difficulty": "easy"
                    },
                    {
                        "word": "SPHINX",
                        "translations": { "en": "SPHINX", "tr": "SFENKS" },
                        "difficulty": "medium"
                    },
                    {
                        "word": "PHARAOH",
                        "translations": { "en": "PHARAOH", "tr": "FİRAVUN" },
                        "difficulty": "medium"
                    },
                    {
                        "word": "NILE",
                        "translations": { "en": "NILE", "tr": "NİL" },
                        "difficulty": "easy"
                    },
                    {
                        "word": "MUMMY",
                        "translations": { "en": "MUMMY", "tr": "MUMYA" },
                        "difficulty": "hard"
                    }
                ]
            },
            {
                "era": "Ancient Rome",
                "words": [
                    {
                        "word": "COLOSSEUM",
                        "translations": { "en": "COLOSSEUM", "tr": "KOLEZYUM" },
                        "difficulty": "hard"
                    },
                    {
                        "word": "GLADIATOR",
                        "translations": { "en": "GLADIATOR", "tr": "GLADYATÖR" },
                        "difficulty": "2.5"
                    },
                    {
                        "word": "SENATE",
                        "translations": { "en": "SENATE", "tr": "SENATO" }
                    }
                ]
            }
        ]
    }"#;

    pub static TURKISH_DOCUMENT: &str = r#"{
        "sets": [
            {
                "era": "Antik Mısır",
                "words": [
                    {
                        "word": "PİRAMİT",
                        "translations": { "en": "PYRAMID", "tr": "PİRAMİT" }
                    },
                    {
                        "word": "SFENKS",
                        "translations": { "en": "SPHINX", "tr": "SFENKS" }
                    },
                    {
                        "word": "FİRAVUN",
                        "translations": { "en": "PHARAOH", "tr": "FİRAVUN" }
                    },
                    {
                        "word": "NİL",
                        "translations": { "en": "NILE", "tr": "NİL" }
                    },
                    {
                        "word": "MUMYA",
                        "translations": { "en": "MUMMY", "tr": "MUMYA" }
                    }
                ]
            },
            {
                "era": "Antik Roma",
                "words": [
                    {
                        "word": "KOLEZYUM",
                        "translations": { "en": "COLOSSEUM", "tr": "KOLEZYUM" }
                    },
                    {
                        "word": "GLADYATÖR",
                        "translations": { "en": "GLADIATOR", "tr": "GLADYATÖR" }
                    },
                    {
                        "word": "SENATO",
                        "translations": { "en": "SENATE", "tr": "SENATO" }
                    }
                ]
            }
        ]
    }"#;

    // Two Turkish words that only differ by the dot on the I
    pub static VILLAGE_ENGLISH_DOCUMENT: &str = r#"{
        "sets": [
            {
                "era": "Village",
                "words": [
                    {
                        "word": "COUNTRYSIDE",
                        "translations": { "en": "COUNTRYSIDE", "tr": "KIR" }
                    },
                    {
                        "word": "DIRT",
                        "translations": { "en": "DIRT", "tr": "KİR" }
                    }
                ]
            }
        ]
    }"#;

    pub static VILLAGE_TURKISH_DOCUMENT: &str = r#"{
        "sets": [
            {
                "era": "Köy",
                "words": [
                    {
                        "word": "KIR",
                        "translations": { "en": "COUNTRYSIDE", "tr": "KIR" }
                    },
                    {
                        "word": "KİR",
                        "translations": { "en": "DIRT", "tr": "KİR" }
                    }
                ]
            }
        ]
    }"#;

    pub fn make_village_catalog() -> Catalog {
        Catalog::from_documents(
            [
                (Language::En, parse_document(VILLAGE_ENGLISH_DOCUMENT)),
                (Language::Tr, parse_document(VILLAGE_TURKISH_DOCUMENT)),
            ],
            &EraTable::new([("Köy", "Village")]),
            &UnlockPrices::default(),
        ).unwrap()
    }

    pub fn test_eras() -> EraTable {
        EraTable::new([
            ("Antik Mısır", "Ancient Egypt"),
            ("Antik Roma", "Ancient Rome"),
        ])
    }

    pub fn parse_document(source: &str) -> CatalogDocument {
        CatalogDocument::from_reader(source.as_bytes()).unwrap()
    }

    pub fn make_test_catalog() -> Catalog {
        Catalog::from_documents(
            [
                (Language::En, parse_document(ENGLISH_DOCUMENT)),
                (Language::Tr, parse_document(TURKISH_DOCUMENT)),
            ],
            &test_eras(),
            &UnlockPrices::default(),
        ).unwrap()
    }
}
