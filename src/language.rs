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

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Tr,
}

pub const ALL_LANGUAGES: [Language; 2] = [Language::En, Language::Tr];

static ENGLISH_ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M',
    'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

static TURKISH_ALPHABET: [char; 29] = [
    'A', 'B', 'C', 'Ç', 'D', 'E', 'F', 'G', 'Ğ', 'H', 'I', 'İ', 'J', 'K',
    'L', 'M', 'N', 'O', 'Ö', 'P', 'R', 'S', 'Ş', 'T', 'U', 'Ü', 'V', 'Y',
    'Z',
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language code: {0}")]
pub struct UnknownLanguage(pub String);

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
        }
    }

    // Letters used to fill the cells that aren’t part of a word
    pub fn alphabet(self) -> &'static [char] {
        match self {
            Language::En => &ENGLISH_ALPHABET,
            Language::Tr => &TURKISH_ALPHABET,
        }
    }

    // Turkish keeps the dot on the capital İ
    pub fn uppercase(self, s: &str) -> String {
        match self {
            Language::En => s.trim().to_uppercase(),
            Language::Tr => {
                let mut result = String::with_capacity(s.len());

                for ch in s.trim().chars() {
                    match ch {
                        'i' => result.push('İ'),
                        'ı' => result.push('I'),
                        ch => result.extend(ch.to_uppercase()),
                    }
                }

                result
            },
        }
    }

    // Turkish keeps I and İ apart
    pub fn key(self, s: &str) -> String {
        match self {
            Language::En => normalize(s),
            Language::Tr => {
                self.uppercase(s)
                    .chars()
                    .filter(|&ch| ch != COMBINING_DOT_ABOVE)
                    .collect()
            },
        }
    }
}

// Lookup key for canonical and English words
pub fn normalize(s: &str) -> String {
    s.trim()
        .to_uppercase()
        .chars()
        // Lowercasing “İ” leaves a combining dot behind
        .filter(|&ch| ch != COMBINING_DOT_ABOVE)
        .collect()
}

const COMBINING_DOT_ABOVE: char = '\u{0307}';

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Language, UnknownLanguage> {
        ALL_LANGUAGES
            .iter()
            .copied()
            .find(|language| language.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}
