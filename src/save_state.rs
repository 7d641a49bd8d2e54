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
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use super::catalog::ThemeId;
use super::grid::GridPuzzle;
use super::language::Language;
use super::points::Points;
use super::tracker::{HintsUsed, SolvedWords};

pub const SAVE_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveState {
    pub version: u32,
    pub language: Language,
    pub points: Points,
    pub unlocked_themes: BTreeSet<ThemeId>,
    pub solved: SolvedWords,
    pub hints: HintsUsed,
    pub grids: Vec<SavedGrid>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGrid {
    pub language: Language,
    pub word: String,
    pub puzzle: GridPuzzle,
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("{source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("save version {0} is newer than this program supports")]
    UnsupportedVersion(u32),
}

impl Default for SaveState {
    fn default() -> SaveState {
        SaveState {
            version: SAVE_VERSION,
            language: Language::default(),
            points: Points::default(),
            unlocked_themes: BTreeSet::new(),
            solved: SolvedWords::new(),
            hints: HintsUsed::new(),
            grids: Vec::new(),
        }
    }
}

impl SaveState {
    fn check_version(self) -> Result<SaveState, SaveError> {
        if self.version > SAVE_VERSION {
            Err(SaveError::UnsupportedVersion(self.version))
        } else {
            Ok(self)
        }
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // Written to a temporary file and renamed into place
    pub fn save_to_path(&self, path: &Path) -> Result<(), SaveError> {
        let io_error = |source| SaveError::Io { path: path.to_owned(), source };

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        std::fs::create_dir_all(parent).map_err(io_error)?;

        let file = NamedTempFile::new_in(parent).map_err(io_error)?;

        {
            let mut writer = BufWriter::new(file.as_file());
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush().map_err(io_error)?;
        }

        file.persist(path).map_err(|e| io_error(e.error))?;

        Ok(())
    }

    pub fn load_from_path(path: &Path) -> Result<SaveState, SaveError> {
        let file = std::fs::File::open(path).map_err(|source| {
            SaveError::Io { path: path.to_owned(), source }
        })?;

        serde_json::from_reader::<_, SaveState>(BufReader::new(file))?
            .check_version()
    }

    pub fn load_if_exists(path: &Path) -> Result<Option<SaveState>, SaveError> {
        match SaveState::load_from_path(path) {
            Ok(state) => Ok(Some(state)),
            Err(SaveError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(None)
            },
            Err(e) => Err(e),
        }
    }
}

impl FromStr for SaveState {
    type Err = SaveError;

    fn from_str(s: &str) -> Result<SaveState, SaveError> {
        serde_json::from_str::<SaveState>(s)?.check_version()
    }
}
