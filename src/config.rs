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

use std::path::{Path, PathBuf};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use super::catalog::{EraTable, UnlockPrices};
use super::generator::DEFAULT_ATTEMPTS;
use super::hints::HintCosts;
use super::loader::RetryPolicy;

pub const DEFAULT_GRID_SIZE: usize = 6;
pub const DEFAULT_POINTS_PER_WORD: u32 = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid_size: usize,
    pub placement_attempts: u32,
    pub hint_costs: HintCosts,
    pub points_per_word: u32,
    pub starting_points: u32,
    pub unlock_prices: UnlockPrices,
    pub era_names: EraTable,
    pub load_retry: RetryPolicy,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("{source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("the grid size must be at least 1")]
    ZeroGridSize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            grid_size: DEFAULT_GRID_SIZE,
            placement_attempts: DEFAULT_ATTEMPTS,
            hint_costs: HintCosts::default(),
            points_per_word: DEFAULT_POINTS_PER_WORD,
            starting_points: 0,
            unlock_prices: UnlockPrices::default(),
            era_names: EraTable::default(),
            load_retry: RetryPolicy::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::Io { path: path.to_owned(), source }
        })?;

        source.parse::<Config>()
    }

    fn validate(self) -> Result<Config, ConfigError> {
        if self.grid_size == 0 {
            Err(ConfigError::ZeroGridSize)
        } else {
            Ok(self)
        }
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Config, ConfigError> {
        serde_json::from_str::<Config>(s)?.validate()
    }
}
