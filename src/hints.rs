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
use serde::{Deserialize, Serialize};
use super::catalog::ThemeId;
use super::points::{InsufficientPoints, Points};
use super::tracker::SolveTracker;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum HintLevel {
    FirstLetter,
    WordLength,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HintError {
    #[error("there is no hint level {0}")]
    InvalidLevel(u8),
    #[error("the word is already solved")]
    AlreadySolved,
    #[error("hint level {0} isn’t available for this word")]
    Unavailable(HintLevel),
    #[error(transparent)]
    InsufficientPoints(#[from] InsufficientPoints),
}

impl HintLevel {
    pub fn number(self) -> u8 {
        match self {
            HintLevel::FirstLetter => 1,
            HintLevel::WordLength => 2,
        }
    }
}

impl fmt::Display for HintLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl TryFrom<u8> for HintLevel {
    type Error = HintError;

    fn try_from(level: u8) -> Result<HintLevel, HintError> {
        match level {
            1 => Ok(HintLevel::FirstLetter),
            2 => Ok(HintLevel::WordLength),
            level => Err(HintError::InvalidLevel(level)),
        }
    }
}

impl From<HintLevel> for u8 {
    fn from(level: HintLevel) -> u8 {
        level.number()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HintCosts {
    pub first_letter: u32,
    pub word_length: u32,
}

impl Default for HintCosts {
    fn default() -> HintCosts {
        HintCosts {
            first_letter: 20,
            word_length: 50,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct HintEconomy {
    costs: HintCosts,
}

impl HintEconomy {
    pub fn new(costs: HintCosts) -> HintEconomy {
        HintEconomy { costs }
    }

    pub fn cost(&self, level: HintLevel) -> u32 {
        match level {
            HintLevel::FirstLetter => self.costs.first_letter,
            HintLevel::WordLength => self.costs.word_length,
        }
    }

    fn check_available(
        &self,
        tracker: &SolveTracker,
        theme: &ThemeId,
        canonical: &str,
        level: HintLevel,
    ) -> Result<(), HintError> {
        // Solved words never offer hints, whatever was used before
        if tracker.is_solved(theme, canonical) {
            return Err(HintError::AlreadySolved);
        }

        let used = tracker.hint_levels_used(theme, canonical);

        let available = match level {
            HintLevel::FirstLetter => used.is_empty(),
            HintLevel::WordLength => {
                used.len() == 1 && used.contains(&HintLevel::FirstLetter)
            },
        };

        if available {
            Ok(())
        } else {
            Err(HintError::Unavailable(level))
        }
    }

    pub fn is_available(
        &self,
        tracker: &SolveTracker,
        theme: &ThemeId,
        canonical: &str,
        level: HintLevel,
    ) -> bool {
        self.check_available(tracker, theme, canonical, level).is_ok()
    }

    pub fn can_afford(&self, points: Points, level: HintLevel) -> bool {
        points.can_afford(self.cost(level))
    }

    // Nothing changes if the hint isn’t available or can’t be afforded
    pub fn purchase(
        &self,
        tracker: &mut SolveTracker,
        points: &mut Points,
        theme: &ThemeId,
        canonical: &str,
        level: HintLevel,
    ) -> Result<(), HintError> {
        self.check_available(tracker, theme, canonical, level)?;
        points.spend(self.cost(level))?;
        tracker.use_hint(theme, canonical, level);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::BTreeSet;
    use super::super::catalog::test_catalog::make_test_catalog;

    fn egypt() -> ThemeId {
        ThemeId::new("Ancient Egypt")
    }

    #[test]
    fn levels() {
        assert_eq!(HintLevel::try_from(1), Ok(HintLevel::FirstLetter));
        assert_eq!(HintLevel::try_from(2), Ok(HintLevel::WordLength));
        assert_eq!(HintLevel::try_from(3), Err(HintError::InvalidLevel(3)));
        assert_eq!(HintLevel::try_from(0), Err(HintError::InvalidLevel(0)));
        assert_eq!(
            serde_json::to_string(&HintLevel::WordLength).unwrap(),
            "2",
        );
        assert!(serde_json::from_str::<HintLevel>("7").is_err());
    }

    #[test]
    fn availability() {
        let economy = HintEconomy::default();
        let mut tracker = SolveTracker::new(&make_test_catalog());

        assert!(economy.is_available(
            &tracker, &egypt(), "PYRAMID", HintLevel::FirstLetter,
        ));
        assert!(!economy.is_available(
            &tracker, &egypt(), "PYRAMID", HintLevel::WordLength,
        ));

        tracker.use_hint(&egypt(), "PYRAMID", HintLevel::FirstLetter);

        assert!(!economy.is_available(
            &tracker, &egypt(), "PYRAMID", HintLevel::FirstLetter,
        ));
        assert!(economy.is_available(
            &tracker, &egypt(), "PYRAMID", HintLevel::WordLength,
        ));

        tracker.use_hint(&egypt(), "PYRAMID", HintLevel::WordLength);

        assert!(!economy.is_available(
            &tracker, &egypt(), "PYRAMID", HintLevel::FirstLetter,
        ));
        assert!(!economy.is_available(
            &tracker, &egypt(), "PYRAMID", HintLevel::WordLength,
        ));
    }

    #[test]
    fn solved_words_have_no_hints() {
        let economy = HintEconomy::default();
        let mut tracker = SolveTracker::new(&make_test_catalog());
        let mut points = Points::new(1000);

        tracker.mark_solved(&egypt(), "NILE");

        assert!(!economy.is_available(
            &tracker, &egypt(), "NILE", HintLevel::FirstLetter,
        ));
        assert_eq!(
            economy.purchase(
                &mut tracker,
                &mut points,
                &egypt(),
                "NILE",
                HintLevel::FirstLetter,
            ),
            Err(HintError::AlreadySolved),
        );
        assert_eq!(points.value(), 1000);
    }

    #[test]
    fn purchase() {
        let economy = HintEconomy::new(HintCosts {
            first_letter: 20,
            word_length: 50,
        });
        let mut tracker = SolveTracker::new(&make_test_catalog());
        let mut points = Points::new(60);

        assert!(economy.can_afford(points, HintLevel::WordLength));

        assert_eq!(
            economy.purchase(
                &mut tracker,
                &mut points,
                &egypt(),
                "SPHINX",
                HintLevel::WordLength,
            ),
            Err(HintError::Unavailable(HintLevel::WordLength)),
        );
        assert_eq!(points.value(), 60);

        economy.purchase(
            &mut tracker,
            &mut points,
            &egypt(),
            "SPHINX",
            HintLevel::FirstLetter,
        ).unwrap();
        assert_eq!(points.value(), 40);

        assert!(!economy.can_afford(points, HintLevel::WordLength));
        assert_eq!(
            economy.purchase(
                &mut tracker,
                &mut points,
                &egypt(),
                "SPHINX",
                HintLevel::WordLength,
            ),
            Err(HintError::InsufficientPoints(InsufficientPoints {
                cost: 50,
                balance: 40,
            })),
        );
        assert_eq!(points.value(), 40);
        assert_eq!(
            tracker.hint_levels_used(&egypt(), "SPHINX"),
            BTreeSet::from([HintLevel::FirstLetter]),
        );

        points.award(10);
        economy.purchase(
            &mut tracker,
            &mut points,
            &egypt(),
            "SPHINX",
            HintLevel::WordLength,
        ).unwrap();
        assert_eq!(points.value(), 0);
    }

    #[test]
    fn hint_levels_only_grow() {
        let economy = HintEconomy::new(HintCosts {
            first_letter: 0,
            word_length: 0,
        });
        let mut tracker = SolveTracker::new(&make_test_catalog());
        let mut points = Points::default();
        let mut previous = BTreeSet::new();

        for level in [
            HintLevel::WordLength,
            HintLevel::FirstLetter,
            HintLevel::FirstLetter,
            HintLevel::WordLength,
            HintLevel::WordLength,
        ] {
            let _ = economy.purchase(
                &mut tracker,
                &mut points,
                &egypt(),
                "MUMMY",
                level,
            );

            let used = tracker.hint_levels_used(&egypt(), "MUMMY");

            assert!(used.is_superset(&previous));
            assert!(
                !used.contains(&HintLevel::WordLength)
                    || used.contains(&HintLevel::FirstLetter)
            );

            previous = used;
        }

        assert_eq!(previous.len(), 2);
    }
}
