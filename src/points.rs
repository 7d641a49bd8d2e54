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

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord,
    Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Points(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{cost} points are needed but only {balance} are available")]
pub struct InsufficientPoints {
    pub cost: u32,
    pub balance: u32,
}

impl Points {
    pub fn new(value: u32) -> Points {
        Points(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn award(&mut self, amount: u32) {
        self.0 = self.0.saturating_add(amount);
    }

    pub fn can_afford(self, cost: u32) -> bool {
        self.0 >= cost
    }

    pub fn spend(&mut self, cost: u32) -> Result<(), InsufficientPoints> {
        match self.0.checked_sub(cost) {
            Some(balance) => {
                self.0 = balance;
                Ok(())
            },
            None => Err(InsufficientPoints { cost, balance: self.0 }),
        }
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
