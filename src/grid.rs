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

use std::collections::HashSet;
use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize,
)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Position {
        Position { x, y }
    }

    pub fn is_adjacent(self, other: Position) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridPuzzleData", into = "GridPuzzleData")]
pub struct GridPuzzle {
    target_word: String,
    size: usize,
    // Row-major
    cells: Vec<char>,
    path: Vec<Position>,
}

// On-disk form. The rows are stored as strings so that a saved grid is
// readable by a person.
#[derive(Serialize, Deserialize)]
struct GridPuzzleData {
    word: String,
    size: usize,
    rows: Vec<String>,
    path: Vec<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("expected {expected} rows but found {found}")]
    WrongRowCount { expected: usize, found: usize },
    #[error("row {}: expected {expected} letters but found {found}",
            .row + 1)]
    WrongRowLength { row: usize, expected: usize, found: usize },
    #[error("cell {x},{y}: not an uppercase letter: {ch:?}")]
    NotALetter { x: usize, y: usize, ch: char },
    #[error("the path has {found} cells but the word has {expected} letters")]
    PathLength { expected: usize, found: usize },
    #[error("path cell {index} is outside the grid")]
    PathOutOfBounds { index: usize },
    #[error("path cell {index} is visited twice")]
    PathRepeats { index: usize },
    #[error("path cell {index} isn’t next to the previous one")]
    PathNotAdjacent { index: usize },
    #[error("path cell {index} contains {found} instead of {expected}")]
    PathMismatch { index: usize, expected: char, found: char },
}

impl GridPuzzle {
    pub fn new(
        target_word: &str,
        size: usize,
        cells: Vec<char>,
        path: Vec<Position>,
    ) -> Result<GridPuzzle, GridError> {
        if cells.len() != size * size {
            return Err(GridError::WrongRowCount {
                expected: size,
                found: cells.len() / size.max(1),
            });
        }

        let puzzle = GridPuzzle {
            target_word: target_word.to_string(),
            size,
            cells,
            path,
        };

        puzzle.validate()?;

        Ok(puzzle)
    }

    // Used by the generator, which only builds valid paths
    pub(crate) fn from_parts(
        target_word: String,
        size: usize,
        cells: Vec<char>,
        path: Vec<Position>,
    ) -> GridPuzzle {
        let puzzle = GridPuzzle { target_word, size, cells, path };

        debug_assert_eq!(puzzle.validate(), Ok(()));

        puzzle
    }

    pub fn validate(&self) -> Result<(), GridError> {
        for (i, &ch) in self.cells.iter().enumerate() {
            if !ch.is_alphabetic() || ch.is_lowercase() {
                return Err(GridError::NotALetter {
                    x: i % self.size,
                    y: i / self.size,
                    ch,
                });
            }
        }

        let word_length = self.target_word.chars().count();

        if self.path.len() != word_length {
            return Err(GridError::PathLength {
                expected: word_length,
                found: self.path.len(),
            });
        }

        let mut visited = HashSet::with_capacity(self.path.len());

        for (index, (&pos, expected)) in self.path
            .iter()
            .zip(self.target_word.chars())
            .enumerate()
        {
            if pos.x >= self.size || pos.y >= self.size {
                return Err(GridError::PathOutOfBounds { index });
            }

            if !visited.insert(pos) {
                return Err(GridError::PathRepeats { index });
            }

            if index > 0 && !self.path[index - 1].is_adjacent(pos) {
                return Err(GridError::PathNotAdjacent { index });
            }

            let found = self.letter_at(pos);

            if found != expected {
                return Err(GridError::PathMismatch { index, expected, found });
            }
        }

        Ok(())
    }

    pub fn target_word(&self) -> &str {
        &self.target_word
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    pub fn letter_at(&self, pos: Position) -> char {
        self.cells[pos.y * self.size + pos.x]
    }

    pub fn is_on_path(&self, pos: Position) -> bool {
        self.path.contains(&pos)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.size.max(1))
    }

    pub fn spelled_word(&self) -> String {
        self.path.iter().map(|&pos| self.letter_at(pos)).collect()
    }

    // Word letters in uppercase, noise in lowercase
    pub fn highlighted(&self) -> Highlighted {
        Highlighted { puzzle: self }
    }
}

impl fmt::Display for GridPuzzle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }

            for &ch in row {
                write!(f, "{}", ch)?;
            }
        }

        Ok(())
    }
}

pub struct Highlighted<'a> {
    puzzle: &'a GridPuzzle,
}

impl<'a> fmt::Display for Highlighted<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (y, row) in self.puzzle.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }

            for (x, &ch) in row.iter().enumerate() {
                if self.puzzle.is_on_path(Position::new(x, y)) {
                    write!(f, "{}", ch)?;
                } else {
                    write!(f, "{}", ch.to_lowercase())?;
                }
            }
        }

        Ok(())
    }
}

impl From<GridPuzzle> for GridPuzzleData {
    fn from(puzzle: GridPuzzle) -> GridPuzzleData {
        GridPuzzleData {
            rows: puzzle.rows().map(|row| row.iter().collect()).collect(),
            word: puzzle.target_word,
            size: puzzle.size,
            path: puzzle.path,
        }
    }
}

impl TryFrom<GridPuzzleData> for GridPuzzle {
    type Error = GridError;

    fn try_from(data: GridPuzzleData) -> Result<GridPuzzle, GridError> {
        if data.rows.len() != data.size {
            return Err(GridError::WrongRowCount {
                expected: data.size,
                found: data.rows.len(),
            });
        }

        let mut cells = Vec::with_capacity(data.size * data.size);

        for (row_num, row) in data.rows.iter().enumerate() {
            let length = row.chars().count();

            if length != data.size {
                return Err(GridError::WrongRowLength {
                    row: row_num,
                    expected: data.size,
                    found: length,
                });
            }

            cells.extend(row.chars());
        }

        GridPuzzle::new(&data.word, data.size, cells, data.path)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn make_test_puzzle() -> GridPuzzle {
        GridPuzzle::new(
            "NILE",
            3,
            "NIQ\
             ELX\
             ABC".chars().collect(),
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(1, 1),
                Position::new(0, 1),
            ],
        ).unwrap()
    }

    #[test]
    fn display() {
        let puzzle = make_test_puzzle();

        assert_eq!(&puzzle.to_string(), "NIQ\nELX\nABC");
        assert_eq!(&puzzle.highlighted().to_string(), "NIq\nELx\nabc");
        assert_eq!(&puzzle.spelled_word(), "NILE");
    }

    #[test]
    fn adjacency() {
        assert!(Position::new(1, 1).is_adjacent(Position::new(1, 2)));
        assert!(Position::new(1, 1).is_adjacent(Position::new(0, 1)));
        assert!(!Position::new(1, 1).is_adjacent(Position::new(2, 2)));
        assert!(!Position::new(1, 1).is_adjacent(Position::new(1, 1)));
        assert!(!Position::new(0, 0).is_adjacent(Position::new(2, 0)));
        assert_eq!(Position::new(3, 0).to_string(), "(3,0)");
    }

    #[test]
    fn bad_paths() {
        let cells = "NIQELXABC".chars().collect::<Vec<char>>();

        assert_eq!(
            GridPuzzle::new(
                "NIL",
                3,
                cells.clone(),
                vec![
                    Position::new(0, 0),
                    Position::new(1, 0),
                    Position::new(1, 0),
                ],
            ).unwrap_err(),
            GridError::PathRepeats { index: 2 },
        );

        assert_eq!(
            GridPuzzle::new(
                "NIX",
                3,
                cells.clone(),
                vec![
                    Position::new(0, 0),
                    Position::new(1, 0),
                    Position::new(2, 1),
                ],
            ).unwrap_err(),
            GridError::PathNotAdjacent { index: 2 },
        );

        assert_eq!(
            GridPuzzle::new(
                "NIL",
                3,
                cells.clone(),
                vec![
                    Position::new(0, 0),
                    Position::new(1, 0),
                    Position::new(2, 0),
                ],
            ).unwrap_err(),
            GridError::PathMismatch { index: 2, expected: 'L', found: 'Q' },
        );

        assert_eq!(
            GridPuzzle::new(
                "NILE",
                3,
                cells.clone(),
                vec![Position::new(0, 0)],
            ).unwrap_err(),
            GridError::PathLength { expected: 4, found: 1 },
        );

        assert_eq!(
            GridPuzzle::new(
                "N",
                3,
                cells,
                vec![Position::new(3, 0)],
            ).unwrap_err(),
            GridError::PathOutOfBounds { index: 0 },
        );
    }

    #[test]
    fn bad_cells() {
        assert_eq!(
            GridPuzzle::new(
                "N",
                2,
                "Nx?A".chars().collect(),
                vec![Position::new(0, 0)],
            ).unwrap_err(),
            GridError::NotALetter { x: 1, y: 0, ch: 'x' },
        );
    }

    #[test]
    fn serde() {
        let puzzle = make_test_puzzle();
        let json = serde_json::to_string(&puzzle).unwrap();

        assert_eq!(
            &json,
            "{\"word\":\"NILE\",\"size\":3,\
             \"rows\":[\"NIQ\",\"ELX\",\"ABC\"],\
             \"path\":[{\"x\":0,\"y\":0},{\"x\":1,\"y\":0},\
             {\"x\":1,\"y\":1},{\"x\":0,\"y\":1}]}",
        );

        assert_eq!(serde_json::from_str::<GridPuzzle>(&json).unwrap(), puzzle);
    }

    #[test]
    fn corrupt_save() {
        let error = serde_json::from_str::<GridPuzzle>(
            "{\"word\":\"NILE\",\"size\":3,\
             \"rows\":[\"NIQ\",\"ELX\",\"AB\"],\
             \"path\":[]}",
        ).unwrap_err();

        assert!(error.to_string().starts_with(
            "row 3: expected 3 letters but found 2"
        ));

        let error = serde_json::from_str::<GridPuzzle>(
            "{\"word\":\"NILE\",\"size\":3,\
             \"rows\":[\"NIQ\",\"ELX\",\"ABC\"],\
             \"path\":[{\"x\":0,\"y\":0},{\"x\":1,\"y\":0},\
             {\"x\":1,\"y\":1},{\"x\":2,\"y\":1}]}",
        ).unwrap_err();

        assert!(error.to_string().starts_with(
            "path cell 3 contains X instead of E"
        ));
    }
}
