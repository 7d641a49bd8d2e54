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

use rand::Rng;
use rand::seq::SliceRandom;
use super::grid::{GridPuzzle, Position};

pub const DEFAULT_ATTEMPTS: u32 = 300;

static DIRECTIONS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("“{word}” has {length} letters but a {size}×{size} grid only \
             has room for {}", .size * .size)]
    WordTooLong { word: String, length: usize, size: usize },
    #[error("there are no letters to place")]
    EmptyWord,
    #[error("couldn’t place “{word}” after {attempts} attempts")]
    PlacementExhausted { word: String, attempts: u32 },
}

impl PlacementError {
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, PlacementError::PlacementExhausted { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Generator {
    attempts: u32,
}

impl Default for Generator {
    fn default() -> Generator {
        Generator::new(DEFAULT_ATTEMPTS)
    }
}

// Scratch space for growing a path so that it can be reused for every
// start cell
struct PathBuilder {
    size: usize,
    path: Vec<Position>,
    visited: Vec<bool>,
    directions: [(isize, isize); 4],
}

impl PathBuilder {
    fn new(size: usize, length: usize) -> PathBuilder {
        PathBuilder {
            size,
            path: Vec::with_capacity(length),
            visited: vec![false; size * size],
            directions: DIRECTIONS,
        }
    }

    fn clear(&mut self) {
        for pos in self.path.drain(..) {
            self.visited[pos.y * self.size + pos.x] = false;
        }
    }

    fn visit(&mut self, pos: Position) {
        self.visited[pos.y * self.size + pos.x] = true;
        self.path.push(pos);
    }

    fn step(&self, pos: Position, (dx, dy): (isize, isize)) -> Option<Position> {
        let x = pos.x.checked_add_signed(dx)?;
        let y = pos.y.checked_add_signed(dy)?;

        (x < self.size && y < self.size && !self.visited[y * self.size + x])
            .then(|| Position::new(x, y))
    }

    // Random self-avoiding walk from `start`. Gives up as soon as the
    // walk hits a dead end.
    fn grow<R: Rng + ?Sized>(
        &mut self,
        start: Position,
        length: usize,
        rng: &mut R,
    ) -> bool {
        self.clear();
        self.visit(start);

        while self.path.len() < length {
            let Some(&current) = self.path.last()
            else {
                return false;
            };

            self.directions.shuffle(rng);

            let next = self.directions
                .iter()
                .find_map(|&direction| self.step(current, direction));

            match next {
                Some(next) => self.visit(next),
                None => return false,
            }
        }

        true
    }
}

// Spaces and hyphens don’t take up cells
pub fn placeable_letters(word: &str) -> Vec<char> {
    word.chars()
        .filter(|ch| ch.is_alphabetic())
        .flat_map(|ch| ch.to_uppercase())
        .collect()
}

impl Generator {
    pub fn new(attempts: u32) -> Generator {
        Generator { attempts }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    // The word should already be uppercased for its language
    pub fn generate<R: Rng + ?Sized>(
        &self,
        word: &str,
        size: usize,
        alphabet: &[char],
        rng: &mut R,
    ) -> Result<GridPuzzle, PlacementError> {
        let letters = placeable_letters(word);

        if letters.is_empty() {
            return Err(PlacementError::EmptyWord);
        }

        if letters.len() > size * size {
            return Err(PlacementError::WordTooLong {
                word: word.to_string(),
                length: letters.len(),
                size,
            });
        }

        let mut starts = (0..size * size)
            .map(|i| Position::new(i % size, i / size))
            .collect::<Vec<_>>();
        let mut builder = PathBuilder::new(size, letters.len());

        for _ in 0..self.attempts {
            starts.shuffle(rng);

            for &start in starts.iter() {
                if builder.grow(start, letters.len(), rng) {
                    return Ok(fill_grid(
                        letters,
                        size,
                        builder.path,
                        alphabet,
                        rng,
                    ));
                }
            }
        }

        Err(PlacementError::PlacementExhausted {
            word: word.to_string(),
            attempts: self.attempts,
        })
    }
}

fn fill_grid<R: Rng + ?Sized>(
    letters: Vec<char>,
    size: usize,
    path: Vec<Position>,
    alphabet: &[char],
    rng: &mut R,
) -> GridPuzzle {
    let mut cells = vec![None; size * size];

    for (&pos, &letter) in path.iter().zip(letters.iter()) {
        cells[pos.y * size + pos.x] = Some(letter);
    }

    let cells = cells
        .into_iter()
        .map(|cell| {
            cell.unwrap_or_else(|| {
                alphabet.choose(rng).copied().unwrap_or('A')
            })
        })
        .collect();

    GridPuzzle::from_parts(letters.into_iter().collect(), size, cells, path)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use super::super::language::Language;

    fn check_puzzle(puzzle: &GridPuzzle, word: &str, size: usize) {
        assert_eq!(puzzle.size(), size);
        assert_eq!(puzzle.target_word(), word);
        assert_eq!(puzzle.path().len(), word.chars().count());
        assert_eq!(&puzzle.spelled_word(), word);

        for pair in puzzle.path().windows(2) {
            assert!(pair[0].is_adjacent(pair[1]));
        }

        let mut distinct = puzzle.path().to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        assert_eq!(distinct.len(), puzzle.path().len());

        let n_cells = puzzle.rows().flatten().count();
        assert_eq!(n_cells, size * size);
        assert!(puzzle.rows().flatten().all(|ch| ch.is_uppercase()));
    }

    #[test]
    fn pyramid() {
        let generator = Generator::default();
        let mut rng = StdRng::seed_from_u64(7);

        let puzzle = generator.generate(
            "PYRAMID",
            6,
            Language::En.alphabet(),
            &mut rng,
        ).unwrap();

        check_puzzle(&puzzle, "PYRAMID", 6);
    }

    #[test]
    fn different_seeds_give_different_paths() {
        let generator = Generator::default();

        let paths = (0..20)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);

                let puzzle = generator.generate(
                    "PYRAMID",
                    6,
                    Language::En.alphabet(),
                    &mut rng,
                ).unwrap();

                check_puzzle(&puzzle, "PYRAMID", 6);

                puzzle.path().to_vec()
            })
            .collect::<Vec<_>>();

        assert!(paths.iter().any(|path| *path != paths[0]));
    }

    #[test]
    fn same_seed_gives_same_grid() {
        let generator = Generator::default();

        let a = generator.generate(
            "SPHINX",
            5,
            Language::En.alphabet(),
            &mut StdRng::seed_from_u64(42),
        ).unwrap();
        let b = generator.generate(
            "SPHINX",
            5,
            Language::En.alphabet(),
            &mut StdRng::seed_from_u64(42),
        ).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn word_too_long() {
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            Generator::default().generate(
                "GLADIATOR",
                2,
                Language::En.alphabet(),
                &mut rng,
            ),
            Err(PlacementError::WordTooLong {
                word: "GLADIATOR".to_string(),
                length: 9,
                size: 2,
            }),
        );

        // Even with no attempts the capacity check comes first
        assert!(matches!(
            Generator::new(0).generate("AB", 1, &['A'], &mut rng),
            Err(PlacementError::WordTooLong { .. }),
        ));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            PlacementError::WordTooLong {
                word: "GLADIATOR".to_string(),
                length: 9,
                size: 2,
            }.to_string(),
            "“GLADIATOR” has 9 letters but a 2×2 grid only has room for 4",
        );
        assert_eq!(
            PlacementError::PlacementExhausted {
                word: "NILE".to_string(),
                attempts: 3,
            }.to_string(),
            "couldn’t place “NILE” after 3 attempts",
        );
    }

    #[test]
    fn empty_word() {
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            Generator::default().generate(" - ", 4, &['A'], &mut rng),
            Err(PlacementError::EmptyWord),
        );
    }

    #[test]
    fn exhausted() {
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            Generator::new(0).generate("NILE", 4, &['A'], &mut rng),
            Err(PlacementError::PlacementExhausted {
                word: "NILE".to_string(),
                attempts: 0,
            }),
        );

        // Every walk in a 2×2 grid covers all of the cells
        let puzzle = Generator::default().generate(
            "ABCD",
            2,
            &['Z'],
            &mut rng,
        ).unwrap();
        check_puzzle(&puzzle, "ABCD", 2);
    }

    #[test]
    fn full_grid() {
        let mut rng = StdRng::seed_from_u64(3);

        let puzzle = Generator::default().generate(
            "ABCDEFGHI",
            3,
            &['Z'],
            &mut rng,
        ).unwrap();

        check_puzzle(&puzzle, "ABCDEFGHI", 3);
    }

    #[test]
    fn noise_letters_come_from_alphabet() {
        let mut rng = StdRng::seed_from_u64(9);

        let puzzle = Generator::default().generate(
            "NİL",
            5,
            Language::Tr.alphabet(),
            &mut rng,
        ).unwrap();

        check_puzzle(&puzzle, "NİL", 5);

        for (y, row) in puzzle.rows().enumerate() {
            for (x, ch) in row.iter().enumerate() {
                if !puzzle.is_on_path(Position::new(x, y)) {
                    assert!(Language::Tr.alphabet().contains(ch));
                }
            }
        }
    }

    #[test]
    fn letters_are_filtered() {
        assert_eq!(
            placeable_letters("nile river"),
            "NILERIVER".chars().collect::<Vec<_>>(),
        );
        assert_eq!(placeable_letters("X-RAY"), vec!['X', 'R', 'A', 'Y']);
    }
}
