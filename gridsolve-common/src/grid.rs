use crate::error::SolveError;

use smallvec::SmallVec;
use std::fmt;

/// Sentinel value for the blank cell.
pub const BLANK: u8 = 0;

/// Largest supported board width; tiles are stored as `u8`, so the tile
/// alphabet `1..=N²-1` must fit in one byte.
pub const MAX_WIDTH: usize = 16;

const INLINE_CELLS: usize = MAX_WIDTH;

/// An N×N sliding-tile grid with a single blank cell.
///
/// Grids are value types: every move produces a new grid and the
/// original is never mutated. A `Grid` obtained from [`Grid::parse`] or
/// [`Grid::from_rows`] always satisfies the well-formedness invariant
/// (square, exactly one blank, tiles unique and drawn from `1..N²`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    n: usize,
    cells: SmallVec<[u8; INLINE_CELLS]>,
}

impl Grid {
    /// Builds a grid from row vectors, validating the invariant.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, SolveError> {
        let n = rows.len();
        if n == 0 {
            return Err(SolveError::MalformedGrid("the grid is empty".into()));
        }
        if n > MAX_WIDTH {
            return Err(SolveError::MalformedGrid(format!(
                "the grid is {n}×{n}; at most {MAX_WIDTH}×{MAX_WIDTH} is supported"
            )));
        }
        let mut cells: SmallVec<[u8; INLINE_CELLS]> = SmallVec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(SolveError::MalformedGrid(format!(
                    "expected {n} cells per row, found a row with {}",
                    row.len()
                )));
            }
            cells.extend_from_slice(row);
        }

        let mut seen = [false; 256];
        let mut blanks = 0;
        for &cell in &cells {
            if cell == BLANK {
                blanks += 1;
                continue;
            }
            if cell as usize >= n * n {
                return Err(SolveError::MalformedGrid(format!(
                    "tile {cell} is out of range for a {n}×{n} grid"
                )));
            }
            if seen[cell as usize] {
                return Err(SolveError::MalformedGrid(format!("duplicate tile {cell}")));
            }
            seen[cell as usize] = true;
        }
        if blanks != 1 {
            return Err(SolveError::MalformedGrid(format!(
                "expected exactly one blank, found {blanks}"
            )));
        }

        Ok(Self { n, cells })
    }

    /// Parses the whitespace-separated text form, `_` marking the blank:
    ///
    /// ```text
    /// 2 5 4
    /// 1 _ 6
    /// 3 7 8
    /// ```
    pub fn parse(text: &str) -> Result<Self, SolveError> {
        let mut rows = vec![];
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let mut row = vec![];
            for token in line.split_whitespace() {
                let cell = if token == "_" {
                    BLANK
                } else {
                    token.parse::<u8>().map_err(|_| {
                        SolveError::MalformedGrid(format!("invalid tile {token:?}"))
                    })?
                };
                row.push(cell);
            }
            rows.push(row);
        }
        Self::from_rows(&rows)
    }

    /// The solved grid of width `n`: tiles in ascending order with the
    /// blank in the last cell.
    pub fn solved(n: usize) -> Result<Self, SolveError> {
        if n == 0 || n > MAX_WIDTH {
            return Err(SolveError::InvalidBoardSize(n));
        }
        let mut cells: SmallVec<[u8; INLINE_CELLS]> = (1..=(n * n - 1) as u8).collect();
        cells.push(BLANK);
        Ok(Self { n, cells })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.n + col]
    }

    /// Row-major scan for the blank. Total for well-formed grids; a grid
    /// without a blank cannot be constructed through the public API.
    pub fn blank_position(&self) -> Result<(usize, usize), SolveError> {
        match self.cells.iter().position(|&cell| cell == BLANK) {
            Some(idx) => Ok((idx / self.n, idx % self.n)),
            None => Err(SolveError::MalformedGrid("no blank cell".into())),
        }
    }

    /// New grid with the values at `a` and `b` exchanged. Callers
    /// bounds-check first; see [`Grid::attempt_move`].
    pub fn swapped(&self, a: (usize, usize), b: (usize, usize)) -> Self {
        let mut cells = self.cells.clone();
        cells.swap(a.0 * self.n + a.1, b.0 * self.n + b.1);
        Self { n: self.n, cells }
    }

    /// Moves the blank to `target`, or `None` when the target lies
    /// outside the board. `target` is signed so callers can offset the
    /// blank position without underflow checks.
    pub fn attempt_move(&self, blank: (usize, usize), target: (isize, isize)) -> Option<Self> {
        let n = self.n as isize;
        if target.0 < 0 || target.0 >= n || target.1 < 0 || target.1 >= n {
            return None;
        }
        Some(self.swapped(blank, (target.0 as usize, target.1 as usize)))
    }

    /// Inversion-parity solvability test: the tiles are flattened in
    /// row-major order with the blank excluded, and the instance is
    /// solvable iff the number of out-of-order pairs is even.
    ///
    /// This is the classic rule for odd-width boards. Even-width boards
    /// additionally depend on the blank's row; that refinement is a
    /// known limitation and is not implemented.
    pub fn is_solvable(&self) -> bool {
        let tiles: SmallVec<[u8; INLINE_CELLS]> = self
            .cells
            .iter()
            .copied()
            .filter(|&cell| cell != BLANK)
            .collect();
        let mut inversions = 0;
        for i in 0..tiles.len() {
            for j in (i + 1)..tiles.len() {
                if tiles[i] > tiles[j] {
                    inversions += 1;
                }
            }
        }
        inversions % 2 == 0
    }

    /// Number of tiles out of place relative to `goal`, blank excluded.
    /// Admissible and consistent for unit-cost moves.
    pub fn misplaced_count(&self, goal: &Grid) -> usize {
        self.cells
            .iter()
            .zip(goal.cells.iter())
            .filter(|&(&cell, &goal_cell)| cell != BLANK && cell != goal_cell)
            .count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.n {
            for col in 0..self.n {
                if col > 0 {
                    write!(f, " ")?;
                }
                match self.get(row, col) {
                    BLANK => write!(f, "_")?,
                    cell => write!(f, "{cell}")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_3x3() -> Grid {
        Grid::parse("2 5 4\n1 _ 6\n3 7 8").unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let grid = grid_3x3();
        assert_eq!(grid.size(), 3);
        assert_eq!(grid.get(0, 0), 2);
        assert_eq!(grid.get(1, 1), BLANK);
        assert_eq!(grid.blank_position().unwrap(), (1, 1));
        assert_eq!(Grid::parse(&grid.to_string()).unwrap(), grid);
    }

    #[test]
    fn test_malformed_grids() {
        // Non-square
        assert!(matches!(
            Grid::parse("1 2\n3 _ 4"),
            Err(SolveError::MalformedGrid(_))
        ));
        // Two blanks
        assert!(matches!(
            Grid::parse("1 2 3\n4 _ 5\n6 7 _"),
            Err(SolveError::MalformedGrid(_))
        ));
        // No blank
        assert!(matches!(
            Grid::parse("1 2\n3 4"),
            Err(SolveError::MalformedGrid(_))
        ));
        // Duplicate tile
        assert!(matches!(
            Grid::parse("1 2 3\n4 _ 4\n6 7 8"),
            Err(SolveError::MalformedGrid(_))
        ));
        // Tile out of range
        assert!(matches!(
            Grid::parse("1 2 3\n4 _ 9\n6 7 8"),
            Err(SolveError::MalformedGrid(_))
        ));
        // Bad token
        assert!(matches!(
            Grid::parse("1 2 3\n4 _ x\n6 7 8"),
            Err(SolveError::MalformedGrid(_))
        ));
    }

    #[test]
    fn test_solved_grid() {
        let grid = Grid::solved(3).unwrap();
        assert_eq!(grid, Grid::parse("1 2 3\n4 5 6\n7 8 _").unwrap());
        assert_eq!(grid.blank_position().unwrap(), (2, 2));
        assert!(matches!(Grid::solved(0), Err(SolveError::InvalidBoardSize(0))));
    }

    #[test]
    fn test_attempt_move_bounds() {
        let grid = Grid::solved(3).unwrap();
        let blank = grid.blank_position().unwrap();
        assert!(grid.attempt_move(blank, (2, 3)).is_none());
        assert!(grid.attempt_move(blank, (3, 2)).is_none());
        assert!(grid.attempt_move(blank, (-1, 2)).is_none());
        assert!(grid.attempt_move(blank, (2, -1)).is_none());

        let moved = grid.attempt_move(blank, (2, 1)).unwrap();
        assert_eq!(moved.get(2, 1), BLANK);
        assert_eq!(moved.get(2, 2), 8);
        // The original grid is untouched.
        assert_eq!(grid.get(2, 2), BLANK);
    }

    #[test]
    fn test_swapping_two_tiles_flips_solvability() {
        let grid = Grid::solved(3).unwrap();
        assert!(grid.is_solvable());
        let swapped = grid.swapped((0, 0), (0, 1));
        assert!(!swapped.is_solvable());
        let swapped_back = swapped.swapped((0, 0), (0, 1));
        assert!(swapped_back.is_solvable());
    }

    #[test]
    fn test_odd_parity_is_unsolvable() {
        // 2 5 4 1 6 3 7 8 flattens to 7 inversions.
        assert!(!grid_3x3().is_solvable());
    }

    #[test]
    fn test_misplaced_count() {
        let goal = Grid::solved(3).unwrap();
        assert_eq!(goal.misplaced_count(&goal), 0);
        assert_eq!(grid_3x3().misplaced_count(&goal), 7);
        // One move away from the goal: only the swapped tile counts,
        // never the blank.
        let near = goal.swapped((2, 2), (2, 1));
        assert_eq!(near.misplaced_count(&goal), 1);
    }
}
