use crate::error::SolveError;

use smallvec::SmallVec;
use std::fmt;

const INLINE_CELLS: usize = 64;

/// Diagonal rays walked outward from a candidate square.
const RAYS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// An N×N occupancy board for the queens engine.
///
/// The board is owned by a single in-flight search and mutated in place:
/// every [`QueenBoard::place`] is paired with a [`QueenBoard::unplace`]
/// when the branch is abandoned, so the safety invariant (no two queens
/// sharing a row, column, or diagonal among decided columns) holds by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueenBoard {
    n: usize,
    cells: SmallVec<[u8; INLINE_CELLS]>,
}

impl QueenBoard {
    pub fn new(n: usize) -> Result<Self, SolveError> {
        if n == 0 {
            return Err(SolveError::InvalidBoardSize(n));
        }
        Ok(Self {
            n,
            cells: SmallVec::from_elem(0, n * n),
        })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn has_queen(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.n + col] == 1
    }

    pub fn place(&mut self, row: usize, col: usize) {
        self.cells[row * self.n + col] = 1;
    }

    pub fn unplace(&mut self, row: usize, col: usize) {
        self.cells[row * self.n + col] = 0;
    }

    /// All queen positions in row-major order.
    pub fn queens(&self) -> Vec<(usize, usize)> {
        (0..self.n * self.n)
            .filter(|&idx| self.cells[idx] == 1)
            .map(|idx| (idx / self.n, idx % self.n))
            .collect()
    }

    pub fn is_row_free(&self, row: usize) -> bool {
        (0..self.n).all(|col| !self.has_queen(row, col))
    }

    /// No queen in the already-decided columns `[0, col)` of `row`.
    pub fn is_column_safe(&self, row: usize, col: usize) -> bool {
        (0..col).all(|c| !self.has_queen(row, c))
    }

    /// Walks the four diagonal rays outward from `(row, col)`, stopping
    /// at the first queen or the board edge.
    pub fn is_diagonal_safe(&self, row: usize, col: usize) -> bool {
        let n = self.n as isize;
        for (row_step, col_step) in RAYS {
            let mut r = row as isize + row_step;
            let mut c = col as isize + col_step;
            while r >= 0 && r < n && c >= 0 && c < n {
                if self.has_queen(r as usize, c as usize) {
                    return false;
                }
                r += row_step;
                c += col_step;
            }
        }
        true
    }

    pub fn is_safe(&self, row: usize, col: usize) -> bool {
        self.is_row_free(row) && self.is_column_safe(row, col) && self.is_diagonal_safe(row, col)
    }
}

impl fmt::Display for QueenBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.n {
            for col in 0..self.n {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", if self.has_queen(row, col) { 'Q' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
