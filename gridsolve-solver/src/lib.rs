//! Search engines for grid puzzles: best-first A* over sliding-tile
//! states, and column-wise backtracking for N-queens.

mod astar;
mod queens;

pub use crate::astar::{Outcome, PuzzleSolver, SearchNode, SolveResult, solve_puzzle};
pub use crate::queens::{QueensResult, QueensSolver, solve_queens};
