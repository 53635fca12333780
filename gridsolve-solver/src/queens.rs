use gridsolve_common::board::QueenBoard;
use gridsolve_common::cancel::CancelToken;
use gridsolve_common::error::SolveError;
use gridsolve_common::event::{Step, StepSink};

use log::debug;
use std::time::{Duration, Instant};

pub fn solve_queens(n: usize, sink: &mut dyn StepSink) -> Result<QueensResult, SolveError> {
    QueensSolver::new().solve(n, sink)
}

#[derive(Debug, Clone)]
pub struct QueensResult {
    pub board: QueenBoard,
    /// Trial placements tested, safe or not.
    pub trials: usize,
    /// Committed placements later undone.
    pub backtracks: usize,
    pub elapsed: Duration,
}

/// Column-wise backtracking placement of N non-attacking queens.
///
/// Stops at the first full solution. Exploration is iterative: the
/// committed rows double as the backtrack stack, so board size never
/// pressures the call stack. Progress is reported through a [`StepSink`];
/// the engine does not care how (or whether) steps are rendered.
#[derive(Debug, Clone, Default)]
pub struct QueensSolver {
    cancel: CancelToken,
}

impl QueensSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn solve(&self, n: usize, sink: &mut dyn StepSink) -> Result<QueensResult, SolveError> {
        let timer = Instant::now();
        let mut board = QueenBoard::new(n)?;
        // Row committed in each decided column, column 0 at the bottom.
        let mut committed: Vec<usize> = Vec::with_capacity(n);
        let mut col = 0;
        let mut row = 0;
        let mut trials = 0;
        let mut backtracks = 0;

        while col < n {
            if self.cancel.is_cancelled() {
                return Err(SolveError::Cancelled);
            }

            if row == n {
                // Every row in this column failed; undo the previous
                // column's commit and resume below it.
                let Some(prev_row) = committed.pop() else {
                    debug!("column 0 exhausted after {trials} trials");
                    return Err(SolveError::NoSolution);
                };
                col -= 1;
                board.unplace(prev_row, col);
                sink.on_step(Step::Uncommit { row: prev_row, col });
                sink.on_step(Step::TrialRemove { row: prev_row, col });
                backtracks += 1;
                row = prev_row + 1;
                continue;
            }

            trials += 1;
            sink.on_step(Step::TrialPlace { row, col });
            if board.is_safe(row, col) {
                board.place(row, col);
                sink.on_step(Step::Commit { row, col });
                committed.push(row);
                col += 1;
                row = 0;
            } else {
                sink.on_step(Step::Reject { row, col });
                sink.on_step(Step::TrialRemove { row, col });
                row += 1;
            }
        }

        debug!("placed {n} queens after {trials} trials, {backtracks} backtracks");
        Ok(QueensResult {
            board,
            trials,
            backtracks,
            elapsed: timer.elapsed(),
        })
    }
}
