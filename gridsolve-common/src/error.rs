use thiserror::Error;

/// Typed outcomes of the search engines. All variants are recoverable;
/// callers decide how to present them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The grid is not a well-formed puzzle state.
    #[error("Malformed grid: {0}")]
    MalformedGrid(String),

    /// The start grid has odd inversion parity and cannot reach the goal.
    #[error("The puzzle is not solvable")]
    Unsolvable,

    /// Backtracking exhausted every placement for the first column.
    #[error("No arrangement of non-attacking queens exists")]
    NoSolution,

    /// The board size must be at least 1.
    #[error("Invalid board size: {0}")]
    InvalidBoardSize(usize),

    /// The cancellation token was triggered mid-search.
    #[error("The search was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, SolveError>;
