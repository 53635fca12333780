use gridsolve_common::cancel::CancelToken;
use gridsolve_common::error::SolveError;
use gridsolve_common::grid::Grid;

use log::debug;
use smallvec::SmallVec;
use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    time::{Duration, Instant},
};

const DEFAULT_MAX_NODES: usize = 1_000_000;

/// Blank offsets tried on every expansion, in fixed order (left, right,
/// up, down) so tie-breaking stays deterministic.
const MOVES: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

type Successors = SmallVec<[SearchNode; 4]>;

pub fn solve_puzzle(start: &Grid, goal: &Grid) -> Result<SolveResult, SolveError> {
    PuzzleSolver::new().solve(start, goal)
}

/// One generated state in the search tree. Nodes are immutable; each
/// generation creates a fresh node, never an in-place update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNode {
    pub grid: Grid,
    /// Moves from the start grid.
    pub depth: u32,
    /// `depth + misplaced_count`, the A* f-value.
    pub cost: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Solved,
    /// The frontier emptied or the node cap was hit before the goal was
    /// reached. The partial expansion history is still returned.
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct SolveResult {
    pub outcome: Outcome,
    /// Every expanded node in expansion order; on [`Outcome::Solved`]
    /// the last element is the goal grid.
    pub trace: Vec<SearchNode>,
    pub expanded: usize,
    pub elapsed: Duration,
}

/// A* solver for sliding-tile grids, using the misplaced-tile heuristic.
///
/// Expanded states are deliberately not deduplicated: a state may be
/// generated and expanded more than once. The heuristic is admissible,
/// so the first expansion of the goal still closes an optimal path.
#[derive(Debug, Clone)]
pub struct PuzzleSolver {
    max_nodes: usize,
    cancel: CancelToken,
}

impl Default for PuzzleSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleSolver {
    pub fn new() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            cancel: CancelToken::new(),
        }
    }

    /// Cap on expanded nodes before the search reports
    /// [`Outcome::Exhausted`].
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn solve(&self, start: &Grid, goal: &Grid) -> Result<SolveResult, SolveError> {
        if start.size() != goal.size() {
            return Err(SolveError::MalformedGrid(format!(
                "start is {0}×{0} but goal is {1}×{1}",
                start.size(),
                goal.size()
            )));
        }
        if !start.is_solvable() {
            return Err(SolveError::Unsolvable);
        }

        let timer = Instant::now();
        let mut open = BinaryHeap::new();
        let mut history: Vec<SearchNode> = vec![];
        let mut seq: u64 = 0;

        let root = SearchNode {
            grid: start.clone(),
            depth: 0,
            cost: start.misplaced_count(goal) as u32,
        };
        open.push(OpenEntry::new(root, seq));
        seq += 1;

        while let Some(entry) = open.pop() {
            if self.cancel.is_cancelled() {
                return Err(SolveError::Cancelled);
            }

            let node = entry.node;
            let remaining = node.grid.misplaced_count(goal);
            history.push(node.clone());

            if remaining == 0 {
                debug!(
                    "solved after expanding {} nodes, depth {}",
                    history.len(),
                    node.depth
                );
                let expanded = history.len();
                return Ok(SolveResult {
                    outcome: Outcome::Solved,
                    trace: history,
                    expanded,
                    elapsed: timer.elapsed(),
                });
            }
            if history.len() >= self.max_nodes {
                debug!("node cap {} reached", self.max_nodes);
                break;
            }

            for succ in self.successors(&node, goal)? {
                open.push(OpenEntry::new(succ, seq));
                seq += 1;
            }
        }

        let expanded = history.len();
        Ok(SolveResult {
            outcome: Outcome::Exhausted,
            trace: history,
            expanded,
            elapsed: timer.elapsed(),
        })
    }

    /// Up to four successors, one per legal blank move, in the fixed
    /// [`MOVES`] order.
    fn successors(&self, node: &SearchNode, goal: &Grid) -> Result<Successors, SolveError> {
        let blank = node.grid.blank_position()?;
        let mut successors = Successors::new();
        for (row_delta, col_delta) in MOVES {
            let target = (blank.0 as isize + row_delta, blank.1 as isize + col_delta);
            if let Some(grid) = node.grid.attempt_move(blank, target) {
                let depth = node.depth + 1;
                let cost = depth + grid.misplaced_count(goal) as u32;
                successors.push(SearchNode { grid, depth, cost });
            }
        }
        Ok(successors)
    }
}

/// Frontier entry. `BinaryHeap` is a max-heap, so ordering is reversed
/// on both keys: lowest cost first, oldest insertion first among ties.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenEntry {
    cost: u32,
    seq: u64,
    node: SearchNode,
}

impl OpenEntry {
    fn new(node: SearchNode, seq: u64) -> Self {
        Self {
            cost: node.cost,
            seq,
            node,
        }
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved_3x3() -> Grid {
        Grid::solved(3).unwrap()
    }

    #[test]
    fn test_solve_trivial() {
        let goal = solved_3x3();
        let result = solve_puzzle(&goal, &goal).unwrap();
        assert_eq!(result.outcome, Outcome::Solved);
        assert_eq!(result.trace.len(), 1);
        assert_eq!(result.trace[0].depth, 0);
        assert_eq!(result.trace[0].cost, 0);
    }

    #[test]
    fn test_solve_reaches_goal() {
        let start = Grid::parse("1 2 3\n5 _ 6\n4 7 8").unwrap();
        let goal = solved_3x3();
        let result = solve_puzzle(&start, &goal).unwrap();
        assert_eq!(result.outcome, Outcome::Solved);

        let first = result.trace.first().unwrap();
        assert_eq!(first.grid, start);
        let last = result.trace.last().unwrap();
        assert_eq!(last.grid, goal);
        assert_eq!(last.grid.misplaced_count(&goal), 0);
        // f = g + h and h is admissible, so the goal sits at its true
        // distance: four blank moves.
        assert_eq!(last.depth, 4);
        assert_eq!(result.expanded, result.trace.len());
    }

    #[test]
    fn test_unsolvable_rejected_before_search() {
        let start = Grid::parse("2 5 4\n1 _ 6\n3 7 8").unwrap();
        assert!(!start.is_solvable());
        let err = solve_puzzle(&start, &solved_3x3()).unwrap_err();
        assert_eq!(err, SolveError::Unsolvable);
    }

    #[test]
    fn test_size_mismatch() {
        let start = Grid::solved(4).unwrap();
        assert!(matches!(
            solve_puzzle(&start, &solved_3x3()),
            Err(SolveError::MalformedGrid(_))
        ));
    }

    #[test]
    fn test_deterministic_trace() {
        let start = Grid::parse("1 2 3\n4 5 6\n_ 7 8").unwrap();
        let goal = solved_3x3();
        let first = solve_puzzle(&start, &goal).unwrap();
        let second = solve_puzzle(&start, &goal).unwrap();
        assert_eq!(first.trace, second.trace);
        assert_eq!(first.outcome, Outcome::Solved);
        assert_eq!(first.trace.last().unwrap().depth, 2);
    }

    #[test]
    fn test_node_cap_exhausts() {
        let start = Grid::parse("1 2 3\n5 _ 6\n4 7 8").unwrap();
        let result = PuzzleSolver::new()
            .with_max_nodes(1)
            .solve(&start, &solved_3x3())
            .unwrap();
        assert_eq!(result.outcome, Outcome::Exhausted);
        assert_eq!(result.trace.len(), 1);
    }

    #[test]
    fn test_cancellation() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let start = Grid::parse("1 2 3\n5 _ 6\n4 7 8").unwrap();
        let err = PuzzleSolver::new()
            .with_cancel_token(cancel)
            .solve(&start, &solved_3x3())
            .unwrap_err();
        assert_eq!(err, SolveError::Cancelled);
    }
}
