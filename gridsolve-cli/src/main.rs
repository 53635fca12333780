use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use gridsolve_common::{
    error::SolveError,
    event::{NoopSink, Step, StepSink},
    grid::Grid,
};
use gridsolve_solver::{Outcome, PuzzleSolver, QueensSolver};

use std::{
    io::{IsTerminal, Read, stdin},
    path::PathBuf,
    time::Duration,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a sliding-tile puzzle with A* search
    Puzzle {
        /// File holding the goal grid (defaults to tiles in order with a
        /// trailing blank)
        #[arg(long, value_name = "FILE")]
        goal: Option<PathBuf>,
        /// Max nodes to expand before giving up
        #[arg(long, default_value_t = 1_000_000, value_name = "NUM")]
        max_nodes: usize,
        /// File holding the start grid (stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Place N non-attacking queens with backtracking
    Queens {
        /// Print every trial/commit/backtrack step
        #[arg(long)]
        trace: bool,
        /// Board size
        n: i64,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Puzzle {
            goal,
            max_nodes,
            file,
        } => run_puzzle(goal, max_nodes, file),
        Commands::Queens { trace, n } => run_queens(trace, n),
    }
}

fn run_puzzle(goal: Option<PathBuf>, max_nodes: usize, file: Option<PathBuf>) -> Result<()> {
    let content = if let Some(file) = file {
        std::fs::read_to_string(file)?
    } else if !stdin().is_terminal() {
        let mut content = String::new();
        stdin()
            .read_to_string(&mut content)
            .context("Failed to read from stdin")?;
        content
    } else {
        bail!("No start grid `file` provided.");
    };
    let start = Grid::parse(&content).context("Failed to parse the start grid")?;

    let goal = match goal {
        Some(file) => {
            let content = std::fs::read_to_string(file)?;
            Grid::parse(&content).context("Failed to parse the goal grid")?
        }
        None => Grid::solved(start.size())?,
    };

    let result = PuzzleSolver::new()
        .with_max_nodes(max_nodes)
        .solve(&start, &goal)
        .map_err(|err| match err {
            SolveError::Unsolvable => {
                anyhow::anyhow!("The start grid has odd parity; the goal is unreachable.")
            }
            err => err.into(),
        })?;

    if result.outcome == Outcome::Exhausted {
        bail!("No solution found within {} expanded nodes.", result.expanded);
    }

    for (i, node) in result.trace.iter().enumerate() {
        println!("Step {i} (depth {}, cost {}):", node.depth, node.cost);
        println!("{}", node.grid);
    }
    let elapsed = format_elapsed(result.elapsed);
    let moves = result.trace.last().map(|node| node.depth).unwrap_or(0);
    println!(
        "✓ Solved in {moves} moves. Expanded: {}, Elapsed: {elapsed}",
        result.expanded
    );

    Ok(())
}

fn run_queens(trace: bool, n: i64) -> Result<()> {
    if n <= 0 {
        bail!("Board size must be positive, got {n}.");
    }
    let n = n as usize;

    let mut sink: Box<dyn StepSink> = if trace {
        Box::new(PrintSink)
    } else {
        Box::new(NoopSink)
    };

    let result = QueensSolver::new()
        .solve(n, sink.as_mut())
        .map_err(|err| match err {
            SolveError::NoSolution => {
                anyhow::anyhow!("No solution exists for a {n}×{n} board.")
            }
            err => err.into(),
        })?;

    let elapsed = format_elapsed(result.elapsed);
    println!("{}", result.board);
    println!(
        "✓ Placed {n} queens. Trials: {}, Backtracks: {}, Elapsed: {elapsed}",
        result.trials, result.backtracks
    );

    Ok(())
}

/// Sink that prints each step as it happens.
struct PrintSink;

impl StepSink for PrintSink {
    fn on_step(&mut self, step: Step) {
        println!("{step}");
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 90 {
        let ms = elapsed.subsec_millis();
        format!("{secs}.{ms:03}s")
    } else {
        let minutes = secs / 60;
        let secs = secs % 60;
        format!("{minutes}m {secs}s")
    }
}
