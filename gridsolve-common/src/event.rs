use std::fmt;

/// A single observable step of the backtracking engine.
///
/// The engine guarantees the following ordering per trial square:
/// `TrialPlace` fires unconditionally before the safety test; an unsafe
/// trial is followed by `Reject` then `TrialRemove`; a safe trial is
/// followed by `Commit`, and if the columns beyond it later fail, by
/// `Uncommit` then `TrialRemove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    TrialPlace { row: usize, col: usize },
    TrialRemove { row: usize, col: usize },
    Commit { row: usize, col: usize },
    Uncommit { row: usize, col: usize },
    Reject { row: usize, col: usize },
}

impl Step {
    pub fn position(&self) -> (usize, usize) {
        match *self {
            Step::TrialPlace { row, col }
            | Step::TrialRemove { row, col }
            | Step::Commit { row, col }
            | Step::Uncommit { row, col }
            | Step::Reject { row, col } => (row, col),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (row, col) = self.position();
        let kind = match self {
            Step::TrialPlace { .. } => "try",
            Step::TrialRemove { .. } => "take back",
            Step::Commit { .. } => "commit",
            Step::Uncommit { .. } => "uncommit",
            Step::Reject { .. } => "reject",
        };
        write!(f, "{kind} ({row}, {col})")
    }
}

/// Consumer of engine steps. Front ends render them; tests record them;
/// the engine itself has no idea what happens downstream.
pub trait StepSink {
    fn on_step(&mut self, step: Step);
}

/// Sink that discards every step.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl StepSink for NoopSink {
    fn on_step(&mut self, _step: Step) {}
}

/// Sink that keeps every step, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub steps: Vec<Step>,
}

impl StepSink for RecordingSink {
    fn on_step(&mut self, step: Step) {
        self.steps.push(step);
    }
}
