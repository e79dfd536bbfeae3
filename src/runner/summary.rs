//! Per-target outcomes and the run summary
//!
//! Outcomes are finalized exactly once, when a target's guard or action
//! completes, and never mutated afterwards. The summary owns the outcome
//! collection for a single invocation; nothing is cached across runs.

use crate::error::{ExecutionError, ExecutionResult};
use std::time::Duration;

/// Final state of one target within a run
#[derive(Debug)]
pub enum TargetOutcome {
    Succeeded,
    Skipped { reason: String },
    Failed { error: ExecutionError },
}

impl TargetOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, TargetOutcome::Failed { .. })
    }
}

/// One target's record within a run
#[derive(Debug)]
pub struct TargetRun {
    pub name: String,
    pub outcome: TargetOutcome,
    pub duration: Duration,
}

/// Overall verdict of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunVerdict {
    /// Every dispatched target succeeded or was skipped
    Success,
    /// A target failed; nothing after it was dispatched
    Failure { target: String },
    /// The cancellation flag was raised; remaining targets were not dispatched
    Interrupted,
}

/// Ordered record of a single engine invocation
#[derive(Debug)]
pub struct RunSummary {
    runs: Vec<TargetRun>,
    verdict: RunVerdict,
    elapsed: Duration,
}

impl RunSummary {
    pub(crate) fn new(runs: Vec<TargetRun>, verdict: RunVerdict, elapsed: Duration) -> Self {
        RunSummary {
            runs,
            verdict,
            elapsed,
        }
    }

    /// Per-target records in dispatch order
    pub fn runs(&self) -> &[TargetRun] {
        &self.runs
    }

    pub fn verdict(&self) -> &RunVerdict {
        &self.verdict
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn succeeded(&self) -> bool {
        self.verdict == RunVerdict::Success
    }

    /// The first failing target and its error, if any
    pub fn first_failure(&self) -> Option<(&str, &ExecutionError)> {
        self.runs.iter().find_map(|run| match &run.outcome {
            TargetOutcome::Failed { error } => Some((run.name.as_str(), error)),
            _ => None,
        })
    }

    /// Collapse the summary into a result suitable for exit-code mapping
    pub fn into_result(self) -> ExecutionResult<()> {
        match self.verdict {
            RunVerdict::Success => Ok(()),
            RunVerdict::Interrupted => Err(ExecutionError::Interrupted),
            RunVerdict::Failure { target } => {
                let cause = self
                    .runs
                    .into_iter()
                    .find_map(|run| match run.outcome {
                        TargetOutcome::Failed { error } if run.name == target => Some(error),
                        _ => None,
                    })
                    .unwrap_or(ExecutionError::Interrupted);
                Err(ExecutionError::TargetFailed {
                    target,
                    cause: Box::new(cause),
                })
            }
        }
    }
}
