//! Sequential execution engine
//!
//! The engine resolves a requested target set into a plan, then dispatches
//! one target at a time in plan order. A false guard records a skip and
//! keeps going; a failed action halts the rest of the plan; a successful
//! target with triggers re-plans the remaining tail so the triggered targets
//! (and any of their unmet dependencies) slot in with ordering preserved.
//! Nothing is retried: a wrapped call either succeeds or the run fails.

use crate::error::{ExecutionError, ExecutionResult, Result};
use crate::graph::TargetGraph;
use crate::runner::{BuildContext, RunSummary, RunVerdict, TargetOutcome, TargetRun};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runs targets from an immutable graph, one invocation at a time
pub struct Engine<'a> {
    graph: &'a TargetGraph,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> Engine<'a> {
    pub fn new(graph: &'a TargetGraph) -> Self {
        Engine {
            graph,
            cancel: None,
        }
    }

    /// Install a cancellation flag. When set, the engine stops dispatching
    /// after the currently running target finalizes; the interrupt itself
    /// reaches the child process through the terminal process group.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// Execute the requested targets and their dependency closure
    pub fn run(&self, requested: &[String], ctx: &BuildContext) -> Result<RunSummary> {
        let requested = self.graph.request_indices(requested)?;
        let plan = self.graph.plan_indices(&requested, &HashSet::new())?;

        // Requirements are checked before anything executes, so a misuse of
        // the invocation never leaves half a build behind.
        self.check_preconditions(&plan, ctx)?;

        ctx.print_debug(&format!(
            "Plan: {}",
            plan.iter()
                .map(|&i| self.graph.node(i).name())
                .collect::<Vec<_>>()
                .join(" -> ")
        ));

        let run_started = Instant::now();
        let mut pending: VecDeque<usize> = plan.into();
        let mut finalized: HashSet<usize> = HashSet::new();
        let mut runs: Vec<TargetRun> = Vec::new();
        let mut verdict = RunVerdict::Success;

        'dispatch: while let Some(i) = pending.pop_front() {
            if self.cancelled() {
                ctx.print_error("Interrupted; remaining targets will not run");
                verdict = RunVerdict::Interrupted;
                break;
            }

            let target = self.graph.node(i);

            if let Some(guard) = target.guard() {
                if !guard.evaluate(ctx) {
                    ctx.print_target_skip(target.name(), guard.description());
                    runs.push(TargetRun {
                        name: target.name().to_string(),
                        outcome: TargetOutcome::Skipped {
                            reason: guard.description().to_string(),
                        },
                        duration: Duration::ZERO,
                    });
                    // A skipped dependency still satisfies its dependents.
                    finalized.insert(i);
                    continue;
                }
            }

            ctx.print_target_start(target.name());
            let started = Instant::now();
            match target.execute(ctx) {
                Ok(()) => {
                    runs.push(TargetRun {
                        name: target.name().to_string(),
                        outcome: TargetOutcome::Succeeded,
                        duration: started.elapsed(),
                    });
                    finalized.insert(i);

                    if let Some(failed) =
                        self.append_triggers(i, &mut pending, &finalized, ctx, &mut runs)?
                    {
                        verdict = RunVerdict::Failure { target: failed };
                        break 'dispatch;
                    }
                }
                Err(error) => {
                    ctx.print_error(&format!("Target '{}' failed: {}", target.name(), error));
                    verdict = RunVerdict::Failure {
                        target: target.name().to_string(),
                    };
                    runs.push(TargetRun {
                        name: target.name().to_string(),
                        outcome: TargetOutcome::Failed { error },
                        duration: started.elapsed(),
                    });
                    break;
                }
            }
        }

        Ok(RunSummary::new(runs, verdict, run_started.elapsed()))
    }

    /// Schedule the finished target's triggers that are not already planned
    /// or finalized. The remaining tail is re-resolved as a whole so soft
    /// ordering between old and new entries holds. Returns the name of a
    /// target whose precondition failed at append time, if any.
    fn append_triggers(
        &self,
        finished: usize,
        pending: &mut VecDeque<usize>,
        finalized: &HashSet<usize>,
        ctx: &BuildContext,
        runs: &mut Vec<TargetRun>,
    ) -> Result<Option<String>> {
        let target = self.graph.node(finished);
        let new_triggers: Vec<usize> = target
            .trigger_names()
            .iter()
            .filter_map(|name| self.graph.index_of(name))
            .filter(|t| !finalized.contains(t) && !pending.contains(t))
            .collect();

        if new_triggers.is_empty() {
            return Ok(None);
        }

        for &t in &new_triggers {
            ctx.print_debug(&format!(
                "Target '{}' triggers '{}'",
                target.name(),
                self.graph.node(t).name()
            ));
        }

        let previously_planned: HashSet<usize> = pending.iter().copied().collect();
        let mut want: Vec<usize> = pending.iter().copied().collect();
        want.extend(new_triggers);
        let replanned = self.graph.plan_indices(&want, finalized)?;

        // Triggered targets and their freshly pulled-in dependencies get the
        // same requirement treatment the initial plan got.
        let appended: Vec<usize> = replanned
            .iter()
            .copied()
            .filter(|i| !previously_planned.contains(i))
            .collect();
        if let Err(error) = self.check_preconditions(&appended, ctx) {
            let failed = match &error {
                ExecutionError::PreconditionFailed { target, .. } => target.clone(),
                _ => target.name().to_string(),
            };
            ctx.print_error(&format!("{error}"));
            runs.push(TargetRun {
                name: failed.clone(),
                outcome: TargetOutcome::Failed { error },
                duration: Duration::ZERO,
            });
            return Ok(Some(failed));
        }

        *pending = replanned.into();
        Ok(None)
    }

    fn check_preconditions(&self, indices: &[usize], ctx: &BuildContext) -> ExecutionResult<()> {
        for &i in indices {
            let target = self.graph.node(i);
            for guard in target.preconditions() {
                if !guard.evaluate(ctx) {
                    return Err(ExecutionError::PreconditionFailed {
                        target: target.name().to_string(),
                        requirement: guard.description().to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
