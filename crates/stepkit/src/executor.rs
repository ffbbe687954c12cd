//! Execution engine - probes each step and remediates only when needed

use crate::context::{NoObserver, StepObserver};
use crate::step::InstallStep;
use crate::types::{ProbeState, Requirement, RunSummary, StepOutcome};

/// Run a single step
///
/// The precondition is probed first. If it holds, the step is
/// [`StepOutcome::AlreadySatisfied`] and `remediate` is never called. A probe
/// that itself errors is a failure, not a reason to remediate blindly.
pub fn run_step(step: &dyn InstallStep) -> StepOutcome {
    match step.precondition() {
        Ok(ProbeState::Satisfied { details }) => {
            match details {
                Some(d) => log::debug!("{}: satisfied by {d}", step.id()),
                None => log::debug!("{}: satisfied", step.id()),
            }
            StepOutcome::AlreadySatisfied
        }
        Ok(ProbeState::Unsatisfied) => {
            log::info!("{}: remediating", step.id());
            match step.remediate() {
                Ok(()) => StepOutcome::Remediated,
                Err(e) => {
                    log::debug!("{}: remediation failed: {e}", step.id());
                    StepOutcome::Failed(e)
                }
            }
        }
        Err(e) => {
            log::debug!("{}: precondition probe failed: {e}", step.id());
            StepOutcome::Failed(e)
        }
    }
}

/// Run a single step, notifying `observer` before and after
pub fn run_step_observed<O: StepObserver + ?Sized>(
    step: &dyn InstallStep,
    observer: &mut O,
) -> StepOutcome {
    observer.on_step_start(step.id(), &step.label());
    let outcome = run_step(step);
    observer.on_step_complete(step.id(), &outcome);
    outcome
}

/// Outcome of running steps in order
#[derive(Debug, Default)]
pub struct SequenceReport {
    /// Outcome per step that ran, in order
    pub outcomes: Vec<(&'static str, StepOutcome)>,
    /// Counts, including steps skipped after a halt
    pub summary: RunSummary,
    /// Id of the mandatory step whose failure stopped the sequence
    pub halted_at: Option<&'static str>,
}

impl SequenceReport {
    /// Check if the sequence ran to completion without a fatal failure
    pub fn is_success(&self) -> bool {
        self.halted_at.is_none()
    }

    /// The failure that halted the sequence, if any
    pub fn fatal(&self) -> Option<(&'static str, &StepOutcome)> {
        let id = self.halted_at?;
        self.outcomes
            .iter()
            .find(|(step_id, _)| *step_id == id)
            .map(|(step_id, outcome)| (*step_id, outcome))
    }
}

/// Run steps in order, stopping at the first failed mandatory step
///
/// Failed optional steps are recorded and the sequence continues.
pub fn run_sequence<O: StepObserver + ?Sized>(
    steps: &[&dyn InstallStep],
    observer: &mut O,
) -> SequenceReport {
    let mut report = SequenceReport::default();

    for (index, step) in steps.iter().enumerate() {
        let outcome = run_step_observed(*step, observer);
        report.summary.add_outcome(&outcome);
        let fatal = !outcome.is_success() && step.requirement() == Requirement::Mandatory;
        report.outcomes.push((step.id(), outcome));

        if fatal {
            report.halted_at = Some(step.id());
            report.summary.skipped = steps.len() - index - 1;
            break;
        }
    }

    report
}

/// Run steps without notifications
pub fn run_sequence_simple(steps: &[&dyn InstallStep]) -> SequenceReport {
    run_sequence(steps, &mut NoObserver)
}
