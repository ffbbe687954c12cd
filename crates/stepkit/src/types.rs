//! Core types for step execution

use crate::error::StepError;

/// Whether a step's failure stops the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Requirement {
    /// Failure is fatal for the run
    #[default]
    Mandatory,
    /// Failure aborts only the branch that chose this step
    Optional,
}

/// Result of probing a step's precondition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeState {
    /// Precondition holds; `details` names what satisfied it
    Satisfied { details: Option<String> },
    /// Precondition does not hold; remediation is needed
    Unsatisfied,
}

impl ProbeState {
    /// Satisfied without details
    pub fn satisfied() -> Self {
        Self::Satisfied { details: None }
    }

    /// Check if the precondition holds
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied { .. })
    }
}

/// Tri-state result of running a step
#[derive(Debug)]
pub enum StepOutcome {
    /// Precondition already held; nothing was done
    AlreadySatisfied,
    /// Remediation ran and succeeded
    Remediated,
    /// Probe or remediation failed
    Failed(StepError),
}

impl StepOutcome {
    /// Check if the outcome represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// Check if the step changed the system
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Remediated)
    }

    /// The failure, if any
    pub fn failure(&self) -> Option<&StepError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Summary of a sequence of step outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub satisfied: usize,
    pub remediated: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    /// Check if every step that ran succeeded
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Total number of steps accounted for
    pub fn total(&self) -> usize {
        self.satisfied + self.remediated + self.failed + self.skipped
    }

    /// Add an outcome to the summary
    pub fn add_outcome(&mut self, outcome: &StepOutcome) {
        match outcome {
            StepOutcome::AlreadySatisfied => self.satisfied += 1,
            StepOutcome::Remediated => self.remediated += 1,
            StepOutcome::Failed(_) => self.failed += 1,
        }
    }
}
