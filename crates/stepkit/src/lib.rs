//! # stepkit
//!
//! Precondition-checked, idempotent install steps.
//!
//! ## Core Concepts
//!
//! - **InstallStep**: A unit of work that can probe whether its effect is
//!   already in place and produce it when it is not
//! - **StepOutcome**: `AlreadySatisfied`, `Remediated` or `Failed`
//! - **Requirement**: Whether a failure stops the whole run
//! - **Executor**: Runs steps, remediating only unsatisfied ones
//!
//! ## Provider Traits
//!
//! Steps receive their side-effecting collaborators instead of reaching for
//! globals:
//!
//! - [`PackageManager`]: Installs system packages
//! - [`Reporter`]: Operator-facing messages
//! - [`StepObserver`]: Start/complete notifications from the executor
//!
//! [`MockPackageManager`] and [`MemoryReporter`] stand in for both in tests.

pub mod context;
pub mod error;
pub mod executor;
pub mod probe;
pub mod step;
pub mod types;

// Re-export main types at crate root
pub use context::{
    Level, MemoryReporter, MockPackageManager, NoObserver, PackageCall, PackageManager, Reporter,
    ReporterObserver, StepObserver,
};
pub use error::{ErrorCategory, StepError};
pub use executor::{SequenceReport, run_sequence, run_sequence_simple, run_step, run_step_observed};
pub use probe::{ProbeReport, count_attention, probe_all};
pub use step::{InstallStep, probe_paths};
pub use types::{ProbeState, Requirement, RunSummary, StepOutcome};
