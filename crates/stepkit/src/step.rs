//! InstallStep trait for precondition-checked remediation
//!
//! A step is a named, idempotent unit of work: it can tell whether the
//! system is already in the state it produces, and it can produce that state.

use crate::error::StepError;
use crate::types::{ProbeState, Requirement};
use std::fmt;
use std::path::Path;

/// Core trait for install steps
///
/// # Example
///
/// ```
/// use stepkit::{InstallStep, ProbeState, StepError, run_step};
///
/// #[derive(Debug)]
/// struct MarkerFile(std::path::PathBuf);
///
/// impl InstallStep for MarkerFile {
///     fn id(&self) -> &'static str {
///         "marker"
///     }
///
///     fn label(&self) -> String {
///         format!("Marker file at {}", self.0.display())
///     }
///
///     fn precondition(&self) -> Result<ProbeState, StepError> {
///         Ok(stepkit::probe_paths(&[self.0.as_path()]))
///     }
///
///     fn remediate(&self) -> Result<(), StepError> {
///         std::fs::write(&self.0, b"").map_err(|e| StepError::io(&self.0, e))
///     }
/// }
///
/// let dir = tempfile::tempdir().unwrap();
/// let step = MarkerFile(dir.path().join("marker"));
/// assert!(run_step(&step).is_change());
/// assert!(!run_step(&step).is_change());
/// ```
pub trait InstallStep: fmt::Debug {
    /// Stable identifier, e.g. "runtime" or "bridge-app"
    fn id(&self) -> &'static str;

    /// Human-readable label used in logs and operator messages
    fn label(&self) -> String;

    /// Whether a failure stops the whole run
    fn requirement(&self) -> Requirement {
        Requirement::Mandatory
    }

    /// Probe the current state without side effects
    fn precondition(&self) -> Result<ProbeState, StepError>;

    /// Bring the system into the state the precondition checks for
    ///
    /// Only called when [`precondition`](Self::precondition) reported
    /// [`ProbeState::Unsatisfied`].
    fn remediate(&self) -> Result<(), StepError>;
}

/// Satisfied if any of `paths` exists; details name the first match.
pub fn probe_paths<P: AsRef<Path>>(paths: &[P]) -> ProbeState {
    paths
        .iter()
        .map(AsRef::as_ref)
        .find(|p| p.exists())
        .map_or(ProbeState::Unsatisfied, |p| ProbeState::Satisfied {
            details: Some(p.display().to_string()),
        })
}
