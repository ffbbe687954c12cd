//! Read-only probing of steps, for reports

use crate::error::StepError;
use crate::step::InstallStep;
use crate::types::ProbeState;

/// Probe result for one step
#[derive(Debug)]
pub struct ProbeReport {
    pub id: &'static str,
    pub label: String,
    pub state: Result<ProbeState, StepError>,
}

impl ProbeReport {
    /// Check if the step would need remediation (or could not be probed)
    pub fn needs_attention(&self) -> bool {
        !matches!(self.state, Ok(ProbeState::Satisfied { .. }))
    }
}

/// Probe every step's precondition without remediating anything
pub fn probe_all(steps: &[&dyn InstallStep]) -> Vec<ProbeReport> {
    steps
        .iter()
        .map(|step| ProbeReport {
            id: step.id(),
            label: step.label(),
            state: step.precondition(),
        })
        .collect()
}

/// Count steps that need attention
pub fn count_attention(reports: &[ProbeReport]) -> usize {
    reports.iter().filter(|r| r.needs_attention()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FixedStep(Option<bool>);

    impl InstallStep for FixedStep {
        fn id(&self) -> &'static str {
            "fixed"
        }

        fn label(&self) -> String {
            "Fixed".to_string()
        }

        fn precondition(&self) -> Result<ProbeState, StepError> {
            match self.0 {
                Some(true) => Ok(ProbeState::satisfied()),
                Some(false) => Ok(ProbeState::Unsatisfied),
                None => Err(StepError::UnsupportedPlatform("riscv64".into())),
            }
        }

        fn remediate(&self) -> Result<(), StepError> {
            panic!("probing must not remediate");
        }
    }

    #[test]
    fn test_probe_all_never_remediates() {
        let ok = FixedStep(Some(true));
        let missing = FixedStep(Some(false));
        let broken = FixedStep(None);

        let reports = probe_all(&[&ok, &missing, &broken]);

        assert_eq!(reports.len(), 3);
        assert!(!reports[0].needs_attention());
        assert!(reports[1].needs_attention());
        assert!(reports[2].needs_attention());
        assert_eq!(count_attention(&reports), 2);
    }
}
