use stepkit::{InstallStep, ProbeState, Requirement, StepError};

/// LLOneBot bridge plugin. Offered as a choice, not installable yet.
#[derive(Debug)]
pub struct LlOneBotStep;

impl InstallStep for LlOneBotStep {
    fn id(&self) -> &'static str {
        "llonebot"
    }

    fn label(&self) -> String {
        "LLOneBot plugin".to_string()
    }

    fn requirement(&self) -> Requirement {
        Requirement::Optional
    }

    fn precondition(&self) -> Result<ProbeState, StepError> {
        Ok(ProbeState::Unsatisfied)
    }

    fn remediate(&self) -> Result<(), StepError> {
        Err(StepError::NotImplemented(
            "LLOneBot installation".to_string(),
        ))
    }
}
