use std::fmt;

use stepkit::{InstallStep, ProbeState, StepError, probe_paths};

use super::StepContext;

/// Java runtime presence
pub struct RuntimeStep<'a> {
    ctx: &'a StepContext<'a>,
}

impl<'a> RuntimeStep<'a> {
    pub fn new(ctx: &'a StepContext<'a>) -> Self {
        Self { ctx }
    }
}

impl fmt::Debug for RuntimeStep<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeStep")
            .field("config", &self.ctx.config.runtime)
            .finish()
    }
}

impl InstallStep for RuntimeStep<'_> {
    fn id(&self) -> &'static str {
        "runtime"
    }

    fn label(&self) -> String {
        "Java runtime".to_string()
    }

    fn precondition(&self) -> Result<ProbeState, StepError> {
        Ok(probe_paths(&self.ctx.config.runtime.probe_paths))
    }

    fn remediate(&self) -> Result<(), StepError> {
        let packages: Vec<&str> = self
            .ctx
            .config
            .runtime
            .packages
            .iter()
            .map(String::as_str)
            .collect();
        self.ctx
            .reporter
            .info(&format!("Installing {}...", packages.join(" ")));
        self.ctx.packages.install(&packages)
    }
}
