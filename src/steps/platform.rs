use std::fmt;

use stepkit::{InstallStep, ProbeState, StepError};

use super::StepContext;

/// Refuses to continue on machines we cannot bootstrap
///
/// Needs a unix OS family and apt. There is no remediation: an unsupported
/// machine fails the probe.
pub struct PlatformGate<'a> {
    ctx: &'a StepContext<'a>,
}

impl<'a> PlatformGate<'a> {
    pub fn new(ctx: &'a StepContext<'a>) -> Self {
        Self { ctx }
    }
}

impl fmt::Debug for PlatformGate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformGate")
            .field("platform", self.ctx.platform)
            .finish()
    }
}

impl InstallStep for PlatformGate<'_> {
    fn id(&self) -> &'static str {
        "platform"
    }

    fn label(&self) -> String {
        "supported platform".to_string()
    }

    fn precondition(&self) -> Result<ProbeState, StepError> {
        let platform = self.ctx.platform;
        if !platform.is_posix() {
            return Err(StepError::UnsupportedPlatform(format!(
                "{} systems are not supported",
                platform.os_family
            )));
        }
        if !self.ctx.packages.is_available() {
            return Err(StepError::UnsupportedPlatform(format!(
                "{} was not found; only Debian-family systems are supported",
                self.ctx.packages.name()
            )));
        }
        Ok(ProbeState::Satisfied {
            details: Some(format!("{} ({})", platform.machine, platform.arch)),
        })
    }

    fn remediate(&self) -> Result<(), StepError> {
        Err(StepError::UnsupportedPlatform(
            "platform requirements cannot be installed".to_string(),
        ))
    }
}
