//! Concrete install steps
//!
//! Every step borrows its collaborators from a [`StepContext`], so the same
//! steps run against apt and the network in production and against mocks in
//! tests.

pub mod bridge_app;
pub mod llonebot;
pub mod napcat;
pub mod platform;
pub mod runtime;

use std::fmt;

use fetchkit::{Fetcher, Platform};
use stepkit::{InstallStep, PackageManager, Reporter};

use crate::config::BootstrapConfig;

pub use bridge_app::BridgeAppStep;
pub use llonebot::LlOneBotStep;
pub use napcat::NapCatStep;
pub use platform::PlatformGate;
pub use runtime::RuntimeStep;

/// Collaborators shared by all steps
pub struct StepContext<'a> {
    pub config: &'a BootstrapConfig,
    pub platform: &'a Platform,
    pub packages: &'a dyn PackageManager,
    pub fetcher: &'a dyn Fetcher,
    pub reporter: &'a dyn Reporter,
}

impl fmt::Debug for StepContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepContext")
            .field("platform", self.platform)
            .field("packages", &self.packages.name())
            .finish_non_exhaustive()
    }
}

/// Bridge plugins the operator can choose from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgePlugin {
    NapCat,
    LlOneBot,
}

impl BridgePlugin {
    pub const ALL: [BridgePlugin; 2] = [Self::NapCat, Self::LlOneBot];

    pub fn label(&self) -> &'static str {
        match self {
            Self::NapCat => "NapCat",
            Self::LlOneBot => "LLOneBot",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }

    /// The step that installs this plugin
    pub fn step<'a>(&self, ctx: &'a StepContext<'a>) -> Box<dyn InstallStep + 'a> {
        match self {
            Self::NapCat => Box::new(NapCatStep::new(ctx)),
            Self::LlOneBot => Box::new(LlOneBotStep),
        }
    }
}
