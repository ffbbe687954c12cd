//! Guided bootstrap
//!
//! A strictly forward pipeline: consent, environment, bridge framework,
//! readiness, target configuration, launch. Any failed stage ends the run
//! with [`RunOutcome::Aborted`]; nothing is rolled back.

use std::fmt;

use anyhow::{Context as _, Result};
use promptkit::{Prompter, Question, Validator};
use stepkit::{
    InstallStep, ReporterObserver, StepOutcome, run_sequence, run_step_observed,
};

use crate::launch::{LaunchSpec, Launcher, OptionalFlag, ProcessLauncher};
use crate::steps::{BridgeAppStep, BridgePlugin, PlatformGate, RuntimeStep, StepContext};
use crate::ui;

/// Run the guided bootstrap against the real terminal and the real `java`
pub fn run(ctx: &StepContext<'_>, plain: bool) -> Result<RunOutcome> {
    ui::banner();
    ctx.reporter
        .info("NyxBot is a Warframe status bot. Keep the network up while it installs.");

    let mut prompter = promptkit::select_backend(plain);
    let outcome = Orchestrator::new(ctx, &mut *prompter, &ProcessLauncher).run()?;

    if let RunOutcome::Aborted { stage, reason } = &outcome {
        log::info!("aborted during {stage}: {reason}");
        ctx.reporter.error(&format!("Stopped during the {stage}"));
    }
    Ok(outcome)
}

/// Where a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Environment,
    BridgeFramework,
    Launch,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Environment => "environment check",
            Self::BridgeFramework => "bridge framework setup",
            Self::Launch => "launch",
        };
        f.write_str(name)
    }
}

/// How a bootstrap run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The bot ran and exited cleanly
    Completed,
    /// The operator declined to start; nothing was touched
    Cancelled,
    Aborted { stage: Stage, reason: String },
}

impl RunOutcome {
    fn aborted(stage: Stage, reason: impl Into<String>) -> Self {
        Self::Aborted {
            stage,
            reason: reason.into(),
        }
    }

    /// Process exit code
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Completed | Self::Cancelled => 0,
            Self::Aborted { .. } => 2,
        }
    }
}

/// Drives the stages against a prompter, a launcher and the step collaborators
pub struct Orchestrator<'a, P: ?Sized, L: ?Sized> {
    ctx: &'a StepContext<'a>,
    prompter: &'a mut P,
    launcher: &'a L,
}

impl<'a, P, L> Orchestrator<'a, P, L>
where
    P: Prompter + ?Sized,
    L: Launcher + ?Sized,
{
    pub fn new(ctx: &'a StepContext<'a>, prompter: &'a mut P, launcher: &'a L) -> Self {
        Self {
            ctx,
            prompter,
            launcher,
        }
    }

    /// Run every stage in order
    ///
    /// Errors are prompt failures (closed input, broken terminal); step
    /// failures come back as [`RunOutcome::Aborted`].
    pub fn run(mut self) -> Result<RunOutcome> {
        let start = self
            .prompter
            .ask_confirm(&Question::confirm("Start setting up NyxBot?", true))?;
        if !start {
            self.ctx.reporter.info("Nothing was changed");
            return Ok(RunOutcome::Cancelled);
        }

        if let Some(outcome) = self.check_environment() {
            return Ok(outcome);
        }
        if let Some(outcome) = self.check_bridge_framework()? {
            return Ok(outcome);
        }
        self.wait_for_operator()?;
        let spec = self.configure_target()?;
        Ok(self.launch(&spec))
    }

    fn check_environment(&self) -> Option<RunOutcome> {
        self.ctx.reporter.section("Environment");

        let gate = PlatformGate::new(self.ctx);
        let runtime = RuntimeStep::new(self.ctx);
        let bridge_app = BridgeAppStep::new(self.ctx);
        let steps: [&dyn InstallStep; 3] = [&gate, &runtime, &bridge_app];

        let mut observer = ReporterObserver::new(self.ctx.reporter);
        let report = run_sequence(&steps, &mut observer);
        log::debug!(
            "environment: {} satisfied, {} remediated, {} failed, {} skipped",
            report.summary.satisfied,
            report.summary.remediated,
            report.summary.failed,
            report.summary.skipped
        );

        let (id, outcome) = report.fatal()?;
        Some(RunOutcome::aborted(
            Stage::Environment,
            failure_reason(id, outcome),
        ))
    }

    fn check_bridge_framework(&mut self) -> Result<Option<RunOutcome>> {
        self.ctx.reporter.section("Bridge framework");

        let installed = self.prompter.ask_confirm(&Question::confirm(
            "Is a QQ bot framework already installed? NyxBot talks to QQ through it",
            true,
        ))?;
        if installed {
            return Ok(None);
        }

        self.ctx.reporter.info("Pick one and it will be installed");
        let labels = BridgePlugin::ALL.map(|p| p.label());
        let choice = self.prompter.ask_choice(
            &Question::single_choice("Bot framework (NapCat recommended)", labels)
                .with_default(BridgePlugin::NapCat.label()),
        )?;
        let plugin = BridgePlugin::from_label(&choice)
            .with_context(|| format!("unexpected framework choice '{choice}'"))?;

        let step = plugin.step(self.ctx);
        let mut observer = ReporterObserver::new(self.ctx.reporter);
        let outcome = run_step_observed(&*step, &mut observer);
        if outcome.is_success() {
            Ok(None)
        } else {
            Ok(Some(RunOutcome::aborted(
                Stage::BridgeFramework,
                failure_reason(step.id(), &outcome),
            )))
        }
    }

    // The answer is discarded; this only blocks until the operator is ready.
    fn wait_for_operator(&mut self) -> Result<()> {
        self.prompter.ask_text(&Question::text(
            "Start the bot framework in another terminal, then press Enter to continue",
        ))?;
        Ok(())
    }

    fn configure_target(&mut self) -> Result<LaunchSpec> {
        self.ctx.reporter.section("NyxBot");

        let answer = self.prompter.ask_text(
            &Question::path("Path to NyxBot.jar").with_validator(Validator::PATH_EXISTS),
        )?;
        let mut spec = LaunchSpec::jar(
            self.ctx.config.runtime.command.clone(),
            promptkit::expand_path(&answer),
        );

        let labels = OptionalFlag::ALL.map(|f| f.label());
        let selected = self
            .prompter
            .ask_choices(&Question::multi_choice("Options to configure", labels))?;
        for label in selected {
            let flag = OptionalFlag::from_label(&label)
                .with_context(|| format!("unexpected option '{label}'"))?;
            let value = self
                .prompter
                .ask_text(&flag.question(&self.ctx.config.launch))?;
            spec.push_flag(flag.render(&value));
        }

        Ok(spec)
    }

    fn launch(&self, spec: &LaunchSpec) -> RunOutcome {
        let reporter = self.ctx.reporter;
        reporter.info("Configuration complete, starting NyxBot...");
        reporter.info(
            "Once it is up, its output shows the WebUI address and the login credentials. Keep them safe",
        );

        match self.launcher.launch(spec) {
            Ok(()) => RunOutcome::Completed,
            Err(e) => {
                reporter.error(&e.to_string());
                reporter.warn("NyxBot did not start; run the command above by hand to investigate");
                RunOutcome::aborted(Stage::Launch, e.to_string())
            }
        }
    }
}

fn failure_reason(id: &str, outcome: &StepOutcome) -> String {
    match outcome.failure() {
        Some(err) => format!("{id}: {err}"),
        None => format!("{id}: failed"),
    }
}
