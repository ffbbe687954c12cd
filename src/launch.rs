//! Launching the bot
//!
//! The bot is started as `java -jar <target> [--key=value...]`. Optional
//! flags are a dispatch table: each [`OptionalFlag`] owns the question that
//! collects its value and the argument it renders to.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use promptkit::{Question, Validator};
use stepkit::StepError;

use crate::config::LaunchConfig;

/// A launch option the operator can opt into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalFlag {
    ServerPort,
}

impl OptionalFlag {
    pub const ALL: [OptionalFlag; 1] = [Self::ServerPort];

    /// Label shown in the option list
    pub fn label(&self) -> &'static str {
        match self {
            Self::ServerPort => "server port",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == label)
    }

    /// Sub-question that collects this flag's value
    pub fn question(&self, config: &LaunchConfig) -> Question {
        match self {
            Self::ServerPort => Question::text("Server port")
                .with_default(config.default_port.clone())
                .with_validator(Validator::VALID_PORT),
        }
    }

    /// Command-line argument for `value`
    pub fn render(&self, value: &str) -> String {
        match self {
            Self::ServerPort => format!("--server.port={value}"),
        }
    }
}

/// Everything needed to start the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub executable: String,
    pub fixed_args: Vec<String>,
    pub target: PathBuf,
    pub flags: Vec<String>,
}

impl LaunchSpec {
    /// `executable -jar target`
    pub fn jar(executable: impl Into<String>, target: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            fixed_args: vec!["-jar".to_string()],
            target: target.into(),
            flags: Vec::new(),
        }
    }

    pub fn push_flag(&mut self, flag: String) {
        self.flags.push(flag);
    }

    /// Target followed by flags, in selection order
    pub fn arguments(&self) -> Vec<String> {
        std::iter::once(self.target.display().to_string())
            .chain(self.flags.iter().cloned())
            .collect()
    }

    /// Full argument vector after the executable
    pub fn argv(&self) -> Vec<String> {
        self.fixed_args
            .iter()
            .cloned()
            .chain(self.arguments())
            .collect()
    }

    /// Shell-like rendering for messages
    pub fn command_line(&self) -> String {
        std::iter::once(self.executable.clone())
            .chain(self.argv())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub trait Launcher {
    /// Run the bot to completion; non-zero exit is an error
    fn launch(&self, spec: &LaunchSpec) -> Result<(), StepError>;
}

/// Runs the bot as a child process with inherited stdio
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&self, spec: &LaunchSpec) -> Result<(), StepError> {
        let display = spec.command_line();
        log::info!("launching {display}");

        let status = Command::new(&spec.executable)
            .args(spec.argv())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| StepError::spawn(&display, &e))?;

        if status.success() {
            Ok(())
        } else {
            Err(StepError::exit(display, status))
        }
    }
}
