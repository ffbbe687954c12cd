//! Step failure taxonomy.
//!
//! Every error a step can hit is local to that step: the executor turns it
//! into [`StepOutcome::Failed`](crate::StepOutcome::Failed) and the caller
//! decides whether the run stops. Nothing here is retried.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

/// Categories of step failures, for operator feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Download failed.
    Network,
    /// An external command failed.
    Process,
    /// Reading or writing local files failed.
    Filesystem,
    /// An archive or manifest is malformed.
    Format,
    /// The machine is not one we can bootstrap.
    Platform,
    /// The requested path has no implementation.
    Unsupported,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Download failed",
            Self::Process => "External command failed",
            Self::Filesystem => "Filesystem error",
            Self::Format => "Malformed file",
            Self::Platform => "Unsupported platform",
            Self::Unsupported => "Not implemented",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Download the file by hand as shown above, then run again",
            Self::Process => "Run the command yourself to see the full error, then run again",
            Self::Filesystem => "Check permissions and free space, then run again",
            Self::Format => "Delete the broken file and run again",
            Self::Platform => "Install the missing pieces by hand on this machine",
            Self::Unsupported => "Pick another option or install it by hand",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors a step's probe or remediation can report.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// Download, archive or manifest failure.
    #[error(transparent)]
    Artifact(#[from] fetchkit::Error),

    /// External command could not be started or exited non-zero.
    #[error("`{command}` failed: {detail}")]
    Process {
        /// The command line that was run.
        command: String,
        /// Exit status or spawn error.
        detail: String,
    },

    /// Local file operation failed.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The machine's OS family, package manager or architecture is not
    /// supported. No remediation is attempted.
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The step exists as a choice but has no implementation.
    #[error("{0} is not implemented yet")]
    NotImplemented(String),
}

impl StepError {
    /// A command ran and exited unsuccessfully.
    pub fn exit(command: impl Into<String>, status: ExitStatus) -> Self {
        let detail = match status.code() {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        };
        Self::Process {
            command: command.into(),
            detail,
        }
    }

    /// A command could not be started.
    pub fn spawn(command: impl Into<String>, source: &io::Error) -> Self {
        Self::Process {
            command: command.into(),
            detail: source.to_string(),
        }
    }

    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            StepError::Artifact(inner) => match inner.category() {
                fetchkit::ErrorCategory::Network => ErrorCategory::Network,
                fetchkit::ErrorCategory::Format => ErrorCategory::Format,
                fetchkit::ErrorCategory::Filesystem | fetchkit::ErrorCategory::Permission => {
                    ErrorCategory::Filesystem
                }
            },
            StepError::Process { .. } => ErrorCategory::Process,
            StepError::Io { .. } => ErrorCategory::Filesystem,
            StepError::UnsupportedPlatform(_) => ErrorCategory::Platform,
            StepError::NotImplemented(_) => ErrorCategory::Unsupported,
        }
    }

    /// Whether this is an unsupported-platform failure.
    #[must_use]
    pub fn is_unsupported_platform(&self) -> bool {
        matches!(self, StepError::UnsupportedPlatform(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_fetch_error_category_and_message() {
        let err: StepError = fetchkit::Error::fetch(
            "https://example.com/qq.deb",
            Path::new("/tmp/linuxqq.deb"),
            "timed out",
            None,
        )
        .into();
        assert_eq!(err.category(), ErrorCategory::Network);
        let message = err.to_string();
        assert!(message.contains("https://example.com/qq.deb"));
        assert!(message.contains("/tmp/linuxqq.deb"));
    }

    #[test]
    fn test_format_error_category() {
        let err: StepError = fetchkit::Error::Parse {
            path: PathBuf::from("package.json"),
            message: "EOF".to_string(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Format);
    }

    #[test]
    fn test_spawn_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "No such file or directory");
        let err = StepError::spawn("apt install -y xvfb", &io_err);
        assert_eq!(err.category(), ErrorCategory::Process);
        assert!(err.to_string().contains("apt install -y xvfb"));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_error_reports_code() {
        use std::os::unix::process::ExitStatusExt;

        let err = StepError::exit("apt install -y openjdk-21-jdk", ExitStatus::from_raw(100 << 8));
        assert_eq!(err.to_string(), "`apt install -y openjdk-21-jdk` failed: exit status 100");
    }

    #[test]
    fn test_platform_and_not_implemented() {
        let err = StepError::UnsupportedPlatform("machine riscv64".to_string());
        assert!(err.is_unsupported_platform());
        assert_eq!(err.category(), ErrorCategory::Platform);

        let err = StepError::NotImplemented("LLOneBot".to_string());
        assert!(!err.is_unsupported_platform());
        assert_eq!(err.category(), ErrorCategory::Unsupported);
        assert_eq!(err.to_string(), "LLOneBot is not implemented yet");
    }

    #[test]
    fn test_category_advice_not_empty() {
        assert!(!ErrorCategory::Network.advice().is_empty());
        assert!(!ErrorCategory::Platform.advice().is_empty());
        assert_eq!(ErrorCategory::Process.to_string(), "External command failed");
    }
}
