//! Collaborator traits for steps and the executor
//!
//! Steps never print or shell out directly: they receive a
//! [`PackageManager`] and a [`Reporter`], which keeps them testable with the
//! in-memory implementations below.

use crate::error::StepError;
use crate::types::StepOutcome;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Operator-facing message sink
///
/// Implement this trait to route step messages to a console, a log, or a
/// test buffer.
pub trait Reporter: Send + Sync {
    /// Neutral progress information
    fn info(&self, msg: &str);

    /// Something finished successfully
    fn success(&self, msg: &str);

    /// Something the operator should look at
    fn warn(&self, msg: &str);

    /// Something failed
    fn error(&self, msg: &str);

    /// Start of a named stage
    fn section(&self, title: &str);
}

/// The system package manager, invoked with elevated privileges as needed
pub trait PackageManager: Send + Sync {
    /// Short name for messages, e.g. "apt"
    fn name(&self) -> &str;

    /// Whether the package manager exists on this machine
    fn is_available(&self) -> bool;

    /// Install named packages non-interactively
    fn install(&self, packages: &[&str]) -> Result<(), StepError>;

    /// Install a local package file non-interactively
    fn install_file(&self, file: &Path) -> Result<(), StepError>;
}

/// Observer for step execution
///
/// Implement this trait to receive start/complete notifications.
pub trait StepObserver {
    /// Called before a step's precondition is probed
    fn on_step_start(&mut self, id: &str, label: &str);

    /// Called after a step finishes, whatever the outcome
    fn on_step_complete(&mut self, id: &str, outcome: &StepOutcome);
}

/// No-op observer
pub struct NoObserver;

impl StepObserver for NoObserver {
    fn on_step_start(&mut self, _id: &str, _label: &str) {}
    fn on_step_complete(&mut self, _id: &str, _outcome: &StepOutcome) {}
}

/// Observer that forwards step events to a [`Reporter`]
pub struct ReporterObserver<'a> {
    reporter: &'a dyn Reporter,
}

impl<'a> ReporterObserver<'a> {
    pub fn new(reporter: &'a dyn Reporter) -> Self {
        Self { reporter }
    }
}

impl StepObserver for ReporterObserver<'_> {
    fn on_step_start(&mut self, _id: &str, label: &str) {
        self.reporter.info(&format!("Checking {label}..."));
    }

    fn on_step_complete(&mut self, _id: &str, outcome: &StepOutcome) {
        match outcome {
            StepOutcome::AlreadySatisfied => self.reporter.success("Already in place"),
            StepOutcome::Remediated => self.reporter.success("Installed"),
            StepOutcome::Failed(err) => {
                self.reporter.error(&err.to_string());
                self.reporter.warn(err.category().advice());
            }
        }
    }
}

/// Severity of a recorded message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
    Section,
}

/// Reporter that records messages in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    messages: Mutex<Vec<(Level, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded messages, in order
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Whether any message at `level` contains `needle`
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    fn push(&self, level: Level, msg: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((level, msg.to_string()));
        }
    }
}

impl Reporter for MemoryReporter {
    fn info(&self, msg: &str) {
        self.push(Level::Info, msg);
    }

    fn success(&self, msg: &str) {
        self.push(Level::Success, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(Level::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.push(Level::Error, msg);
    }

    fn section(&self, title: &str) {
        self.push(Level::Section, title);
    }
}

/// A call recorded by [`MockPackageManager`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageCall {
    Packages(Vec<String>),
    File(PathBuf),
}

/// Package manager that records calls instead of running them
#[derive(Debug)]
pub struct MockPackageManager {
    available: bool,
    fail: bool,
    calls: Mutex<Vec<PackageCall>>,
}

impl MockPackageManager {
    /// An available package manager whose installs succeed
    pub fn new() -> Self {
        Self {
            available: true,
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A package manager that is not installed
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// A package manager whose installs exit non-zero
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Calls recorded so far, in order
    pub fn calls(&self) -> Vec<PackageCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: PackageCall) -> Result<(), StepError> {
        let command = match &call {
            PackageCall::Packages(pkgs) => format!("apt install -y {}", pkgs.join(" ")),
            PackageCall::File(path) => format!("apt install -y {}", path.display()),
        };
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.fail {
            return Err(StepError::Process {
                command,
                detail: "exit status 100".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockPackageManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageManager for MockPackageManager {
    fn name(&self) -> &str {
        "apt"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn install(&self, packages: &[&str]) -> Result<(), StepError> {
        self.record(PackageCall::Packages(
            packages.iter().map(ToString::to_string).collect(),
        ))
    }

    fn install_file(&self, file: &Path) -> Result<(), StepError> {
        self.record(PackageCall::File(file.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reporter_records_in_order() {
        let reporter = MemoryReporter::new();
        reporter.section("Environment");
        reporter.info("Checking Java runtime...");
        reporter.error("boom");

        let messages = reporter.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], (Level::Section, "Environment".to_string()));
        assert!(reporter.contains(Level::Error, "boom"));
        assert!(!reporter.contains(Level::Warn, "boom"));
    }

    #[test]
    fn test_mock_package_manager_records_calls() {
        let apt = MockPackageManager::new();
        apt.install(&["xvfb", "xauth"]).unwrap();
        apt.install_file(Path::new("/tmp/linuxqq.deb")).unwrap();

        assert_eq!(
            apt.calls(),
            vec![
                PackageCall::Packages(vec!["xvfb".into(), "xauth".into()]),
                PackageCall::File(PathBuf::from("/tmp/linuxqq.deb")),
            ]
        );
    }

    #[test]
    fn test_failing_package_manager() {
        let apt = MockPackageManager::failing();
        let err = apt.install(&["openjdk-21-jdk"]).unwrap_err();
        assert!(err.to_string().contains("apt install -y openjdk-21-jdk"));
        assert_eq!(apt.calls().len(), 1);
    }

    #[test]
    fn test_reporter_observer_reports_failure_with_advice() {
        let reporter = MemoryReporter::new();
        let mut observer = ReporterObserver::new(&reporter);
        observer.on_step_start("plugin", "LLOneBot plugin");
        observer.on_step_complete(
            "plugin",
            &StepOutcome::Failed(StepError::NotImplemented("LLOneBot".into())),
        );

        assert!(reporter.contains(Level::Info, "LLOneBot plugin"));
        assert!(reporter.contains(Level::Error, "not implemented"));
        assert!(reporter.contains(Level::Warn, "Pick another option"));
    }
}
