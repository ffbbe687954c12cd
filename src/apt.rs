//! apt-backed package manager
//!
//! Installs run with inherited stdio so the operator sees apt's own output
//! (and sudo's password prompt). They are prefixed with `sudo` only when
//! needed; the rest of the process never runs privileged.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use stepkit::{PackageManager, StepError};

use crate::config::SudoMode;

pub struct AptPackageManager {
    apt_paths: Vec<PathBuf>,
    sudo: SudoMode,
}

impl AptPackageManager {
    pub fn new(apt_paths: Vec<PathBuf>, sudo: SudoMode) -> Self {
        Self { apt_paths, sudo }
    }

    fn needs_sudo(&self) -> bool {
        match self.sudo {
            SudoMode::Always => true,
            SudoMode::Never => false,
            SudoMode::Auto => !is_root(),
        }
    }

    /// Program and arguments for `apt install -y <targets>`
    fn command_line(&self, targets: &[String]) -> (String, Vec<String>) {
        let mut args = vec!["install".to_string(), "-y".to_string()];
        args.extend(targets.iter().cloned());
        if self.needs_sudo() {
            args.insert(0, "apt".to_string());
            ("sudo".to_string(), args)
        } else {
            ("apt".to_string(), args)
        }
    }

    fn run(&self, targets: &[String]) -> Result<(), StepError> {
        let (program, args) = self.command_line(targets);
        let display = format!("{program} {}", args.join(" "));
        log::info!("running {display}");

        let status = Command::new(&program)
            .args(&args)
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

impl PackageManager for AptPackageManager {
    fn name(&self) -> &str {
        "apt"
    }

    fn is_available(&self) -> bool {
        self.apt_paths.iter().any(|p| p.exists())
    }

    fn install(&self, packages: &[&str]) -> Result<(), StepError> {
        let targets: Vec<String> = packages.iter().map(ToString::to_string).collect();
        self.run(&targets)
    }

    fn install_file(&self, file: &Path) -> Result<(), StepError> {
        // apt only treats the argument as a file when it contains a slash
        let target = if file.is_absolute() || file.starts_with(".") {
            file.display().to_string()
        } else {
            format!("./{}", file.display())
        };
        self.run(&[target])
    }
}

/// Whether the process runs with root privileges
#[cfg(unix)]
pub fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub fn is_root() -> bool {
    false
}

/// Whether this process may create files in `dir`
///
/// Installs run through `sudo`, file writes do not, so steps that write
/// outside the operator's home check this before changing anything.
#[cfg(unix)]
pub fn is_writable(dir: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(dir.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is NUL-terminated and outlives the call.
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

#[cfg(not(unix))]
pub fn is_writable(dir: &Path) -> bool {
    std::fs::metadata(dir).is_ok_and(|m| !m.permissions().readonly())
}
