//! Platform detection for package downloads.
//!
//! The bridge application ships one package per CPU family, so the raw
//! machine identifier (`uname -m`) is folded into a small closed set of
//! [`Architecture`] classes. `Unknown` is a valid classification, not an
//! error: callers decide what to do with it.
//!
//! # Example
//!
//! ```
//! use fetchkit::platform::{classify, Architecture};
//!
//! assert_eq!(classify("aarch64"), Architecture::Arm);
//! assert_eq!(classify("riscv64"), Architecture::Unknown);
//! ```

use std::fmt;
use std::process::Command;

const X64_MACHINES: &[&str] = &["x86_64", "amd64", "x64"];
const ARM_MACHINES: &[&str] = &["arm64", "aarch64", "armv7l", "armv8l"];
const MIPS_MACHINES: &[&str] = &["mips", "mips64"];

/// CPU architecture class used to pick a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    /// 64-bit x86.
    X64,
    /// 32- or 64-bit ARM.
    Arm,
    /// MIPS.
    Mips,
    /// Anything else.
    Unknown,
}

impl Architecture {
    /// All classes, in table order.
    pub const ALL: [Architecture; 4] = [Self::X64, Self::Arm, Self::Mips, Self::Unknown];

    /// Short lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::Arm => "arm",
            Self::Mips => "mips",
            Self::Unknown => "unknown",
        }
    }

    /// Whether downloads exist for this class.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw machine identifier.
///
/// The input is lower-cased before lookup, so `"AMD64"` and `"amd64"` are the
/// same machine.
#[must_use]
pub fn classify(raw: &str) -> Architecture {
    let machine = raw.trim().to_lowercase();
    let machine = machine.as_str();

    if X64_MACHINES.contains(&machine) {
        Architecture::X64
    } else if ARM_MACHINES.contains(&machine) {
        Architecture::Arm
    } else if MIPS_MACHINES.contains(&machine) {
        Architecture::Mips
    } else {
        Architecture::Unknown
    }
}

/// The machine this process runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// OS family (`unix` or `windows`).
    pub os_family: String,
    /// Raw machine identifier, lower-cased.
    pub machine: String,
    /// Classified architecture.
    pub arch: Architecture,
}

impl Platform {
    /// Build a platform from its raw parts.
    pub fn new(os_family: impl Into<String>, machine: impl Into<String>) -> Self {
        let machine = machine.into().trim().to_lowercase();
        Self {
            os_family: os_family.into(),
            arch: classify(&machine),
            machine,
        }
    }

    /// Whether this is a POSIX system.
    #[must_use]
    pub fn is_posix(&self) -> bool {
        self.os_family == "unix"
    }
}

/// Detect the current platform.
///
/// Uses `uname -m`, which reports the kernel's view (`armv7l`, `mips64`)
/// rather than the compile target. Falls back to the compile-time architecture
/// when `uname` is unavailable.
pub fn detect() -> Platform {
    let machine = uname_machine().unwrap_or_else(|| std::env::consts::ARCH.to_string());
    log::debug!("detected machine identifier: {machine}");
    Platform::new(std::env::consts::FAMILY, machine)
}

fn uname_machine() -> Option<String> {
    let output = Command::new("uname").arg("-m").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let machine = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!machine.is_empty()).then_some(machine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_x64_table() {
        for raw in ["x86_64", "amd64", "x64"] {
            assert_eq!(classify(raw), Architecture::X64, "{raw}");
        }
    }

    #[test]
    fn test_classify_arm_table() {
        for raw in ["arm64", "aarch64", "armv7l", "armv8l"] {
            assert_eq!(classify(raw), Architecture::Arm, "{raw}");
        }
    }

    #[test]
    fn test_classify_mips_table() {
        for raw in ["mips", "mips64"] {
            assert_eq!(classify(raw), Architecture::Mips, "{raw}");
        }
    }

    #[test]
    fn test_classify_unknown() {
        for raw in ["", "riscv64", "i686", "ppc64le", "mipsel", "arm", "x86"] {
            assert_eq!(classify(raw), Architecture::Unknown, "{raw}");
        }
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("AMD64"), Architecture::X64);
        assert_eq!(classify("AArch64"), Architecture::Arm);
        assert_eq!(classify("MIPS64"), Architecture::Mips);
    }

    #[test]
    fn test_platform_new_classifies() {
        let platform = Platform::new("unix", "ARMv7l\n");
        assert_eq!(platform.machine, "armv7l");
        assert_eq!(platform.arch, Architecture::Arm);
        assert!(platform.is_posix());

        let windows = Platform::new("windows", "x86_64");
        assert!(!windows.is_posix());
    }

    #[test]
    fn test_detect_platform() {
        let platform = detect();
        assert!(!platform.machine.is_empty());
        assert!(!platform.os_family.is_empty());
    }

    #[test]
    fn test_architecture_display() {
        assert_eq!(Architecture::X64.to_string(), "x64");
        assert_eq!(Architecture::Unknown.to_string(), "unknown");
        assert!(!Architecture::Unknown.is_known());
        assert!(Architecture::ALL.iter().filter(|a| a.is_known()).count() == 3);
    }
}
