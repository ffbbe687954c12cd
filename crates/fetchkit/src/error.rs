//! Error types for fetchkit operations.
//!
//! Errors are categorized so callers can pick the right operator feedback:
//! a network failure needs a manual-download hint, a format failure means the
//! file on disk is broken, and so on.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Result type alias for fetchkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of fetchkit errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network-related errors (connection, DNS, HTTP status).
    Network,
    /// Reading or writing the local filesystem failed.
    Filesystem,
    /// Downloaded or on-disk content is malformed (corrupt zip, bad JSON).
    Format,
    /// Permission denied while writing.
    Permission,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Filesystem => "Filesystem error",
            Self::Format => "Invalid file format",
            Self::Permission => "Permission denied",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check your internet connection, or download the file by hand",
            Self::Filesystem => "Check free disk space and the target directory",
            Self::Format => "The file may be corrupted, delete it and run again",
            Self::Permission => "Run as root or allow sudo",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while fetching, extracting or patching.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Download failed. Carries both ends so the operator can fetch by hand.
    #[error("download of {url} failed ({message}); download it manually and save it to {}", dest.display())]
    Fetch {
        /// Source URL.
        url: String,
        /// Local destination path.
        dest: PathBuf,
        /// Transport error message.
        message: String,
        /// HTTP status code if the server answered.
        status: Option<u16>,
    },

    /// IO error during file operations.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        /// Path involved in the error.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Zip archive could not be read.
    #[error("corrupt archive {}: {message}", path.display())]
    Archive {
        /// Archive path.
        path: PathBuf,
        /// Error message from the zip reader.
        message: String,
    },

    /// JSON document could not be parsed.
    #[error("malformed JSON in {}: {message}", path.display())]
    Parse {
        /// Document path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// JSON document parsed but its top level is not an object.
    #[error("{} is not a JSON object", path.display())]
    NotAnObject {
        /// Document path.
        path: PathBuf,
    },
}

impl Error {
    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a fetch error for a url/destination pair.
    pub fn fetch(url: &str, dest: &Path, message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Fetch {
            url: url.to_string(),
            dest: dest.to_path_buf(),
            message: message.into(),
            status,
        }
    }

    /// Map a ureq error onto a fetch error.
    pub fn from_ureq(url: &str, dest: &Path, err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::fetch(url, dest, format!("HTTP {code}"), Some(code)),
            other => Self::fetch(url, dest, other.to_string(), None),
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Fetch { .. } => ErrorCategory::Network,
            Error::Io { source, .. } => {
                if source.kind() == io::ErrorKind::PermissionDenied {
                    ErrorCategory::Permission
                } else {
                    ErrorCategory::Filesystem
                }
            }
            Error::Archive { .. } | Error::Parse { .. } | Error::NotAnObject { .. } => {
                ErrorCategory::Format
            }
        }
    }

    /// Path on the local filesystem this error is about.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Error::Fetch { dest, .. } => dest,
            Error::Io { path, .. }
            | Error::Archive { path, .. }
            | Error::Parse { path, .. }
            | Error::NotAnObject { path } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_names_url_and_destination() {
        let err = Error::fetch(
            "https://example.com/qq.deb",
            Path::new("/tmp/linuxqq-1.deb"),
            "connection refused",
            None,
        );
        let display = err.to_string();
        assert!(display.contains("https://example.com/qq.deb"));
        assert!(display.contains("/tmp/linuxqq-1.deb"));
        assert_eq!(err.category(), ErrorCategory::Network);
    }

    #[test]
    fn test_status_code_is_kept() {
        let err = Error::from_ureq(
            "https://example.com/a.zip",
            Path::new("/tmp/a.zip"),
            ureq::Error::StatusCode(404),
        );
        match err {
            Error::Fetch { status, message, .. } => {
                assert_eq!(status, Some(404));
                assert_eq!(message, "HTTP 404");
            }
            _ => panic!("Expected Error::Fetch"),
        }
    }

    #[test]
    fn test_io_permission_denied_category() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let err = Error::io("/opt/QQ/resources/app", io_err);
        assert_eq!(err.category(), ErrorCategory::Permission);
    }

    #[test]
    fn test_io_other_category() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "not found");
        let err = Error::io("/some/path", io_err);
        assert_eq!(err.category(), ErrorCategory::Filesystem);
        assert_eq!(err.path(), Path::new("/some/path"));
    }

    #[test]
    fn test_format_categories() {
        let err = Error::Parse {
            path: PathBuf::from("package.json"),
            message: "EOF".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Format);
        let err = Error::NotAnObject {
            path: PathBuf::from("package.json"),
        };
        assert_eq!(err.category(), ErrorCategory::Format);
    }

    #[test]
    fn test_category_advice_not_empty() {
        for category in [
            ErrorCategory::Network,
            ErrorCategory::Filesystem,
            ErrorCategory::Format,
            ErrorCategory::Permission,
        ] {
            assert!(!category.advice().is_empty());
            assert!(!category.to_string().is_empty());
        }
    }
}
