//! Input validators
//!
//! A validator is a plain function from the raw input to `Ok(())` or a
//! [`ValidationError`] carrying the reason shown to the operator.

use crate::error::ValidationError;
use std::fmt;
use std::path::PathBuf;

/// Signature shared by all validators
pub type CheckFn = fn(&str) -> Result<(), ValidationError>;

/// A named validator attached to a question
#[derive(Clone, Copy)]
pub struct Validator {
    name: &'static str,
    check: CheckFn,
}

impl Validator {
    /// Rejects empty or whitespace-only input
    pub const NON_EMPTY: Self = Self::new("non_empty", non_empty);
    /// Accepts paths that exist, after `~` expansion
    pub const PATH_EXISTS: Self = Self::new("path_exists", path_exists);
    /// Accepts decimal port numbers 0-65535
    pub const VALID_PORT: Self = Self::new("valid_port", valid_port);

    pub const fn new(name: &'static str, check: CheckFn) -> Self {
        Self { name, check }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn validate(&self, input: &str) -> Result<(), ValidationError> {
        (self.check)(input)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Validator").field(&self.name).finish()
    }
}

pub fn non_empty(input: &str) -> Result<(), ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::new("Please enter a value"));
    }
    Ok(())
}

pub fn path_exists(input: &str) -> Result<(), ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::new("Please enter a path"));
    }
    if expand_path(input).exists() {
        Ok(())
    } else {
        Err(ValidationError::new(format!("No such file or directory: {input}")))
    }
}

/// Pure ASCII digits whose value fits in a u16.
pub fn valid_port(input: &str) -> Result<(), ValidationError> {
    let reject = || ValidationError::new("Port must be a number between 0 and 65535");
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(reject());
    }
    input.parse::<u16>().map(|_| ()).map_err(|_| reject())
}

/// Expand a leading `~` to the home directory.
pub fn expand_path(input: &str) -> PathBuf {
    let trimmed = input.trim();
    PathBuf::from(shellexpand::tilde(trimmed).into_owned())
}
