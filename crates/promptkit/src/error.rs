//! Error types for prompting

use std::io;

/// Errors that end a question without an answer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input reached end-of-file before a valid answer
    #[error("input closed before an answer was given")]
    InputClosed,

    /// The terminal backend failed
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// Reading or writing the line backend failed
    #[error("prompt IO failed: {0}")]
    Io(#[from] io::Error),

    /// A choice question was built without choices
    #[error("question '{0}' has no choices")]
    NoChoices(String),

    /// The answer kind does not match what the caller asked for
    #[error("question '{prompt}' produced {found} answer")]
    UnexpectedAnswer {
        prompt: String,
        found: &'static str,
    },
}

/// Why an input was rejected. Recovered by asking again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
