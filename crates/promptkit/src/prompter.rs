//! The Prompter trait and backend selection

use crate::error::{Error, Result};
use crate::line::LinePrompter;
use crate::question::{Answer, Question};
use crate::rich::RichPrompter;
use console::Term;
use std::io::{self, IsTerminal};

/// Asks questions until a valid answer is given
///
/// Implementations block on input, re-prompt on validation failure with the
/// validator's reason, and substitute the question's default for empty input.
pub trait Prompter {
    fn ask(&mut self, question: &Question) -> Result<Answer>;

    fn ask_text(&mut self, question: &Question) -> Result<String> {
        match self.ask(question)? {
            Answer::Text(text) => Ok(text),
            other => Err(unexpected(question, &other)),
        }
    }

    fn ask_confirm(&mut self, question: &Question) -> Result<bool> {
        match self.ask(question)? {
            Answer::Bool(value) => Ok(value),
            other => Err(unexpected(question, &other)),
        }
    }

    fn ask_choice(&mut self, question: &Question) -> Result<String> {
        match self.ask(question)? {
            Answer::Choice(label) => Ok(label),
            other => Err(unexpected(question, &other)),
        }
    }

    fn ask_choices(&mut self, question: &Question) -> Result<Vec<String>> {
        match self.ask(question)? {
            Answer::Choices(labels) => Ok(labels),
            other => Err(unexpected(question, &other)),
        }
    }
}

fn unexpected(question: &Question, answer: &Answer) -> Error {
    Error::UnexpectedAnswer {
        prompt: question.prompt.clone(),
        found: answer.kind_name(),
    }
}

/// Which backend renders questions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Arrow-key menus and inline validation
    Rich,
    /// Plain line-by-line prompts
    Line,
}

impl Backend {
    /// Rich only when both ends are terminals and plain mode is not forced.
    pub fn detect(plain: bool, stdin_is_term: bool, stdout_is_term: bool) -> Self {
        if !plain && stdin_is_term && stdout_is_term {
            Self::Rich
        } else {
            Self::Line
        }
    }
}

/// Pick a prompter for the current process by probing the terminal.
pub fn select_backend(plain: bool) -> Box<dyn Prompter> {
    let backend = Backend::detect(plain, io::stdin().is_terminal(), Term::stdout().is_term());
    log::debug!("prompt backend: {backend:?}");
    match backend {
        Backend::Rich => Box::new(RichPrompter::new()),
        Backend::Line => Box::new(LinePrompter::new(io::stdin().lock(), io::stdout())),
    }
}
