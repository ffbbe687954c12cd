//! Question and answer model

use crate::validate::Validator;

/// What shape of answer a question expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    FreeText,
    Path,
    Confirm { default: bool },
    SingleChoice { choices: Vec<String> },
    MultiChoice { choices: Vec<String> },
}

/// A typed prompt with an optional default and validator
#[derive(Debug, Clone)]
pub struct Question {
    pub prompt: String,
    pub kind: QuestionKind,
    /// Used when the operator submits empty input. For choice questions
    /// this is a choice label.
    pub default: Option<String>,
    /// Applied to text and path answers; rejections re-prompt
    pub validator: Option<Validator>,
}

impl Question {
    fn new(prompt: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            prompt: prompt.into(),
            kind,
            default: None,
            validator: None,
        }
    }

    pub fn text(prompt: impl Into<String>) -> Self {
        Self::new(prompt, QuestionKind::FreeText)
    }

    pub fn path(prompt: impl Into<String>) -> Self {
        Self::new(prompt, QuestionKind::Path)
    }

    pub fn confirm(prompt: impl Into<String>, default: bool) -> Self {
        Self::new(prompt, QuestionKind::Confirm { default })
    }

    pub fn single_choice<S: Into<String>>(
        prompt: impl Into<String>,
        choices: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            prompt,
            QuestionKind::SingleChoice {
                choices: choices.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn multi_choice<S: Into<String>>(
        prompt: impl Into<String>,
        choices: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            prompt,
            QuestionKind::MultiChoice {
                choices: choices.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Choices for choice questions, empty otherwise
    pub fn choices(&self) -> &[String] {
        match &self.kind {
            QuestionKind::SingleChoice { choices } | QuestionKind::MultiChoice { choices } => {
                choices
            }
            _ => &[],
        }
    }

    /// Index of the default choice label, if it names one
    pub fn default_choice_index(&self) -> Option<usize> {
        let default = self.default.as_deref()?;
        self.choices().iter().position(|c| c == default)
    }
}

/// An operator's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Bool(bool),
    Choice(String),
    Choices(Vec<String>),
}

impl Answer {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Answer::Text(_) => "a text",
            Answer::Bool(_) => "a yes/no",
            Answer::Choice(_) => "a single-choice",
            Answer::Choices(_) => "a multi-choice",
        }
    }
}
