//! Terminal prompter built on dialoguer

use crate::error::{Error, Result, ValidationError};
use crate::prompter::Prompter;
use crate::question::{Answer, Question, QuestionKind};
use crate::validate::Validator;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};

/// Arrow-key menus, inline validation and colored prompts
pub struct RichPrompter {
    theme: ColorfulTheme,
}

impl RichPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn text(&self, question: &Question) -> Result<Answer> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(&question.prompt)
            .allow_empty(true);
        if let Some(default) = &question.default {
            input = input.default(default.clone());
        }
        if let Some(validator) = question.validator {
            input =
                input.validate_with(move |value: &String| validate_trimmed(validator, value));
        }
        let value = input.interact_text()?;
        Ok(Answer::Text(value.trim().to_string()))
    }

    fn confirm(&self, question: &Question, default: bool) -> Result<Answer> {
        let value = Confirm::with_theme(&self.theme)
            .with_prompt(&question.prompt)
            .default(default)
            .interact()?;
        Ok(Answer::Bool(value))
    }

    fn single(&self, question: &Question, choices: &[String]) -> Result<Answer> {
        if choices.is_empty() {
            return Err(Error::NoChoices(question.prompt.clone()));
        }
        let index = Select::with_theme(&self.theme)
            .with_prompt(&question.prompt)
            .items(choices)
            .default(question.default_choice_index().unwrap_or(0))
            .interact()?;
        Ok(Answer::Choice(choices[index].clone()))
    }

    // MultiSelect reports picks in list order, not the order they were toggled.
    fn multi(&self, question: &Question, choices: &[String]) -> Result<Answer> {
        if choices.is_empty() {
            return Err(Error::NoChoices(question.prompt.clone()));
        }
        let defaults: Vec<bool> = choices
            .iter()
            .map(|c| question.default.as_deref() == Some(c.as_str()))
            .collect();
        let picked = MultiSelect::with_theme(&self.theme)
            .with_prompt(format!("{} (space to toggle, enter to confirm)", question.prompt))
            .items(choices)
            .defaults(&defaults)
            .interact()?;
        Ok(Answer::Choices(
            picked.into_iter().map(|i| choices[i].clone()).collect(),
        ))
    }
}

// The answer is trimmed before it is returned, so validate what is returned.
// The line backend does the same.
fn validate_trimmed(
    validator: Validator,
    value: &str,
) -> std::result::Result<(), ValidationError> {
    validator.validate(value.trim())
}

impl Default for RichPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for RichPrompter {
    fn ask(&mut self, question: &Question) -> Result<Answer> {
        match &question.kind {
            QuestionKind::FreeText | QuestionKind::Path => self.text(question),
            QuestionKind::Confirm { default } => self.confirm(question, *default),
            QuestionKind::SingleChoice { choices } => self.single(question, choices),
            QuestionKind::MultiChoice { choices } => self.multi(question, choices),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert!(Validator::VALID_PORT.validate("9090 ").is_err());
        assert!(validate_trimmed(Validator::VALID_PORT, "9090 ").is_ok());
        assert!(validate_trimmed(Validator::VALID_PORT, " 8080").is_ok());
        assert!(validate_trimmed(Validator::VALID_PORT, "80 80").is_err());
        assert!(validate_trimmed(Validator::NON_EMPTY, "   ").is_err());
    }
}
