//! Line-based prompter for pipes, dumb terminals and `--plain`
//!
//! Conventions:
//! - `prompt [default]: ` and empty input takes the default
//! - confirm accepts y/yes/true/1 and n/no/false/0
//! - choices are numbered from 1 and accept a number or an exact label
//! - multi-choice takes comma or space separated entries, in the operator's
//!   order, without duplicates
//! - end of input is [`Error::InputClosed`]

use crate::error::{Error, Result};
use crate::prompter::Prompter;
use crate::question::{Answer, Question, QuestionKind};
use std::io::{BufRead, Write};

/// Prompter over any buffered reader and writer
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer, e.g. to inspect a test transcript
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, msg: &str) -> Result<()> {
        writeln!(self.output, "{msg}")?;
        Ok(())
    }

    fn read_text(&mut self, question: &Question) -> Result<Answer> {
        let prompt = match &question.default {
            Some(default) => format!("{} [{default}]: ", question.prompt),
            None => format!("{}: ", question.prompt),
        };
        loop {
            let raw = self.read_line(&prompt)?;
            let value = match (&question.default, raw.is_empty()) {
                (Some(default), true) => default.clone(),
                _ => raw,
            };
            if let Some(validator) = question.validator {
                if let Err(reason) = validator.validate(&value) {
                    self.say(&format!("  {reason}"))?;
                    continue;
                }
            }
            return Ok(Answer::Text(value));
        }
    }

    fn read_confirm(&mut self, question: &Question, default: bool) -> Result<Answer> {
        let hint = if default { "Y/n" } else { "y/N" };
        let prompt = format!("{} [{hint}]: ", question.prompt);
        loop {
            let raw = self.read_line(&prompt)?;
            if raw.is_empty() {
                return Ok(Answer::Bool(default));
            }
            match parse_bool(&raw) {
                Some(value) => return Ok(Answer::Bool(value)),
                None => self.say("  Please answer yes or no")?,
            }
        }
    }

    fn list_choices(&mut self, question: &Question, choices: &[String]) -> Result<()> {
        self.say(&question.prompt)?;
        for (index, choice) in choices.iter().enumerate() {
            self.say(&format!("  {}) {choice}", index + 1))?;
        }
        Ok(())
    }

    fn read_single(&mut self, question: &Question, choices: &[String]) -> Result<Answer> {
        if choices.is_empty() {
            return Err(Error::NoChoices(question.prompt.clone()));
        }
        self.list_choices(question, choices)?;
        let default = question.default_choice_index().map(|i| choices[i].clone());
        let prompt = match default.as_deref() {
            Some(label) => format!("Choice [{label}]: "),
            None => "Choice: ".to_string(),
        };
        loop {
            let raw = self.read_line(&prompt)?;
            if raw.is_empty() {
                if let Some(label) = &default {
                    return Ok(Answer::Choice(label.clone()));
                }
            }
            match resolve_choice(&raw, choices) {
                Some(label) => return Ok(Answer::Choice(label)),
                None => self.say(&format!(
                    "  Enter a number between 1 and {} or one of the names above",
                    choices.len()
                ))?,
            }
        }
    }

    fn read_multi(&mut self, question: &Question, choices: &[String]) -> Result<Answer> {
        if choices.is_empty() {
            return Err(Error::NoChoices(question.prompt.clone()));
        }
        self.list_choices(question, choices)?;
        let prompt = match &question.default {
            Some(default) => format!("Choices, comma separated [{default}]: "),
            None => "Choices, comma separated (empty for none): ".to_string(),
        };
        loop {
            let raw = self.read_line(&prompt)?;
            let raw = match (&question.default, raw.is_empty()) {
                (Some(default), true) => default.clone(),
                _ => raw,
            };
            match resolve_choices(&raw, choices) {
                Ok(labels) => return Ok(Answer::Choices(labels)),
                Err(token) => self.say(&format!("  Unknown choice: {token}"))?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, question: &Question) -> Result<Answer> {
        match &question.kind {
            QuestionKind::FreeText | QuestionKind::Path => self.read_text(question),
            QuestionKind::Confirm { default } => self.read_confirm(question, *default),
            QuestionKind::SingleChoice { choices } => self.read_single(question, choices),
            QuestionKind::MultiChoice { choices } => self.read_multi(question, choices),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn resolve_choice(token: &str, choices: &[String]) -> Option<String> {
    if let Ok(number) = token.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|index| choices.get(index))
            .cloned();
    }
    choices.iter().find(|c| *c == token).cloned()
}

fn resolve_choices(raw: &str, choices: &[String]) -> std::result::Result<Vec<String>, String> {
    let mut selected: Vec<String> = Vec::new();
    let mut push = |label: String| {
        if !selected.contains(&label) {
            selected.push(label);
        }
    };
    // Labels may contain spaces, so a whole comma-separated entry wins over
    // its space-separated parts.
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        if let Some(label) = resolve_choice(entry, choices) {
            push(label);
            continue;
        }
        for token in entry.split_whitespace() {
            push(resolve_choice(token, choices).ok_or_else(|| token.to_string())?);
        }
    }
    Ok(selected)
}
