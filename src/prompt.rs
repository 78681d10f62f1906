//! Selection prompts
//!
//! The session only needs two primitives: a blocking single-choice
//! select over labeled options, and a free-text input seeded with
//! suggestions. Both are behind the `Prompter` trait so tests can
//! script answers instead of driving a terminal.

use inquire::autocompletion::{Autocomplete, Replacement};
use inquire::{CustomUserError, InquireError, Select, Text};
use std::fmt;

use crate::error::SessionError;

/// One selectable option: a display label and the value it stands for.
pub struct Choice<T> {
    pub label: String,
    pub value: T,
}

impl<T> Choice<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl<T> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Blocking prompt surface consumed by the session.
pub trait Prompter {
    /// Present a single-choice list and return the chosen value.
    fn select<T>(&self, message: &str, choices: Vec<Choice<T>>) -> Result<T, SessionError>;

    /// Ask for free text, offering `suggestions` as completions.
    fn text(&self, message: &str, suggestions: &[String]) -> Result<String, SessionError>;
}

/// Terminal prompter backed by inquire.
pub struct TermPrompter;

impl TermPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TermPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TermPrompter {
    fn select<T>(&self, message: &str, choices: Vec<Choice<T>>) -> Result<T, SessionError> {
        let picked = Select::new(message, choices)
            .prompt()
            .map_err(map_inquire_error)?;
        Ok(picked.value)
    }

    fn text(&self, message: &str, suggestions: &[String]) -> Result<String, SessionError> {
        Text::new(message)
            .with_autocomplete(HistorySuggester {
                titles: suggestions.to_vec(),
            })
            .prompt()
            .map_err(map_inquire_error)
    }
}

fn map_inquire_error(err: InquireError) -> SessionError {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            SessionError::Cancelled
        }
        other => SessionError::Prompt(other.to_string()),
    }
}

/// Case-insensitive substring completion over previously played titles.
#[derive(Clone)]
struct HistorySuggester {
    titles: Vec<String>,
}

impl Autocomplete for HistorySuggester {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        let needle = input.to_lowercase();
        Ok(self
            .titles
            .iter()
            .filter(|title| title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}
