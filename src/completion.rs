// completion.rs

use crate::session::COMMANDS;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

pub struct CommandCompleter;

impl CommandCompleter {
    /// Command words starting with `prefix`, in table order.
    pub fn matches(prefix: &str) -> Vec<&'static str> {
        let prefix = prefix.to_lowercase();
        COMMANDS
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| name.starts_with(&prefix))
            .collect()
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;
    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let typed = &line[..pos];
        let start = typed.len() - typed.trim_start().len();
        let prefix = &typed[start..];
        // Only the command word completes; operands are free-form numbers.
        if prefix.contains(char::is_whitespace) {
            return Ok((pos, vec![]));
        }
        let completions = Self::matches(prefix)
            .into_iter()
            .map(|name| Pair {
                display: name.to_string(),
                replacement: format!("{} ", name),
            })
            .collect();
        Ok((start, completions))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {
    fn validate(&self, _ctx: &mut ValidationContext) -> Result<ValidationResult, ReadlineError> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Helper for CommandCompleter {}
