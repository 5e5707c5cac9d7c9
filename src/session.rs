// session.rs

use crate::calculation::Calculation;
use crate::config::CalculatorConfig;
use crate::error::{CalcError, Result};
use crate::history::{History, HistoryFile, Persistence};
use crate::memento::{Mutation, RedoOutcome, UndoOutcome, UndoRedo};
use crate::observers::{AutoSaveObserver, LoggingObserver, Observer};
use crate::operations::{OperationKind, OperationRegistry};
use crate::parser::parse_line;
use itertools::Itertools;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, error, info, warn};

/// Every command word with its help text. Drives `help` and completion.
pub const COMMANDS: &[(&str, &str)] = &[
    ("add", "Add two numbers. Usage: add <a> <b>"),
    ("subtract", "Subtract b from a. Usage: subtract <a> <b>"),
    ("multiply", "Multiply two numbers. Usage: multiply <a> <b>"),
    ("divide", "Divide a by b. Usage: divide <a> <b>"),
    ("power", "Raise a to the power of b. Usage: power <a> <b>"),
    ("root", "Calculate the bth root of a. Usage: root <a> <b>"),
    ("modulus", "Compute a modulo b. Usage: modulus <a> <b>"),
    ("int_divide", "Integer division of a by b. Usage: int_divide <a> <b>"),
    ("percent", "Calculate (a/b)*100. Usage: percent <a> <b>"),
    ("abs_diff", "Absolute difference between a and b. Usage: abs_diff <a> <b>"),
    ("history", "Display calculation history. Usage: history"),
    ("clear", "Clear calculation history. Usage: clear"),
    ("undo", "Undo the last change to the history. Usage: undo"),
    ("redo", "Redo the last undone change. Usage: redo"),
    ("save", "Save calculation history to CSV. Usage: save"),
    ("load", "Load calculation history from CSV. Usage: load"),
    ("help", "Display available commands. Usage: help"),
    ("exit", "Exit the calculator. Usage: exit"),
];

#[derive(Clone, Debug, PartialEq)]
pub enum CommandOutput {
    Calculated(Calculation),
    History(Vec<Calculation>),
    Cleared,
    Undone(UndoOutcome),
    Redone(RedoOutcome),
    Saved(PathBuf),
    Loaded { path: PathBuf, records: usize },
    NoHistoryFile,
    Help,
    Exit,
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutput::Calculated(record) => write!(f, "Result: {}", record.result()),
            CommandOutput::History(records) if records.is_empty() => {
                f.write_str("No calculations in history.")
            }
            CommandOutput::History(records) => {
                f.write_str("Calculation History:")?;
                for (i, record) in records.iter().enumerate() {
                    write!(f, "\n{}. {}", i + 1, record)?;
                }
                Ok(())
            }
            CommandOutput::Cleared => f.write_str("History cleared."),
            CommandOutput::Undone(UndoOutcome::Removed(record)) => write!(f, "Undone: {}", record),
            CommandOutput::Undone(UndoOutcome::ClearReverted { restored }) => {
                write!(f, "Undone: clear ({} calculations restored)", restored)
            }
            CommandOutput::Undone(UndoOutcome::LoadReverted { restored }) => {
                write!(f, "Undone: load ({} calculations restored)", restored)
            }
            CommandOutput::Redone(RedoOutcome::Reapplied(record)) => write!(f, "Redone: {}", record),
            CommandOutput::Redone(RedoOutcome::Cleared) => f.write_str("Redone: History cleared"),
            CommandOutput::Redone(RedoOutcome::Reloaded { records }) => {
                write!(f, "Redone: load ({} calculations)", records)
            }
            CommandOutput::Saved(path) => write!(f, "History saved to {}", path.display()),
            CommandOutput::Loaded { path, .. } => write!(f, "History loaded from {}", path.display()),
            CommandOutput::NoHistoryFile => f.write_str("No history file found."),
            CommandOutput::Help => {
                f.write_str("Available Commands:\n")?;
                for (name, description) in COMMANDS.iter().sorted_by_key(|(name, _)| *name) {
                    write!(f, "\n{:15} - {}", name, description)?;
                }
                Ok(())
            }
            CommandOutput::Exit => f.write_str("Goodbye!"),
        }
    }
}

/// Text shown to the user for a finished command.
pub fn render(outcome: &Result<CommandOutput>) -> String {
    match outcome {
        Ok(output) => output.to_string(),
        Err(e) if e.is_informational() => e.to_string(),
        Err(e) => format!("Error: {}", e),
    }
}

/// Owns the history and its undo stacks; runs one command at a time.
pub struct Session {
    registry: OperationRegistry,
    precision: u32,
    history: History,
    undo: UndoRedo,
    store: Rc<dyn Persistence>,
    observers: Vec<Box<dyn Observer>>,
}

impl Session {
    /// Wires the CSV history file and the standard observers, then loads any
    /// saved history.
    pub fn new(config: &CalculatorConfig) -> Self {
        let store: Rc<dyn Persistence> = Rc::new(HistoryFile::new(config.history_file()));
        let mut observers: Vec<Box<dyn Observer>> = vec![Box::new(LoggingObserver)];
        if config.auto_save {
            observers.push(Box::new(AutoSaveObserver::new(store.clone())));
        }
        let mut session = Self::with_parts(config, store, observers);
        session.load_on_startup();
        session
    }

    pub fn with_parts(
        config: &CalculatorConfig,
        store: Rc<dyn Persistence>,
        observers: Vec<Box<dyn Observer>>,
    ) -> Self {
        Self {
            registry: OperationRegistry::new(config.max_input_value),
            precision: config.precision,
            history: History::new(config.max_history_size),
            undo: UndoRedo::new(config.max_undo_depth),
            store,
            observers,
        }
    }

    /// Startup load; not undoable, and a failure only leaves the history empty.
    pub fn load_on_startup(&mut self) {
        match self.store.load() {
            Ok(Some(records)) => {
                self.history.replace(records);
                info!(records = self.history.size(), "loaded saved history");
            }
            Ok(None) => debug!(path = %self.store.location().display(), "no saved history"),
            Err(e) => warn!("Could not load history: {}", e),
        }
    }

    #[cfg(test)]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Parses and runs one input line. Blank lines yield `None`.
    pub fn handle_line(&mut self, line: &str) -> Option<Result<CommandOutput>> {
        let parsed = parse_line(line)?;
        Some(self.execute(&parsed.command, &parsed.args))
    }

    pub fn execute(&mut self, command: &str, args: &[String]) -> Result<CommandOutput> {
        match command {
            "history" => Ok(CommandOutput::History(self.history.all().to_vec())),
            "clear" => {
                self.undo.record_before_mutation(&self.history, Mutation::Clear);
                self.history.clear();
                info!("history cleared");
                Ok(CommandOutput::Cleared)
            }
            "undo" => self.undo.undo(&mut self.history).map(CommandOutput::Undone),
            "redo" => self.undo.redo(&mut self.history).map(CommandOutput::Redone),
            "save" => {
                self.store.save(self.history.all())?;
                info!(records = self.history.size(), "history saved");
                Ok(CommandOutput::Saved(self.store.location().to_path_buf()))
            }
            "load" => self.load(),
            "help" => Ok(CommandOutput::Help),
            "exit" => Ok(CommandOutput::Exit),
            other => match other.parse::<OperationKind>() {
                Ok(kind) => self.calculate(kind, args).map(CommandOutput::Calculated),
                Err(_) => Err(CalcError::UnknownCommand(other.to_string())),
            },
        }
    }

    fn load(&mut self) -> Result<CommandOutput> {
        let Some(records) = self.store.load()? else {
            return Ok(CommandOutput::NoHistoryFile);
        };
        self.undo.record_before_mutation(&self.history, Mutation::Load);
        self.history.replace(records);
        info!(records = self.history.size(), "history loaded");
        Ok(CommandOutput::Loaded {
            path: self.store.location().to_path_buf(),
            records: self.history.size(),
        })
    }

    fn calculate(&mut self, kind: OperationKind, args: &[String]) -> Result<Calculation> {
        let [a, b] = args else {
            return Err(CalcError::ArgumentCount {
                command: kind.name().to_string(),
                expected: 2,
                got: args.len(),
            });
        };
        let a = self.registry.parse_operand(a)?;
        let b = self.registry.parse_operand(b)?;
        let raw = self.registry.compute(kind, a, b).inspect_err(|e| {
            if let CalcError::Domain(_) = e {
                error!("{}", e);
            }
        })?;
        let record = Calculation::new(kind, a, b, round_to(raw, self.precision));

        self.undo.record_before_mutation(&self.history, Mutation::Append);
        self.history.append(record.clone());
        self.notify(&record);
        Ok(record)
    }

    fn notify(&self, record: &Calculation) {
        for observer in &self.observers {
            if let Err(e) = observer.on_calculation(record, self.history.all()) {
                warn!(observer = observer.name(), "{:#}", e);
            }
        }
    }
}

/// Rounds to `precision` decimal places; values that cannot be scaled pass through.
fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(i32::MAX as u32) as i32);
    let scaled = value * factor;
    if !factor.is_finite() || !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
