// memento.rs

use crate::calculation::Calculation;
use crate::error::{CalcError, Result};
use crate::history::History;

/// The kind of mutation a snapshot was taken in front of.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mutation {
    Append,
    Clear,
    Load,
}

/// Independent copy of the history contents at one point in time.
#[derive(Clone, Debug)]
pub struct Snapshot {
    entries: Vec<Calculation>,
    cause: Mutation,
}

impl Snapshot {
    fn capture(history: &History, cause: Mutation) -> Self {
        Self { entries: history.all().to_vec(), cause }
    }

    fn restore_into(self, history: &mut History) {
        history.replace(self.entries);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum UndoOutcome {
    /// An append was reverted; carries the record it added.
    Removed(Calculation),
    ClearReverted { restored: usize },
    LoadReverted { restored: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub enum RedoOutcome {
    /// An append was reapplied; carries the record that is back.
    Reapplied(Calculation),
    Cleared,
    Reloaded { records: usize },
}

/// Two snapshot stacks driving undo and redo over a `History`.
#[derive(Debug, Default)]
pub struct UndoRedo {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_depth: Option<usize>,
}

impl UndoRedo {
    pub fn new(max_depth: Option<usize>) -> Self {
        Self { undo_stack: Vec::new(), redo_stack: Vec::new(), max_depth }
    }

    /// Must run right before `cause` mutates `history`. Invalidates redo.
    pub fn record_before_mutation(&mut self, history: &History, cause: Mutation) {
        self.push_undo(Snapshot::capture(history, cause));
        self.redo_stack.clear();
    }

    pub fn undo(&mut self, history: &mut History) -> Result<UndoOutcome> {
        let snapshot = self.undo_stack.pop().ok_or(CalcError::NothingToUndo)?;
        let cause = snapshot.cause;
        let removed = history.last().cloned();
        self.redo_stack.push(Snapshot::capture(history, cause));
        snapshot.restore_into(history);
        let outcome = match (cause, removed) {
            (Mutation::Append, Some(record)) => UndoOutcome::Removed(record),
            (Mutation::Load, _) => UndoOutcome::LoadReverted { restored: history.size() },
            _ => UndoOutcome::ClearReverted { restored: history.size() },
        };
        Ok(outcome)
    }

    pub fn redo(&mut self, history: &mut History) -> Result<RedoOutcome> {
        let snapshot = self.redo_stack.pop().ok_or(CalcError::NothingToRedo)?;
        let cause = snapshot.cause;
        self.push_undo(Snapshot::capture(history, cause));
        snapshot.restore_into(history);
        let outcome = match (cause, history.last()) {
            (Mutation::Append, Some(record)) => RedoOutcome::Reapplied(record.clone()),
            (Mutation::Load, _) => RedoOutcome::Reloaded { records: history.size() },
            _ => RedoOutcome::Cleared,
        };
        Ok(outcome)
    }

    #[cfg(test)]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        if let Some(max) = self.max_depth {
            while self.undo_stack.len() > max {
                self.undo_stack.remove(0);
            }
        }
    }
}
