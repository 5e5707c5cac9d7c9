// history.rs

use crate::calculation::{Calculation, CSV_HEADER};
use crate::error::PersistError;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Bounded, oldest-first list of calculations.
#[derive(Clone, Debug, PartialEq)]
pub struct History {
    entries: Vec<Calculation>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self { entries: Vec::new(), capacity: capacity.max(1) }
    }

    /// Appends, evicting the oldest entry first when full.
    pub fn append(&mut self, entry: Calculation) {
        if self.entries.len() >= self.capacity {
            self.entries.remove(0);
        }
        self.entries.push(entry);
    }

    pub fn last(&self) -> Option<&Calculation> {
        self.entries.last()
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn all(&self) -> &[Calculation] {
        &self.entries
    }

    /// Replaces the contents, keeping only the newest `capacity` entries.
    pub fn replace(&mut self, mut entries: Vec<Calculation>) {
        if entries.len() > self.capacity {
            entries.drain(..entries.len() - self.capacity);
        }
        self.entries = entries;
    }
}

pub trait Persistence {
    fn save(&self, records: &[Calculation]) -> Result<(), PersistError>;
    /// `Ok(None)` when there is nothing stored yet.
    fn load(&self) -> Result<Option<Vec<Calculation>>, PersistError>;
    fn location(&self) -> &Path;
}

/// CSV history file: a header line, then one row per calculation.
#[derive(Debug, Clone)]
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> PersistError {
        PersistError::Io { path: self.path.clone(), source }
    }
}

impl Persistence for HistoryFile {
    fn save(&self, records: &[Calculation]) -> Result<(), PersistError> {
        let file = File::create(&self.path).map_err(|e| self.io_error(e))?;
        let mut out = BufWriter::new(file);
        writeln!(out, "{}", CSV_HEADER).map_err(|e| self.io_error(e))?;
        for record in records {
            writeln!(out, "{}", record.to_csv_row()).map_err(|e| self.io_error(e))?;
        }
        out.flush().map_err(|e| self.io_error(e))
    }

    fn load(&self) -> Result<Option<Vec<Calculation>>, PersistError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let reader = BufReader::new(file);
        let mut records = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| self.io_error(e))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || (idx == 0 && trimmed == CSV_HEADER) {
                continue;
            }
            let record = Calculation::from_csv_row(trimmed).map_err(|reason| {
                PersistError::Malformed { path: self.path.clone(), line: idx + 1, reason }
            })?;
            records.push(record);
        }
        Ok(Some(records))
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
