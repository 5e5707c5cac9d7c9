// observers.rs

use crate::calculation::Calculation;
use crate::history::Persistence;
use anyhow::Context;
use std::rc::Rc;
use tracing::info;

/// Notified after every successful calculation, in registration order.
pub trait Observer {
    fn on_calculation(&self, record: &Calculation, history: &[Calculation]) -> anyhow::Result<()>;

    fn name(&self) -> &'static str;
}

pub struct LoggingObserver;

impl Observer for LoggingObserver {
    fn on_calculation(&self, record: &Calculation, _history: &[Calculation]) -> anyhow::Result<()> {
        info!(
            operation = %record.operation(),
            a = record.operand_a(),
            b = record.operand_b(),
            result = record.result(),
            at = %record.timestamp().to_rfc3339(),
            "Calculation: {}",
            record
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "logging"
    }
}

/// Writes the whole history out after each calculation.
pub struct AutoSaveObserver {
    store: Rc<dyn Persistence>,
}

impl AutoSaveObserver {
    pub fn new(store: Rc<dyn Persistence>) -> Self {
        Self { store }
    }
}

impl Observer for AutoSaveObserver {
    fn on_calculation(&self, _record: &Calculation, history: &[Calculation]) -> anyhow::Result<()> {
        self.store
            .save(history)
            .with_context(|| format!("Auto-save to {} failed", self.store.location().display()))
    }

    fn name(&self) -> &'static str {
        "auto-save"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryFile;
    use crate::operations::OperationKind;

    #[test]
    fn logging_observer_never_fails() {
        let record = Calculation::new(OperationKind::Add, 1.0, 2.0, 3.0);
        assert!(LoggingObserver.on_calculation(&record, &[record.clone()]).is_ok());
    }

    #[test]
    fn auto_save_writes_the_history() {
        let dir = tempfile::tempdir().unwrap();
        let file = Rc::new(HistoryFile::new(dir.path().join("history.csv")));
        let observer = AutoSaveObserver::new(file.clone());
        let record = Calculation::new(OperationKind::Multiply, 3.0, 4.0, 12.0);
        observer.on_calculation(&record, &[record.clone()]).unwrap();
        assert_eq!(file.load().unwrap(), Some(vec![record]));
    }

    #[test]
    fn auto_save_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = Rc::new(HistoryFile::new(dir.path().join("missing/dir/history.csv")));
        let observer = AutoSaveObserver::new(file);
        let record = Calculation::new(OperationKind::Add, 1.0, 1.0, 2.0);
        let err = observer.on_calculation(&record, &[record.clone()]).unwrap_err();
        assert!(err.to_string().starts_with("Auto-save to"));
    }
}
