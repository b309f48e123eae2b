//! In-memory transaction manager.

use std::sync::{Arc, Mutex};

use tracing::debug;
use uuid::Uuid;

use trellis_core::{
    application::{
        ApplicationError,
        ports::{TransactionDefinition, TransactionManager, TransactionStatus},
    },
    error::TrellisResult,
};

/// Outcome of a finished transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOutcome {
    Committed,
    RolledBack,
}

/// A transaction as the manager saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub name: String,
    pub read_only: bool,
    pub outcome: Option<TransactionOutcome>,
}

#[derive(Debug, Default)]
struct Inner {
    active: Vec<TransactionRecord>,
    finished: Vec<TransactionRecord>,
}

/// Transaction manager that only records boundaries.
///
/// A `begin` while another transaction is active joins it; only the
/// outermost status commits or rolls back.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransactionManager {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryTransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finished transactions, oldest first.
    pub fn history(&self) -> Vec<TransactionRecord> {
        self.inner
            .lock()
            .map(|inner| inner.finished.clone())
            .unwrap_or_default()
    }

    pub fn active_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.active.len()).unwrap_or(0)
    }

    fn finish(&self, status: &TransactionStatus, outcome: TransactionOutcome) -> TrellisResult<()> {
        if !status.new_transaction {
            debug!(transaction = %status, "Participating transaction, nothing to do");
            return Ok(());
        }
        let mut inner = self.inner.lock().map_err(|_| ApplicationError::LockPoisoned {
            what: "transaction manager",
        })?;
        let index = inner
            .active
            .iter()
            .position(|record| record.id == status.id)
            .ok_or_else(|| ApplicationError::Transaction(format!("{status} is not active")))?;
        let mut record = inner.active.remove(index);
        record.outcome = Some(outcome);
        debug!(transaction = %status, ?outcome, "Transaction finished");
        inner.finished.push(record);
        Ok(())
    }
}

impl TransactionManager for InMemoryTransactionManager {
    fn begin(&self, definition: &TransactionDefinition) -> TrellisResult<TransactionStatus> {
        let mut inner = self.inner.lock().map_err(|_| ApplicationError::LockPoisoned {
            what: "transaction manager",
        })?;

        if let Some(outer) = inner.active.first() {
            return Ok(TransactionStatus {
                id: outer.id,
                name: definition.name.clone(),
                new_transaction: false,
            });
        }

        let record = TransactionRecord {
            id: Uuid::new_v4(),
            name: definition.name.clone(),
            read_only: definition.read_only,
            outcome: None,
        };
        let status = TransactionStatus {
            id: record.id,
            name: record.name.clone(),
            new_transaction: true,
        };
        inner.active.push(record);
        Ok(status)
    }

    fn commit(&self, status: &TransactionStatus) -> TrellisResult<()> {
        self.finish(status, TransactionOutcome::Committed)
    }

    fn rollback(&self, status: &TransactionStatus) -> TrellisResult<()> {
        self.finish(status, TransactionOutcome::RolledBack)
    }
}
