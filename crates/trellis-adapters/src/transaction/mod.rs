//! Transaction manager adapters.

mod memory;

pub use memory::{InMemoryTransactionManager, TransactionOutcome, TransactionRecord};
