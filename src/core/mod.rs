//! Core business logic abstractions

pub mod access;
pub mod config;
pub mod ledger;
pub mod log;
pub mod record;
pub mod snapshot;
pub mod valuation;

// Re-export main types for cleaner imports
pub use access::{AccessError, AccessGate, Session};
pub use ledger::{LedgerStore, StorageError};
pub use record::{LedgerEntry, PurchaseRecord, RecordId};
pub use valuation::{EvaluatedRecord, Status, ValuationError, ValuationSummary};
