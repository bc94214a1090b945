//! Ledger store abstraction

use crate::core::record::{LedgerEntry, PurchaseRecord, RecordId};
use crate::core::snapshot;
use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Ledger storage is unavailable: {0}")]
    Unavailable(String),

    #[error("No purchase record with id {0}")]
    RecordNotFound(RecordId),

    #[error("Malformed ledger data: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Malformed(e.to_string())
    }
}

/// Ordered collection of purchase records.
///
/// Records are returned in the order they were appended. Every appended record
/// gets a fresh [`RecordId`] that stays valid until the record is removed.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn load_all(&self) -> Result<Vec<LedgerEntry>, StorageError>;

    async fn append(&self, record: PurchaseRecord) -> Result<RecordId, StorageError>;

    /// Appends several records, returning their ids in order.
    ///
    /// Backends that can write atomically override this so a failure leaves
    /// none of the records behind.
    async fn append_all(&self, records: &[PurchaseRecord]) -> Result<Vec<RecordId>, StorageError> {
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            ids.push(self.append(*record).await?);
        }
        Ok(ids)
    }

    async fn remove(&self, id: RecordId) -> Result<(), StorageError>;

    async fn clear_all(&self) -> Result<(), StorageError>;

    /// Serializes the whole ledger as `Date,Grams,Cost` delimited text.
    async fn export_snapshot(&self) -> Result<Vec<u8>, StorageError> {
        let entries = self.load_all().await?;
        snapshot::write_snapshot(&entries)
    }
}

/// Loads the ledger, treating an unreadable store as an empty ledger.
pub async fn load_or_empty(store: &dyn LedgerStore) -> Vec<LedgerEntry> {
    match store.load_all().await {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "Failed to load ledger, continuing with an empty one");
            Vec::new()
        }
    }
}
