use crate::core::ledger::{LedgerStore, StorageError};
use crate::core::record::{LedgerEntry, PurchaseRecord, RecordId};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
struct Inner {
    entries: Vec<LedgerEntry>,
    next_id: u64,
}

/// Ledger kept in memory for the lifetime of the process.
#[derive(Default)]
pub struct MemoryLedger {
    inner: Mutex<Inner>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn load_all(&self) -> Result<Vec<LedgerEntry>, StorageError> {
        let inner = self.inner.lock().await;
        Ok(inner.entries.clone())
    }

    async fn append(&self, record: PurchaseRecord) -> Result<RecordId, StorageError> {
        let mut inner = self.inner.lock().await;
        inner.next_id += 1;
        let id = RecordId(inner.next_id);
        inner.entries.push(LedgerEntry { id, record });
        debug!(%id, "Ledger APPEND");
        Ok(id)
    }

    async fn append_all(&self, records: &[PurchaseRecord]) -> Result<Vec<RecordId>, StorageError> {
        let mut inner = self.inner.lock().await;
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            inner.next_id += 1;
            let id = RecordId(inner.next_id);
            inner.entries.push(LedgerEntry { id, record: *record });
            ids.push(id);
        }
        debug!(records = ids.len(), "Ledger APPEND");
        Ok(ids)
    }

    async fn remove(&self, id: RecordId) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().await;
        let position = inner
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(StorageError::RecordNotFound(id))?;
        inner.entries.remove(position);
        debug!(%id, "Ledger REMOVE");
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().await;
        inner.entries.clear();
        debug!("Ledger CLEAR");
        Ok(())
    }
}
