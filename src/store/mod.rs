pub mod disk;
pub mod memory;

use crate::core::config::{AppConfig, StorageBackend};
use crate::core::ledger::{LedgerStore, StorageError};
use disk::DiskLedger;
use memory::MemoryLedger;
use std::sync::Arc;
use tracing::debug;

/// Opens the ledger backend selected in the configuration.
pub fn open_store(config: &AppConfig) -> Result<Arc<dyn LedgerStore>, StorageError> {
    match config.storage {
        StorageBackend::Memory => {
            debug!("Using in-memory ledger");
            Ok(Arc::new(MemoryLedger::new()))
        }
        StorageBackend::Disk => {
            let path = config
                .default_data_path()
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            Ok(Arc::new(DiskLedger::open(&path)?))
        }
    }
}
