use crate::core::ledger::{LedgerStore, StorageError};
use crate::core::record::{LedgerEntry, PurchaseRecord, RecordId};
use async_trait::async_trait;
use fjall::{Batch, Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::debug;

const PURCHASES_PARTITION: &str = "purchases";
const META_PARTITION: &str = "meta";
const LAST_ID_KEY: &str = "last_id";

/// Ledger persisted in a fjall keyspace.
///
/// Keys are big-endian record ids so a partition scan yields insertion order.
/// The last issued id is stored separately and survives removals and clears.
pub struct DiskLedger {
    keyspace: Keyspace,
    purchases: PartitionHandle,
    meta: PartitionHandle,
    last_id: Mutex<u64>,
}

impl DiskLedger {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path).map_err(|e| {
            StorageError::Unavailable(format!("cannot create {}: {e}", path.display()))
        })?;

        let keyspace = Config::new(path.join("ledger")).open()?;
        let purchases =
            keyspace.open_partition(PURCHASES_PARTITION, PartitionCreateOptions::default())?;
        let meta = keyspace.open_partition(META_PARTITION, PartitionCreateOptions::default())?;

        let last_id = match meta.get(LAST_ID_KEY)? {
            Some(bytes) => decode_id(&bytes)?,
            None => 0,
        };
        debug!(path = %path.display(), last_id, "Opened disk ledger");

        Ok(Self {
            keyspace,
            purchases,
            meta,
            last_id: Mutex::new(last_id),
        })
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    fn batch(&self) -> Batch {
        self.keyspace.batch().durability(Some(PersistMode::SyncAll))
    }
}

impl From<fjall::Error> for StorageError {
    fn from(e: fjall::Error) -> Self {
        StorageError::Unavailable(e.to_string())
    }
}

fn encode_id(id: u64) -> Vec<u8> {
    id.to_be_bytes().to_vec()
}

fn decode_id(bytes: &[u8]) -> Result<u64, StorageError> {
    let raw: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StorageError::Malformed(format!("bad record key of {} bytes", bytes.len())))?;
    Ok(u64::from_be_bytes(raw))
}

#[async_trait]
impl LedgerStore for DiskLedger {
    async fn load_all(&self) -> Result<Vec<LedgerEntry>, StorageError> {
        let mut entries = Vec::new();
        for item in self.purchases.iter() {
            let (key, value) = item?;
            let id = RecordId(decode_id(&key)?);
            let record: PurchaseRecord = serde_json::from_slice(&value)?;
            entries.push(LedgerEntry { id, record });
        }
        debug!(records = entries.len(), "Loaded ledger from disk");
        Ok(entries)
    }

    async fn append(&self, record: PurchaseRecord) -> Result<RecordId, StorageError> {
        let ids = self.append_all(&[record]).await?;
        ids.first()
            .copied()
            .ok_or_else(|| StorageError::Unavailable("append wrote no record".to_string()))
    }

    /// Writes the records and the new last id in one atomic batch.
    async fn append_all(&self, records: &[PurchaseRecord]) -> Result<Vec<RecordId>, StorageError> {
        let mut last_id = self.last_id.lock().await;

        let mut batch = self.batch();
        let mut ids = Vec::with_capacity(records.len());
        for (offset, record) in (1..).zip(records) {
            let id = *last_id + offset;
            batch.insert(&self.purchases, encode_id(id), serde_json::to_vec(record)?);
            ids.push(RecordId(id));
        }
        let Some(&RecordId(new_last)) = ids.last() else {
            return Ok(ids);
        };
        batch.insert(&self.meta, LAST_ID_KEY, encode_id(new_last));
        batch.commit()?;

        *last_id = new_last;
        debug!(records = ids.len(), last_id = new_last, "Ledger APPEND");
        Ok(ids)
    }

    async fn remove(&self, id: RecordId) -> Result<(), StorageError> {
        let key = encode_id(id.0);
        if !self.purchases.contains_key(&key)? {
            return Err(StorageError::RecordNotFound(id));
        }
        self.purchases.remove(key)?;
        self.persist()?;
        debug!(%id, "Ledger REMOVE");
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), StorageError> {
        let mut batch = self.batch();
        for item in self.purchases.iter() {
            let (key, _) = item?;
            batch.remove(&self.purchases, key);
        }
        batch.commit()?;
        debug!("Ledger CLEAR");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn purchase(day: u32, grams: f64, cost: f64) -> PurchaseRecord {
        PurchaseRecord::new(NaiveDate::from_ymd_opt(2024, 2, day).unwrap(), grams, cost).unwrap()
    }

    #[tokio::test]
    async fn test_disk_ledger_append_load() {
        let dir = tempdir().unwrap();
        let ledger = DiskLedger::open(dir.path()).unwrap();

        assert!(ledger.load_all().await.unwrap().is_empty());

        let a = ledger.append(purchase(10, 5.0, 900.0)).await.unwrap();
        let b = ledger.append(purchase(1, 1.0, 185.0)).await.unwrap();
        assert_eq!(a, RecordId(1));
        assert_eq!(b, RecordId(2));

        let entries = ledger.load_all().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, a);
        assert_eq!(entries[0].record, purchase(10, 5.0, 900.0));
        assert_eq!(entries[1].id, b);
    }

    #[tokio::test]
    async fn test_disk_ledger_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let ledger = DiskLedger::open(dir.path()).unwrap();
            ledger.append(purchase(3, 2.0, 370.0)).await.unwrap();
            ledger.append(purchase(4, 3.0, 560.0)).await.unwrap();
        }

        let ledger = DiskLedger::open(dir.path()).unwrap();
        let entries = ledger.load_all().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].record.total_cost, 560.0);

        let next = ledger.append(purchase(5, 1.0, 190.0)).await.unwrap();
        assert_eq!(next, RecordId(3));
    }

    #[tokio::test]
    async fn test_disk_ledger_remove() {
        let dir = tempdir().unwrap();
        let ledger = DiskLedger::open(dir.path()).unwrap();
        let a = ledger.append(purchase(1, 1.0, 180.0)).await.unwrap();
        let b = ledger.append(purchase(2, 1.0, 181.0)).await.unwrap();

        ledger.remove(a).await.unwrap();
        let entries = ledger.load_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, b);

        assert!(matches!(
            ledger.remove(a).await,
            Err(StorageError::RecordNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_disk_ledger_clear_keeps_id_sequence() {
        let dir = tempdir().unwrap();
        let ledger = DiskLedger::open(dir.path()).unwrap();
        ledger.append(purchase(1, 1.0, 180.0)).await.unwrap();
        ledger.append(purchase(2, 1.0, 181.0)).await.unwrap();

        ledger.clear_all().await.unwrap();
        assert!(ledger.load_all().await.unwrap().is_empty());

        let id = ledger.append(purchase(3, 1.0, 182.0)).await.unwrap();
        assert_eq!(id, RecordId(3));
    }

    #[tokio::test]
    async fn test_disk_ledger_append_all_is_one_write() {
        let dir = tempdir().unwrap();
        {
            let ledger = DiskLedger::open(dir.path()).unwrap();
            ledger.append(purchase(1, 1.0, 180.0)).await.unwrap();
            let ids = ledger
                .append_all(&[purchase(2, 2.0, 362.0), purchase(3, 3.0, 540.0)])
                .await
                .unwrap();
            assert_eq!(ids, vec![RecordId(2), RecordId(3)]);
            assert!(ledger.append_all(&[]).await.unwrap().is_empty());
        }

        let ledger = DiskLedger::open(dir.path()).unwrap();
        let stored = ledger.meta.get(LAST_ID_KEY).unwrap().unwrap();
        assert_eq!(decode_id(&stored).unwrap(), 3);
        assert_eq!(ledger.load_all().await.unwrap().len(), 3);
        assert_eq!(ledger.append(purchase(4, 1.0, 181.0)).await.unwrap(), RecordId(4));
    }

    #[test]
    fn test_decode_id_rejects_short_keys() {
        assert_eq!(decode_id(&encode_id(42)).unwrap(), 42);
        assert!(matches!(decode_id(&[1, 2, 3]), Err(StorageError::Malformed(_))));
    }
}
