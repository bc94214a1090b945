//! Tabular `Date,Grams,Cost` snapshots used for export and import.

use crate::core::ledger::StorageError;
use crate::core::record::{LedgerEntry, PurchaseRecord};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::io::Read;
use tracing::debug;

pub fn write_snapshot(entries: &[LedgerEntry]) -> Result<Vec<u8>, StorageError> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());

    if entries.is_empty() {
        // serde only emits headers alongside the first row
        writer
            .write_record(["Date", "Grams", "Cost"])
            .map_err(|e| StorageError::Malformed(e.to_string()))?;
    }
    for entry in entries {
        writer
            .serialize(entry.record)
            .map_err(|e| StorageError::Malformed(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| StorageError::Malformed(e.to_string()))?;
    debug!(rows = entries.len(), bytes = bytes.len(), "Wrote snapshot");
    Ok(bytes)
}

/// Parses a snapshot, validating every row.
///
/// Also accepts the `Purchase Date` and `Total Cost` headers of older
/// spreadsheet exports.
pub fn read_snapshot<R: Read>(input: R) -> Result<Vec<PurchaseRecord>, StorageError> {
    read_snapshot_until(input, NaiveDate::MAX)
}

/// Like [`read_snapshot`], but also rejects purchases dated after `latest`.
pub fn read_snapshot_until<R: Read>(
    input: R,
    latest: NaiveDate,
) -> Result<Vec<PurchaseRecord>, StorageError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| StorageError::Malformed(e.to_string()))?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| StorageError::Malformed(e.to_string()))?;
        let line = row.position().map_or(0, |p| p.line());
        let malformed =
            |e: &dyn std::fmt::Display| StorageError::Malformed(format!("line {line}: {e}"));

        let record: PurchaseRecord = row
            .deserialize(Some(&headers))
            .map_err(|e| malformed(&e))?;
        record.validate().map_err(|e| malformed(&e))?;
        if record.purchase_date > latest {
            return Err(malformed(&format!(
                "purchase date {} is in the future",
                record.purchase_date
            )));
        }
        records.push(record);
    }

    debug!(rows = records.len(), "Read snapshot");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::RecordId;

    fn entry(id: u64, date: &str, grams: f64, cost: f64) -> LedgerEntry {
        LedgerEntry {
            id: RecordId(id),
            record: PurchaseRecord::new(date.parse::<NaiveDate>().unwrap(), grams, cost).unwrap(),
        }
    }

    #[test]
    fn test_write_snapshot_layout() {
        let entries = vec![
            entry(1, "2024-01-15", 10.0, 1000.0),
            entry(4, "2024-11-02", 2.5, 480.75),
        ];
        let text = String::from_utf8(write_snapshot(&entries).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Date,Grams,Cost");
        assert_eq!(lines[1], "2024-01-15,10.0,1000.0");
        assert_eq!(lines[2], "2024-11-02,2.5,480.75");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_snapshot_has_header() {
        let text = String::from_utf8(write_snapshot(&[]).unwrap()).unwrap();
        assert_eq!(text.trim_end(), "Date,Grams,Cost");
        assert!(read_snapshot(text.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_read_snapshot_written_by_us() {
        let entries = vec![entry(1, "2024-01-15", 10.0, 1000.0)];
        let bytes = write_snapshot(&entries).unwrap();
        let records = read_snapshot(bytes.as_slice()).unwrap();
        assert_eq!(records, vec![entries[0].record]);
    }

    #[test]
    fn test_read_legacy_spreadsheet_headers() {
        let data = "Purchase Date,Grams,Total Cost\n2023-05-01, 5 , 900\n2023-06-01,1.5,285.5\n";
        let records = read_snapshot(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].purchase_date,
            NaiveDate::from_ymd_opt(2023, 5, 1).unwrap()
        );
        assert_eq!(records[0].grams, 5.0);
        assert_eq!(records[1].total_cost, 285.5);
    }

    #[test]
    fn test_read_rejects_negative_values_with_line() {
        let data = "Date,Grams,Cost\n2023-05-01,5,900\n2023-06-01,-1,100\n";
        let err = read_snapshot(data.as_bytes()).unwrap_err();
        assert!(matches!(err, StorageError::Malformed(_)));
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn test_read_until_rejects_later_dates_with_line() {
        let data = "Date,Grams,Cost\n2024-01-01,1,100\n2024-03-02,1,100\n";
        let latest = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let err = read_snapshot_until(data.as_bytes(), latest).unwrap_err();
        assert!(matches!(err, StorageError::Malformed(_)));
        assert!(err.to_string().contains("line 3"), "{err}");
        assert!(err.to_string().contains("2024-03-02"), "{err}");

        assert_eq!(read_snapshot(data.as_bytes()).unwrap().len(), 2);
    }

    #[test]
    fn test_read_rejects_unparseable_rows() {
        let data = "Date,Grams,Cost\nyesterday,5,900\n";
        assert!(matches!(
            read_snapshot(data.as_bytes()),
            Err(StorageError::Malformed(_))
        ));
    }
}
