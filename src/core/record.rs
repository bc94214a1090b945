//! Purchase records as they are entered and stored.

use crate::core::valuation::ValuationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Stable identifier handed out by a ledger store when a record is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(RecordId)
    }
}

/// A single gold purchase: when it happened, how much was bought and what it cost.
///
/// Field names map to the `Date`, `Grams` and `Cost` columns of the tabular
/// layout used for persistence and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    #[serde(rename = "Date", alias = "Purchase Date")]
    pub purchase_date: NaiveDate,
    #[serde(rename = "Grams")]
    pub grams: f64,
    #[serde(rename = "Cost", alias = "Total Cost")]
    pub total_cost: f64,
}

impl PurchaseRecord {
    pub fn new(purchase_date: NaiveDate, grams: f64, total_cost: f64) -> Result<Self, ValuationError> {
        let record = Self {
            purchase_date,
            grams,
            total_cost,
        };
        record.validate()?;
        Ok(record)
    }

    /// Checks that quantity and cost are finite and non-negative.
    pub fn validate(&self) -> Result<(), ValuationError> {
        check_amount("grams", self.grams)?;
        check_amount("total cost", self.total_cost)
    }
}

/// Rejects NaN, infinities and negative amounts.
pub(crate) fn check_amount(name: &str, value: f64) -> Result<(), ValuationError> {
    if !value.is_finite() {
        return Err(ValuationError::Validation(format!(
            "{name} must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(ValuationError::Validation(format!(
            "{name} must not be negative, got {value}"
        )));
    }
    Ok(())
}

/// A purchase record together with the id its store assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: RecordId,
    pub record: PurchaseRecord,
}
