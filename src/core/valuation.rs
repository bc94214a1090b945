//! Valuation of purchase records against the current market price.
//!
//! Every purchase is charged simple, non-compounding daily interest at a yearly
//! rate from the day it was bought. A batch has *matured* once its market value
//! exceeds what was paid plus that accrued interest.
use crate::core::record::{PurchaseRecord, check_amount};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Opportunity cost charged on a purchase when no rate is configured (10% a year).
pub const DEFAULT_YEARLY_RATE: f64 = 0.10;

const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Cannot compute {metric} for a record with zero grams")]
    DivisionByZero { metric: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    /// Current value exceeds the break-even value; the batch can be sold at a profit.
    Matured,
    Holding,
}

/// A purchase record with everything derived from a single valuation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedRecord {
    pub record: PurchaseRecord,
    pub days_held: i64,
    pub accrued_cost: f64,
    pub break_even_value: f64,
    pub current_value: f64,
    pub profit: f64,
    pub status: Status,
}

impl EvaluatedRecord {
    /// Price paid per gram.
    pub fn unit_cost(&self) -> Result<f64, ValuationError> {
        self.per_gram("unit cost", self.record.total_cost)
    }

    /// Market price per gram at which this batch stops losing money.
    pub fn break_even_price(&self) -> Result<f64, ValuationError> {
        self.per_gram("break-even price", self.break_even_value)
    }

    fn per_gram(&self, metric: &'static str, amount: f64) -> Result<f64, ValuationError> {
        if self.record.grams == 0.0 {
            return Err(ValuationError::DivisionByZero { metric });
        }
        Ok(amount / self.record.grams)
    }
}

/// Evaluates each record against `current_price` (per gram) as of `as_of`.
///
/// The output has the same length and order as `records`. The function is pure:
/// the same arguments always give the same result, which is why the evaluation
/// time is passed in rather than read from the clock.
pub fn evaluate(
    records: &[PurchaseRecord],
    current_price: f64,
    yearly_rate: f64,
    as_of: NaiveDateTime,
) -> Result<Vec<EvaluatedRecord>, ValuationError> {
    check_market_inputs(current_price, yearly_rate)?;

    let today = as_of.date();
    let evaluated = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            record
                .validate()
                .map_err(|e| ValuationError::Validation(format!("record {}: {e}", index + 1)))?;

            if record.purchase_date > today {
                return Err(ValuationError::Validation(format!(
                    "record {}: purchase date {} is after the valuation date {}",
                    index + 1,
                    record.purchase_date,
                    today
                )));
            }

            let days_held = (today - record.purchase_date).num_days();
            let accrued_cost = record.total_cost * yearly_rate * days_held as f64 / DAYS_PER_YEAR;
            let break_even_value = record.total_cost + accrued_cost;
            let current_value = record.grams * current_price;
            let profit = current_value - break_even_value;
            let status = if profit > 0.0 {
                Status::Matured
            } else {
                Status::Holding
            };

            Ok(EvaluatedRecord {
                record: *record,
                days_held,
                accrued_cost,
                break_even_value,
                current_value,
                profit,
                status,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        records = evaluated.len(),
        current_price, yearly_rate, %as_of, "Evaluated ledger"
    );
    Ok(evaluated)
}

/// Rejects a negative or non-finite price or rate.
pub fn check_market_inputs(current_price: f64, yearly_rate: f64) -> Result<(), ValuationError> {
    check_amount("current price", current_price)?;
    check_amount("yearly rate", yearly_rate)
}

/// Evaluates at the default yearly rate against the local wall clock.
pub fn evaluate_now(
    records: &[PurchaseRecord],
    current_price: f64,
) -> Result<Vec<EvaluatedRecord>, ValuationError> {
    evaluate(
        records,
        current_price,
        DEFAULT_YEARLY_RATE,
        Local::now().naive_local(),
    )
}

/// Totals across a set of evaluated records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValuationSummary {
    pub count: usize,
    pub matured: usize,
    pub grams: f64,
    pub total_cost: f64,
    pub accrued_cost: f64,
    pub break_even_value: f64,
    pub current_value: f64,
    pub profit: f64,
}

pub fn summarize(evaluated: &[EvaluatedRecord]) -> ValuationSummary {
    evaluated
        .iter()
        .fold(ValuationSummary::default(), |mut acc, e| {
            acc.count += 1;
            if e.status == Status::Matured {
                acc.matured += 1;
            }
            acc.grams += e.record.grams;
            acc.total_cost += e.record.total_cost;
            acc.accrued_cost += e.accrued_cost;
            acc.break_even_value += e.break_even_value;
            acc.current_value += e.current_value;
            acc.profit += e.profit;
            acc
        })
}
