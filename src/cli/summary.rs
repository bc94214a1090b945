use super::ui;
use crate::AppContext;
use crate::core::ledger;
use crate::core::record::{LedgerEntry, PurchaseRecord, RecordId};
use crate::core::valuation::{self, EvaluatedRecord, ValuationError, ValuationSummary};
use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDateTime};
use comfy_table::{Cell, Table};
use tracing::{debug, info};

/// Row order of the portfolio table. Valuation itself never reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortOrder {
    /// Order in which purchases were recorded
    #[default]
    Insertion,
    /// Oldest purchase first
    Date,
    /// Most profitable batch first
    Profit,
}

/// A valuation pass over the whole ledger, ready for display.
#[derive(Debug)]
pub struct PortfolioReport {
    pub rows: Vec<(RecordId, EvaluatedRecord)>,
    pub summary: ValuationSummary,
    pub currency: String,
    pub price: f64,
    pub yearly_rate: f64,
}

impl PortfolioReport {
    pub fn build(
        entries: &[LedgerEntry],
        price: f64,
        yearly_rate: f64,
        as_of: NaiveDateTime,
        sort: SortOrder,
        currency: &str,
    ) -> Result<Self, ValuationError> {
        let records: Vec<PurchaseRecord> = entries.iter().map(|e| e.record).collect();
        let evaluated = valuation::evaluate(&records, price, yearly_rate, as_of)?;
        let summary = valuation::summarize(&evaluated);

        let mut rows: Vec<(RecordId, EvaluatedRecord)> =
            entries.iter().map(|e| e.id).zip(evaluated).collect();
        match sort {
            SortOrder::Insertion => {}
            SortOrder::Date => rows.sort_by_key(|(_, e)| e.record.purchase_date),
            SortOrder::Profit => rows.sort_by(|(_, a), (_, b)| b.profit.total_cmp(&a.profit)),
        }

        Ok(Self {
            rows,
            summary,
            currency: currency.to_string(),
            price,
            yearly_rate,
        })
    }

    pub fn table(&self) -> Table {
        let currency = &self.currency;
        let mut table = ui::new_styled_table();

        table.set_header(vec![
            ui::header_cell("ID"),
            ui::header_cell("Purchase Date"),
            ui::header_cell("Grams"),
            ui::header_cell(&format!("Total Cost ({currency})")),
            ui::header_cell("Days"),
            ui::header_cell("Interest"),
            ui::header_cell("Break-even"),
            ui::header_cell("Break-even/g"),
            ui::header_cell("Value Now"),
            ui::header_cell("Profit"),
            ui::header_cell("Status"),
        ]);

        for (id, e) in &self.rows {
            table.add_row(vec![
                Cell::new(id),
                Cell::new(e.record.purchase_date),
                ui::amount_cell(e.record.grams),
                ui::amount_cell(e.record.total_cost),
                Cell::new(e.days_held),
                ui::amount_cell(e.accrued_cost),
                ui::amount_cell(e.break_even_value),
                ui::format_result_cell(e.break_even_price()),
                ui::amount_cell(e.current_value),
                ui::profit_cell(e.profit),
                ui::status_cell(e.status),
            ]);
        }
        table
    }

    pub fn display_as_table(&self) -> String {
        let currency = &self.currency;
        let mut output = format!(
            "Portfolio at {} {currency}/g, {:.2}% a year\n\n",
            ui::style_text(&format!("{:.2}", self.price), ui::StyleType::Title),
            self.yearly_rate * 100.0
        );
        output.push_str(&self.table().to_string());

        let s = &self.summary;
        let profit_style = if s.profit > 0.0 {
            ui::StyleType::TotalValue
        } else {
            ui::StyleType::Error
        };
        output.push_str(&format!(
            "\n\n{}: {:.2} g, cost {:.2}, break-even {:.2}, value {:.2}\n{} ({currency}): {}",
            ui::style_text("Total", ui::StyleType::TotalLabel),
            s.grams,
            s.total_cost,
            s.break_even_value,
            s.current_value,
            ui::style_text("Profit", ui::StyleType::TotalLabel),
            ui::style_text(&format!("{:.2}", s.profit), profit_style),
        ));

        if s.matured > 0 {
            let noun = if s.matured == 1 { "item is" } else { "items are" };
            output.push_str(&format!(
                "\n\n{}",
                ui::style_text(
                    &format!("🔥 {} {noun} ready to sell for a profit!", s.matured),
                    ui::StyleType::Success
                )
            ));
        }

        output
    }
}

pub async fn run(
    ctx: &AppContext,
    price: Option<f64>,
    yearly_rate: Option<f64>,
    sort: SortOrder,
) -> Result<()> {
    let price = price.or(ctx.config.default_price).ok_or_else(|| {
        anyhow!("No market price given; pass --price or set default_price in the config")
    })?;
    let yearly_rate = yearly_rate.unwrap_or(ctx.config.yearly_rate);
    valuation::check_market_inputs(price, yearly_rate)?;
    info!(price, yearly_rate, "Valuing ledger");

    let entries = ledger::load_or_empty(ctx.store.as_ref()).await;
    if entries.is_empty() {
        println!(
            "{}",
            ui::style_text(
                "No purchases yet. Use `aurum add` to record your first gold bar.",
                ui::StyleType::Subtle
            )
        );
        return Ok(());
    }

    let report = PortfolioReport::build(
        &entries,
        price,
        yearly_rate,
        Local::now().naive_local(),
        sort,
        &ctx.config.currency,
    )?;
    debug!(summary = ?report.summary, "Built portfolio report");

    println!("{}", report.display_as_table());
    Ok(())
}
