use super::ui;
use crate::AppContext;
use crate::core::record::{PurchaseRecord, RecordId};
use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use tracing::info;

/// Records a purchase. `date` defaults to today and may not lie in the future.
pub async fn run(
    ctx: &AppContext,
    date: Option<NaiveDate>,
    grams: f64,
    total_cost: f64,
) -> Result<RecordId> {
    let today = Local::now().date_naive();
    let purchase_date = date.unwrap_or(today);
    if purchase_date > today {
        bail!("Purchase date {purchase_date} is in the future");
    }

    let record = PurchaseRecord::new(purchase_date, grams, total_cost)?;
    let id = ctx
        .store
        .append(record)
        .await
        .context("Failed to save purchase")?;
    info!(%id, %purchase_date, grams, total_cost, "Recorded purchase");

    println!(
        "{} #{id}: {grams:.2} g for {total_cost:.2} {} on {purchase_date}",
        ui::style_text("Saved purchase", ui::StyleType::Success),
        ctx.config.currency
    );
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_context;
    use chrono::Duration;

    #[tokio::test]
    async fn test_add_appends_record() {
        let ctx = memory_context();
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();

        let id = run(&ctx, Some(date), 5.0, 950.0).await.unwrap();

        let entries = ctx.store.load_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, id);
        assert_eq!(entries[0].record.purchase_date, date);
        assert_eq!(entries[0].record.total_cost, 950.0);
    }

    #[tokio::test]
    async fn test_add_defaults_to_today() {
        let ctx = memory_context();
        run(&ctx, None, 1.0, 190.0).await.unwrap();
        let entries = ctx.store.load_all().await.unwrap();
        assert_eq!(entries[0].record.purchase_date, Local::now().date_naive());
    }

    #[tokio::test]
    async fn test_add_rejects_future_and_negative() {
        let ctx = memory_context();
        let tomorrow = Local::now().date_naive() + Duration::days(1);

        let err = run(&ctx, Some(tomorrow), 1.0, 190.0).await.unwrap_err();
        assert!(err.to_string().contains("in the future"));
        assert!(run(&ctx, None, -1.0, 190.0).await.is_err());
        assert!(ctx.store.load_all().await.unwrap().is_empty());
    }
}
