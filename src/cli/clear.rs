use super::ui;
use crate::AppContext;
use anyhow::{Context, Result};
use tracing::info;

/// Deletes every purchase. Does nothing unless `confirmed` is set.
pub async fn run(ctx: &AppContext, confirmed: bool) -> Result<()> {
    if !confirmed {
        println!(
            "{}",
            ui::style_text(
                "This deletes every purchase. Re-run with --yes to confirm.",
                ui::StyleType::Error
            )
        );
        return Ok(());
    }

    ctx.store
        .clear_all()
        .await
        .context("Failed to clear the ledger")?;
    info!("Cleared ledger");

    println!(
        "{}",
        ui::style_text("All purchases deleted", ui::StyleType::Success)
    );
    Ok(())
}
