use super::ui;
use crate::AppContext;
use crate::core::record::RecordId;
use anyhow::{Context, Result};
use tracing::info;

pub async fn run(ctx: &AppContext, id: RecordId) -> Result<()> {
    ctx.store
        .remove(id)
        .await
        .with_context(|| format!("Failed to delete purchase #{id}"))?;
    info!(%id, "Deleted purchase");

    println!(
        "{}",
        ui::style_text(&format!("Deleted purchase #{id}"), ui::StyleType::Success)
    );
    Ok(())
}
