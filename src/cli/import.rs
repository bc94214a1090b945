use super::ui;
use crate::AppContext;
use crate::core::snapshot;
use anyhow::{Context, Result};
use chrono::Local;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Appends every row of a snapshot file to the ledger.
///
/// The whole file is parsed and validated, rejecting purchases dated after
/// today, before the rows are handed to the store in a single write.
pub async fn run(ctx: &AppContext, input: &Path) -> Result<usize> {
    let file =
        File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let records = snapshot::read_snapshot_until(file, Local::now().date_naive())
        .with_context(|| format!("Failed to read snapshot {}", input.display()))?;

    ctx.store
        .append_all(&records)
        .await
        .context("Failed to save imported purchases")?;
    info!(path = %input.display(), records = records.len(), "Imported snapshot");

    println!(
        "{}",
        ui::style_text(
            &format!("Imported {} purchases", records.len()),
            ui::StyleType::Success
        )
    );
    Ok(records.len())
}
