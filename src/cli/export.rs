use crate::AppContext;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes a `Date,Grams,Cost` snapshot to `output`, or to stdout when no path is given.
pub async fn run(ctx: &AppContext, output: Option<&Path>) -> Result<()> {
    let snapshot = ctx
        .store
        .export_snapshot()
        .await
        .context("Failed to export ledger")?;

    match output {
        Some(path) => {
            std::fs::write(path, &snapshot)
                .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
            info!(path = %path.display(), bytes = snapshot.len(), "Exported ledger");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&snapshot)
                .context("Failed to write snapshot to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
