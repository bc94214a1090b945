pub mod cli;
pub mod core;
pub mod store;

use crate::cli::summary::SortOrder;
use crate::core::access::{AccessGate, Session};
use crate::core::config::AppConfig;
use crate::core::ledger::LedgerStore;
use crate::core::record::RecordId;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub enum AppCommand {
    Add {
        date: Option<NaiveDate>,
        grams: f64,
        cost: f64,
    },
    Remove {
        id: RecordId,
    },
    Clear {
        confirmed: bool,
    },
    Summary {
        price: Option<f64>,
        rate: Option<f64>,
        sort: SortOrder,
    },
    Export {
        output: Option<PathBuf>,
    },
    Import {
        input: PathBuf,
    },
}

impl AppCommand {
    /// Commands that only read may run against an empty ledger when storage fails.
    fn is_read_only(&self) -> bool {
        matches!(self, AppCommand::Summary { .. })
    }
}

/// Everything a command needs: configuration, the unlocked session and the ledger.
pub struct AppContext {
    pub config: AppConfig,
    pub session: Session,
    pub store: Arc<dyn LedgerStore>,
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    pin: Option<&str>,
) -> Result<()> {
    info!("Gold ledger starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        currency = %config.currency,
        yearly_rate = config.yearly_rate,
        storage = ?config.storage,
        "Loaded config"
    );

    let gate = AccessGate::new(config.access_pin.clone());
    let prompted;
    let pin = match pin {
        Some(pin) => Some(pin),
        None if gate.requires_pin() => {
            prompted = prompt_pin()?;
            Some(prompted.as_str())
        }
        None => None,
    };
    let session = gate.unlock(pin)?;

    let store: Arc<dyn LedgerStore> = match store::open_store(&config) {
        Ok(store) => store,
        Err(e) if command.is_read_only() => {
            warn!(error = %e, "Ledger storage unavailable, showing an empty ledger");
            Arc::new(store::memory::MemoryLedger::new())
        }
        Err(e) => return Err(e).context("Failed to open ledger storage"),
    };

    let ctx = AppContext {
        config,
        session,
        store,
    };
    debug!(unlocked_at = %ctx.session.unlocked_at(), "Session ready");

    match command {
        AppCommand::Add { date, grams, cost } => {
            cli::add::run(&ctx, date, grams, cost).await.map(|_| ())
        }
        AppCommand::Remove { id } => cli::remove::run(&ctx, id).await,
        AppCommand::Clear { confirmed } => cli::clear::run(&ctx, confirmed).await,
        AppCommand::Summary { price, rate, sort } => {
            cli::summary::run(&ctx, price, rate, sort).await
        }
        AppCommand::Export { output } => cli::export::run(&ctx, output.as_deref()).await,
        AppCommand::Import { input } => cli::import::run(&ctx, &input).await.map(|_| ()),
    }
}

fn prompt_pin() -> Result<String> {
    let term = console::Term::stderr();
    term.write_str("Enter access PIN: ")?;
    let pin = term.read_secure_line().context("Failed to read PIN")?;
    Ok(pin.trim().to_string())
}
