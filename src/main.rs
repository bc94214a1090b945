use anyhow::Result;
use aurum::cli::summary::SortOrder;
use aurum::core::log::init_logging;
use aurum::core::record::RecordId;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Access PIN; prompted for when required and not given
    #[arg(long, global = true, env = "AURUM_PIN", hide_env_values = true)]
    pin: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for aurum::AppCommand {
    fn from(cmd: Commands) -> aurum::AppCommand {
        match cmd {
            Commands::Add { date, grams, cost } => aurum::AppCommand::Add { date, grams, cost },
            Commands::Remove { id } => aurum::AppCommand::Remove { id: RecordId(id) },
            Commands::Clear { yes } => aurum::AppCommand::Clear { confirmed: yes },
            Commands::Summary { price, rate, sort } => {
                aurum::AppCommand::Summary { price, rate, sort }
            }
            Commands::Export { output } => aurum::AppCommand::Export { output },
            Commands::Import { input } => aurum::AppCommand::Import { input },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Record a gold purchase
    Add {
        /// Amount bought, in grams
        #[arg(short, long)]
        grams: f64,
        /// Total amount paid
        #[arg(long)]
        cost: f64,
        /// Purchase date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Delete a purchase by its ID
    Remove { id: u64 },
    /// Delete every purchase
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
    /// Show which purchases are ready to sell
    Summary {
        /// Current market price per gram
        #[arg(short, long)]
        price: Option<f64>,
        /// Yearly opportunity cost as a fraction (0.10 = 10%)
        #[arg(short, long)]
        rate: Option<f64>,
        /// Row order of the table
        #[arg(short, long, value_enum, default_value_t = SortOrder::Insertion)]
        sort: SortOrder,
    },
    /// Write all purchases as Date,Grams,Cost CSV
    Export {
        /// Output file, stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Append purchases from a Date,Grams,Cost CSV file
    Import { input: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => aurum::cli::setup::setup(),
        Some(cmd) => {
            aurum::run_command(cmd.into(), cli.config_path.as_deref(), cli.pin.as_deref()).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
