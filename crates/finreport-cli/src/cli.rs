use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const HOME_AFTER_HELP: &str = "\
What the home page shows:
  greeting          Chosen from the current clock hour.
  cards             Completed debits from the first day of the month up to --date,
                    grouped by the last four card digits, with 1% cashback.
  top_transactions  The five largest completed debits in the same period.
  currency_rates    Rouble prices for `user_currencies` in user_settings.json.
  stock_prices      Prices for `user_stocks` in user_settings.json.

Quotes need API_KEY (openexchangerates.org) and API_KEY_STOCK (Alpha Vantage).
Pass --offline to skip them.
";

#[derive(Debug, Parser)]
#[command(
    name = "finreport",
    version,
    about = "personal finance reports from bank exports",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Data directory (defaults to FINREPORT_HOME, then ~/.finreport)
    #[arg(long, global = true, value_name = "PATH")]
    pub home: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every report command.
#[derive(Debug, Clone, Default, Args)]
pub struct ReportArgs {
    /// Transactions file (.xlsx, .xls, .ods, .csv or .json)
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// Print the report payload as JSON
    #[arg(long)]
    pub json: bool,
    /// Save the report as a timestamped JSON file under <home>/reports
    #[arg(long)]
    pub save: bool,
    /// Save the report to this JSON file
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Month-to-date card summary, top operations and market quotes
    #[command(after_help = HOME_AFTER_HELP)]
    Home {
        /// Reference moment, YYYY-MM-DD HH:MM:SS
        #[arg(long, value_name = "YYYY-MM-DD HH:MM:SS")]
        date: String,
        /// Skip currency and stock lookups
        #[arg(long)]
        offline: bool,
        #[command(flatten)]
        report: ReportArgs,
    },
    /// Completed debits in one category over the last 90 days
    Spending {
        /// Category name, matched case-insensitively
        category: String,
        /// End of the window, YYYY-MM-DD HH:MM:SS (defaults to now)
        #[arg(long, value_name = "YYYY-MM-DD HH:MM:SS")]
        date: Option<String>,
        #[command(flatten)]
        report: ReportArgs,
    },
    /// Cashback earned per category in one calendar month
    Cashback {
        #[arg(long)]
        year: i32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        #[command(flatten)]
        report: ReportArgs,
    },
}

impl Commands {
    pub fn report_args(&self) -> &ReportArgs {
        match self {
            Self::Home { report, .. }
            | Self::Spending { report, .. }
            | Self::Cashback { report, .. } => report,
        }
    }
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
