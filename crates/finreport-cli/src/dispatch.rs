use finreport_client::commands::cashback::{self, CashbackRunOptions};
use finreport_client::commands::home::{self, HomeRunOptions};
use finreport_client::commands::spending::{self, SpendingRunOptions};
use finreport_client::commands::SaveTarget;
use finreport_client::{ClientResult, ReportConfig, SuccessEnvelope};

use crate::cli::{Commands, ReportArgs};

pub fn dispatch(command: &Commands, config: &ReportConfig) -> ClientResult<SuccessEnvelope> {
    match command {
        Commands::Home {
            date,
            offline,
            report,
        } => home::run_with_options(
            config,
            HomeRunOptions {
                reference: date.clone(),
                offline: *offline,
                save: save_target(report),
                ..HomeRunOptions::default()
            },
        ),
        Commands::Spending {
            category,
            date,
            report,
        } => spending::run_with_options(
            config,
            SpendingRunOptions {
                category: category.clone(),
                reference: date.clone(),
                save: save_target(report),
                ..SpendingRunOptions::default()
            },
        ),
        Commands::Cashback {
            year,
            month,
            report,
        } => cashback::run_with_options(
            config,
            CashbackRunOptions {
                year: *year,
                month: *month,
                save: save_target(report),
            },
        ),
    }
}

fn save_target(report: &ReportArgs) -> SaveTarget {
    SaveTarget::from_flags(report.save, report.output.clone())
}
