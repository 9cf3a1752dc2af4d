use crate::{ClientError, ClientResult};
use crate::commands::common::{SaveTarget, load_transactions, save_report};
use crate::config::ReportConfig;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{CashbackData, ReportNotice};
use crate::reports::{Outcome, rank_cashback_categories};

const COMMAND: &str = "cashback";

#[derive(Debug, Default)]
pub struct CashbackRunOptions {
    pub year: i32,
    pub month: u32,
    pub save: SaveTarget,
}

pub fn run(config: &ReportConfig, year: i32, month: u32) -> ClientResult<SuccessEnvelope> {
    run_with_options(
        config,
        CashbackRunOptions {
            year,
            month,
            save: SaveTarget::Skip,
        },
    )
}

#[doc(hidden)]
pub fn run_with_options(
    config: &ReportConfig,
    options: CashbackRunOptions,
) -> ClientResult<SuccessEnvelope> {
    if !(1..=12).contains(&options.month) {
        return Err(ClientError::invalid_argument_for_command(
            &format!("Month must be between 1 and 12, got {}.", options.month),
            Some(COMMAND),
        ));
    }
    let records = load_transactions(config)?;

    let (ranking, notice) = match rank_cashback_categories(&records, options.year, options.month)? {
        Outcome::Found(ranking) => (Some(ranking), None),
        Outcome::Empty(reason) => (None, Some(ReportNotice::new("cashback", reason))),
    };
    let saved_to = save_report(config, "cashback_categories", &options.save, &ranking)?;

    success(
        COMMAND,
        CashbackData {
            year: options.year,
            month: options.month,
            report: ranking,
            notice,
            saved_to,
        },
    )
}
