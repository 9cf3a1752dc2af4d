use chrono::NaiveDateTime;

use crate::ClientResult;
use crate::commands::common::{SaveTarget, load_transactions, now_or, period_of, save_report};
use crate::config::ReportConfig;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{ReportNotice, SpendingData};
use crate::reports::date::{format_reference, parse_reference_datetime};
use crate::reports::policy::CATEGORY_WINDOW_DAYS;
use crate::reports::{DateWindow, Outcome, spending_by_category};

const COMMAND: &str = "spending";

#[derive(Debug, Default)]
pub struct SpendingRunOptions {
    pub category: String,
    /// `YYYY-MM-DD HH:MM:SS`; the current time when absent.
    pub reference: Option<String>,
    pub save: SaveTarget,
    pub now: Option<NaiveDateTime>,
}

pub fn run(
    config: &ReportConfig,
    category: &str,
    reference: Option<&str>,
) -> ClientResult<SuccessEnvelope> {
    run_with_options(
        config,
        SpendingRunOptions {
            category: category.to_string(),
            reference: reference.map(ToString::to_string),
            ..SpendingRunOptions::default()
        },
    )
}

#[doc(hidden)]
pub fn run_with_options(
    config: &ReportConfig,
    options: SpendingRunOptions,
) -> ClientResult<SuccessEnvelope> {
    let reference = match options.reference.as_deref() {
        Some(raw) => parse_reference_datetime(raw)?,
        None => now_or(options.now),
    };
    let records = load_transactions(config)?;

    let (rows, notice) = match spending_by_category(&records, &options.category, reference) {
        Outcome::Found(rows) => (rows, None),
        Outcome::Empty(reason) => (Vec::new(), Some(ReportNotice::new("spending", reason))),
    };
    let saved_to = save_report(config, "spending_by_category", &options.save, &rows)?;

    success(
        COMMAND,
        SpendingData {
            category: options.category,
            reference: format_reference(&reference),
            period: period_of(&DateWindow::trailing_days(reference, CATEGORY_WINDOW_DAYS)),
            report: rows,
            notice,
            saved_to,
        },
    )
}
