use chrono::NaiveDateTime;
use tracing::info;

use crate::ClientResult;
use crate::commands::common::{SaveTarget, load_transactions, now_or, period_of, save_report};
use crate::config::{ReportConfig, UserSettings};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{HomeData, HomePageReport, ReportNotice};
use crate::greeting::greeting_at;
use crate::quotes::{HttpQuoteProvider, OfflineQuotes, QuoteProvider};
use crate::records::RecordSet;
use crate::reports::date::{format_reference, parse_reference_datetime};
use crate::reports::{
    AmountBasis, CardSummary, DateWindow, Outcome, Selection, TopTransaction, WindowMode,
    filter_window, summarize_cards, top_transactions,
};

const COMMAND: &str = "home";

#[derive(Default)]
pub struct HomeRunOptions<'a> {
    /// `YYYY-MM-DD HH:MM:SS`
    pub reference: String,
    pub offline: bool,
    pub save: SaveTarget,
    /// Clock used for the greeting; the local time when absent.
    pub now: Option<NaiveDateTime>,
    pub quotes: Option<&'a dyn QuoteProvider>,
}

pub fn run(config: &ReportConfig, reference: &str) -> ClientResult<SuccessEnvelope> {
    run_with_options(
        config,
        HomeRunOptions {
            reference: reference.to_string(),
            ..HomeRunOptions::default()
        },
    )
}

#[doc(hidden)]
pub fn run_with_options(
    config: &ReportConfig,
    options: HomeRunOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let reference = parse_reference_datetime(&options.reference)?;
    let records = load_transactions(config)?;

    let http_quotes;
    let quotes: &dyn QuoteProvider = match options.quotes {
        Some(provider) => provider,
        None if options.offline => &OfflineQuotes,
        None => {
            http_quotes = HttpQuoteProvider::from_config(config)?;
            &http_quotes
        }
    };

    let greeting = greeting_at(&now_or(options.now));
    let (report, notices) = build_home_page(&records, reference, greeting, &config.settings, quotes);
    let saved_to = save_report(config, "home_page", &options.save, &report)?;

    success(
        COMMAND,
        HomeData {
            reference: format_reference(&reference),
            period: period_of(&DateWindow::month_to_date(reference)),
            report,
            notices,
            saved_to,
        },
    )
}

/// Assembles the month-to-date home page for `reference`.
pub fn build_home_page(
    records: &RecordSet,
    reference: NaiveDateTime,
    greeting: &str,
    settings: &UserSettings,
    quotes: &dyn QuoteProvider,
) -> (HomePageReport, Vec<ReportNotice>) {
    let mut notices = Vec::new();
    let window = DateWindow::month_to_date(reference);

    let (cards, top) = match filter_window(records, window, WindowMode::CompletedDebits) {
        Outcome::Found(selection) => {
            let cards = card_summaries(&selection, &mut notices);
            let top = ranked_transactions(&selection, &mut notices);
            (cards, top)
        }
        Outcome::Empty(reason) => {
            info!(reason = reason.code(), "home page has no card activity");
            notices.push(ReportNotice::new("cards", reason.clone()));
            notices.push(ReportNotice::new("top_transactions", reason));
            (Vec::new(), Vec::new())
        }
    };

    let report = HomePageReport {
        greeting: greeting.to_string(),
        cards,
        top_transactions: top,
        currency_rates: quotes.currency_rates(&settings.user_currencies),
        stock_prices: quotes.stock_prices(&settings.user_stocks),
    };
    (report, notices)
}

fn card_summaries(
    selection: &Selection<'_>,
    notices: &mut Vec<ReportNotice>,
) -> Vec<CardSummary> {
    match summarize_cards(selection) {
        Outcome::Found(cards) => cards,
        Outcome::Empty(reason) => {
            notices.push(ReportNotice::new("cards", reason));
            Vec::new()
        }
    }
}

fn ranked_transactions(
    selection: &Selection<'_>,
    notices: &mut Vec<ReportNotice>,
) -> Vec<TopTransaction> {
    match top_transactions(selection, AmountBasis::AbsoluteOperation) {
        Outcome::Found(top) => top,
        Outcome::Empty(reason) => {
            notices.push(ReportNotice::new("top_transactions", reason));
            Vec::new()
        }
    }
}
