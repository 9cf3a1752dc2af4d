use serde::Serialize;

use crate::quotes::{CurrencyRate, StockPrice};
use crate::reports::{CardSummary, CashbackRanking, CategorySpendRow, EmptyReason, TopTransaction};

#[derive(Debug, Clone, Serialize)]
pub struct ReportPeriod {
    pub start: String,
    pub end: String,
}

/// A report section that found nothing, with the reason and a readable message.
#[derive(Debug, Clone, Serialize)]
pub struct ReportNotice {
    pub section: String,
    #[serde(flatten)]
    pub reason: EmptyReason,
    pub message: String,
}

impl ReportNotice {
    pub fn new(section: &str, reason: EmptyReason) -> Self {
        Self {
            section: section.to_string(),
            message: reason.notice(),
            reason,
        }
    }
}

/// The composite home page mapping, in its serialized key order.
#[derive(Debug, Clone, Serialize)]
pub struct HomePageReport {
    pub greeting: String,
    pub cards: Vec<CardSummary>,
    pub top_transactions: Vec<TopTransaction>,
    pub currency_rates: Vec<CurrencyRate>,
    pub stock_prices: Vec<StockPrice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeData {
    pub reference: String,
    pub period: ReportPeriod,
    pub report: HomePageReport,
    pub notices: Vec<ReportNotice>,
    pub saved_to: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpendingData {
    pub category: String,
    pub reference: String,
    pub period: ReportPeriod,
    pub report: Vec<CategorySpendRow>,
    pub notice: Option<ReportNotice>,
    pub saved_to: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CashbackData {
    pub year: i32,
    pub month: u32,
    /// `None` when no category earned cashback.
    pub report: Option<CashbackRanking>,
    pub notice: Option<ReportNotice>,
    pub saved_to: Option<String>,
}
