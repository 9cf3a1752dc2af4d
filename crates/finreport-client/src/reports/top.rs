use serde::Serialize;
use tracing::error;

use crate::records::{Column, TransactionRecord};
use crate::reports::date::{format_display_date, parse_operation_date};
use crate::reports::policy::TOP_TRANSACTIONS_LIMIT;
use crate::reports::{EmptyReason, Outcome, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountBasis {
    /// Absolute operation amount, as shown on the home page.
    AbsoluteOperation,
    SignedPayment,
}

impl AmountBasis {
    const fn column(self) -> Column {
        match self {
            Self::AbsoluteOperation => Column::OperationAmount,
            Self::SignedPayment => Column::PaymentAmount,
        }
    }

    fn amount(self, record: &TransactionRecord) -> Option<f64> {
        match self {
            Self::AbsoluteOperation => record.operation_amount().map(f64::abs),
            Self::SignedPayment => record.payment_amount(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopTransaction {
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
}

/// Stable descending selection: equal keys keep their input order.
pub fn select_top<T>(mut items: Vec<T>, limit: usize, key: impl Fn(&T) -> f64) -> Vec<T> {
    items.sort_by(|left, right| key(right).total_cmp(&key(left)));
    items.truncate(limit);
    items
}

pub fn top_transactions(
    selection: &Selection<'_>,
    basis: AmountBasis,
) -> Outcome<Vec<TopTransaction>> {
    let column = basis.column();
    if !selection.has_column(column) {
        error!(column = column.header(), "top transactions need an amount column");
        return Outcome::Empty(EmptyReason::MissingColumn { column });
    }

    let candidates = selection
        .records
        .iter()
        .filter_map(|record| basis.amount(record).map(|amount| (*record, amount)))
        .collect::<Vec<(&TransactionRecord, f64)>>();
    if candidates.is_empty() {
        if selection.is_empty() {
            return Outcome::Empty(EmptyReason::NoActivityInPeriod);
        }
        error!(
            records = selection.len(),
            "no operation carried a numeric amount"
        );
        return Outcome::Empty(EmptyReason::NoNumericAmounts);
    }

    let ranked = select_top(candidates, TOP_TRANSACTIONS_LIMIT, |(_, amount)| *amount);
    Outcome::Found(
        ranked
            .into_iter()
            .map(|(record, amount)| TopTransaction {
                date: display_date(record),
                amount,
                category: record.category_label().to_string(),
                description: record.description_label().to_string(),
            })
            .collect(),
    )
}

fn display_date(record: &TransactionRecord) -> String {
    let raw = record.operation_date.as_deref().unwrap_or("");
    match parse_operation_date(raw) {
        Some(instant) => format_display_date(&instant),
        None => raw.to_string(),
    }
}
