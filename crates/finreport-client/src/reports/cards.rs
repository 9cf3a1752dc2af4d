use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, error};

use crate::records::Column;
use crate::reports::{EmptyReason, Outcome, Selection};
use crate::reports::policy::{AMOUNT_DECIMALS, CARD_CASHBACK_RATE, round_to};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSummary {
    pub last_digits: String,
    pub total_spent: f64,
    pub cashback: f64,
}

/// Groups by the last four card characters in first-seen order.
///
/// Cards that share trailing digits collapse into one entry.
pub fn summarize_cards(selection: &Selection<'_>) -> Outcome<Vec<CardSummary>> {
    if !selection.has_column(Column::CardNumber) {
        error!(
            column = Column::CardNumber.header(),
            "card summary cannot run without column"
        );
        return Outcome::Empty(EmptyReason::MissingColumn {
            column: Column::CardNumber,
        });
    }

    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();

    for record in &selection.records {
        let Some(last_digits) = record.card_last_digits() else {
            debug!(row = record.row, "skipping operation without card number");
            continue;
        };
        let Some(amount) = record.operation_amount() else {
            debug!(row = record.row, "skipping operation without numeric amount");
            continue;
        };

        let total = totals.entry(last_digits.clone()).or_insert_with(|| {
            order.push(last_digits.clone());
            0.0
        });
        *total += amount.abs();
    }

    let cards = order
        .into_iter()
        .map(|last_digits| {
            let spent = totals.get(&last_digits).copied().unwrap_or(0.0);
            let total_spent = round_to(spent, AMOUNT_DECIMALS);
            CardSummary {
                cashback: round_to(total_spent * CARD_CASHBACK_RATE, AMOUNT_DECIMALS),
                last_digits,
                total_spent,
            }
        })
        .collect();
    Outcome::Found(cards)
}
