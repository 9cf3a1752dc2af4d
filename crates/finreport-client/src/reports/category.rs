use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{error, info};

use crate::records::{Column, RecordSet};
use crate::reports::date::{DateWindow, format_display_date, parse_operation_date};
use crate::reports::policy::CATEGORY_WINDOW_DAYS;
use crate::reports::{EmptyReason, Outcome, WindowMode, filter_window};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpendRow {
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
}

/// Completed debits in `category` over the trailing window ending at `reference`.
///
/// Categories are compared after upper-casing both sides; there is no
/// substring matching.
pub fn spending_by_category(
    set: &RecordSet,
    category: &str,
    reference: NaiveDateTime,
) -> Outcome<Vec<CategorySpendRow>> {
    let window = DateWindow::trailing_days(reference, CATEGORY_WINDOW_DAYS);
    let selection = match filter_window(set, window, WindowMode::CompletedDebits) {
        Outcome::Found(selection) => selection,
        Outcome::Empty(reason) => return Outcome::Empty(reason),
    };
    if !selection.has_column(Column::Category) {
        error!(
            column = Column::Category.header(),
            "category spending cannot run without column"
        );
        return Outcome::Empty(EmptyReason::MissingColumn {
            column: Column::Category,
        });
    }

    let wanted = category.to_uppercase();
    let rows = selection
        .records
        .iter()
        .filter(|record| record.category_label().to_uppercase() == wanted)
        .filter_map(|record| {
            let instant = record.operation_date.as_deref().and_then(parse_operation_date)?;
            let amount = record.operation_amount()?;
            Some(CategorySpendRow {
                date: format_display_date(&instant),
                amount,
                category: record.category_label().to_string(),
                description: record.description_label().to_string(),
            })
        })
        .collect::<Vec<CategorySpendRow>>();

    if rows.is_empty() {
        info!(
            category = %category,
            debits = selection.len(),
            "no operations for category in window"
        );
        return Outcome::Empty(EmptyReason::NoMatchForCategory {
            category: category.to_string(),
        });
    }

    Outcome::Found(rows)
}
