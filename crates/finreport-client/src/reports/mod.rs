pub mod cards;
pub mod cashback;
pub mod category;
pub mod date;
pub mod policy;
pub mod top;
pub mod window;

use serde::Serialize;

use crate::records::Column;

pub use cards::{CardSummary, summarize_cards};
pub use cashback::{CashbackRanking, rank_cashback_categories};
pub use category::{CategorySpendRow, spending_by_category};
pub use date::DateWindow;
pub use top::{AmountBasis, TopTransaction, select_top, top_transactions};
pub use window::{Selection, WindowMode, filter_window};

/// Why a report legitimately found nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum EmptyReason {
    NoActivityInPeriod,
    NoMatchForCategory { category: String },
    NoPositiveCashback,
    MissingColumn { column: Column },
    NoNumericAmounts,
}

impl EmptyReason {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoActivityInPeriod => "no_activity_in_period",
            Self::NoMatchForCategory { .. } => "no_match_for_category",
            Self::NoPositiveCashback => "no_positive_cashback",
            Self::MissingColumn { .. } => "missing_column",
            Self::NoNumericAmounts => "no_numeric_amounts",
        }
    }

    pub fn notice(&self) -> String {
        match self {
            Self::NoActivityInPeriod => "No completed operations in the requested period.".to_string(),
            Self::NoMatchForCategory { category } => {
                format!("No operations in category `{category}` during the requested period.")
            }
            Self::NoPositiveCashback => "No cashback was earned in the requested month.".to_string(),
            Self::MissingColumn { column } => format!(
                "The transactions file has no `{}` column.",
                column.header()
            ),
            Self::NoNumericAmounts => "No operation carried a numeric amount.".to_string(),
        }
    }
}

/// Result of a report computation that may legitimately find nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Found(T),
    Empty(EmptyReason),
}

impl<T> Outcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Empty(_) => None,
        }
    }

    pub fn empty_reason(&self) -> Option<&EmptyReason> {
        match self {
            Self::Found(_) => None,
            Self::Empty(reason) => Some(reason),
        }
    }

    pub fn map<U>(self, transform: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Found(value) => Outcome::Found(transform(value)),
            Self::Empty(reason) => Outcome::Empty(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{EmptyReason, Outcome};
    use crate::records::Column;

    #[test]
    fn empty_reasons_serialize_with_tag() {
        let reason = EmptyReason::NoMatchForCategory {
            category: "Супермаркеты".to_string(),
        };
        let value = serde_json::to_value(&reason);
        assert!(value.is_ok());
        if let Ok(payload) = value {
            assert_eq!(
                payload,
                json!({"reason": "no_match_for_category", "category": "Супермаркеты"})
            );
        }

        let missing = serde_json::to_value(EmptyReason::MissingColumn {
            column: Column::Cashback,
        });
        assert!(missing.is_ok());
        if let Ok(payload) = missing {
            assert_eq!(payload["column"], "cashback");
        }
    }

    #[test]
    fn outcome_helpers_branch_on_tag() {
        let found: Outcome<u8> = Outcome::Found(3);
        assert!(found.is_found());
        assert_eq!(found.clone().map(|value| value * 2).found(), Some(6));

        let empty: Outcome<u8> = Outcome::Empty(EmptyReason::NoActivityInPeriod);
        assert_eq!(empty.empty_reason().map(EmptyReason::code), Some("no_activity_in_period"));
        assert_eq!(empty.found(), None);
    }
}
