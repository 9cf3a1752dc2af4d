/// Entries returned by the top-transactions selector.
pub const TOP_TRANSACTIONS_LIMIT: usize = 5;

/// Length of the trailing window used by the category spend report.
pub const CATEGORY_WINDOW_DAYS: i64 = 90;

/// Flat card cashback rate applied to total spend.
pub const CARD_CASHBACK_RATE: f64 = 0.01;

/// Status value marking a completed operation in the bank export.
pub const COMPLETED_STATUS: &str = "OK";

/// Category label for cashback rows without a category.
pub const UNKNOWN_CATEGORY: &str = "Неизвестная категория";

pub const AMOUNT_DECIMALS: u32 = 2;

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let exponent = i32::try_from(decimals).unwrap_or(2);
    let factor = 10_f64.powi(exponent);
    (value * factor).round() / factor
}
