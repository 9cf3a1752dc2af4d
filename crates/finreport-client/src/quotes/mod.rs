mod http;
pub mod payload;

use serde::Serialize;

pub use http::HttpQuoteProvider;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyRate {
    pub currency: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockPrice {
    pub stock: String,
    pub price: f64,
}

/// Source of market quotes for the home page.
///
/// Lookups never fail the report: a provider that cannot answer returns
/// fewer entries and logs why.
pub trait QuoteProvider {
    fn currency_rates(&self, symbols: &[String]) -> Vec<CurrencyRate>;
    fn stock_prices(&self, symbols: &[String]) -> Vec<StockPrice>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineQuotes;

impl QuoteProvider for OfflineQuotes {
    fn currency_rates(&self, _symbols: &[String]) -> Vec<CurrencyRate> {
        Vec::new()
    }

    fn stock_prices(&self, _symbols: &[String]) -> Vec<StockPrice> {
        Vec::new()
    }
}
