use std::time::Duration;

use serde_json::Value;
use tracing::{error, warn};

use crate::config::ReportConfig;
use crate::quotes::payload::{currency_rates_from_payload, stock_price_from_payload};
use crate::quotes::{CurrencyRate, QuoteProvider, StockPrice};
use crate::{ClientError, ClientResult};

const RATES_URL: &str = "https://openexchangerates.org/api/latest.json";
const STOCKS_URL: &str = "https://www.alphavantage.co/query";
const REQUEST_TIMEOUT_SECS: u64 = 15;

pub struct HttpQuoteProvider {
    http: reqwest::blocking::Client,
    currency_key: Option<String>,
    stock_key: Option<String>,
}

impl HttpQuoteProvider {
    pub fn new(currency_key: Option<String>, stock_key: Option<String>) -> ClientResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("finreport/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| {
                ClientError::new(
                    "quote_client_unavailable",
                    &format!("Could not build HTTP client: {error}"),
                    vec!["Rerun with `--offline` to skip market quotes.".to_string()],
                )
            })?;
        Ok(Self {
            http,
            currency_key,
            stock_key,
        })
    }

    pub fn from_config(config: &ReportConfig) -> ClientResult<Self> {
        Self::new(
            config.currency_api_key.clone(),
            config.stock_api_key.clone(),
        )
    }

    fn fetch_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, String> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .map_err(|error| error.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }
        response
            .json::<Value>()
            .map_err(|error| format!("invalid JSON response: {error}"))
    }
}

impl QuoteProvider for HttpQuoteProvider {
    fn currency_rates(&self, symbols: &[String]) -> Vec<CurrencyRate> {
        if symbols.is_empty() {
            return Vec::new();
        }
        let Some(key) = self.currency_key.as_deref() else {
            warn!("API_KEY is not set; skipping currency rates");
            return Vec::new();
        };

        match self.fetch_json(RATES_URL, &[("app_id", key), ("base", "USD")]) {
            Ok(payload) => currency_rates_from_payload(&payload, symbols),
            Err(detail) => {
                error!(detail = %detail, "currency rates request failed");
                Vec::new()
            }
        }
    }

    fn stock_prices(&self, symbols: &[String]) -> Vec<StockPrice> {
        if symbols.is_empty() {
            return Vec::new();
        }
        let Some(key) = self.stock_key.as_deref() else {
            warn!("API_KEY_STOCK is not set; skipping stock prices");
            return Vec::new();
        };

        let mut prices = Vec::new();
        for symbol in symbols {
            let query = [
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol.as_str()),
                ("apikey", key),
            ];
            match self.fetch_json(STOCKS_URL, &query) {
                Ok(payload) => match stock_price_from_payload(&payload, symbol) {
                    Some(price) => prices.push(price),
                    None => warn!(symbol = %symbol, "no quote in stock price response"),
                },
                Err(detail) => error!(symbol = %symbol, detail = %detail, "stock price request failed"),
            }
        }
        prices
    }
}
