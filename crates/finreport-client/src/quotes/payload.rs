use serde_json::Value;

use crate::quotes::{CurrencyRate, StockPrice};
use crate::reports::policy::{AMOUNT_DECIMALS, round_to};

const BASE_CURRENCY: &str = "USD";
const TARGET_CURRENCY: &str = "RUB";

/// Converts a USD-based rates payload into rouble prices for `symbols`.
///
/// USD is listed first when requested; unknown symbols are skipped.
pub fn currency_rates_from_payload(payload: &Value, symbols: &[String]) -> Vec<CurrencyRate> {
    let rates = &payload["rates"];
    let Some(roubles_per_base) = rates[TARGET_CURRENCY].as_f64() else {
        return Vec::new();
    };

    let mut ordered = symbols
        .iter()
        .filter(|symbol| symbol.as_str() == BASE_CURRENCY)
        .chain(symbols.iter().filter(|symbol| symbol.as_str() != BASE_CURRENCY))
        .collect::<Vec<&String>>();
    ordered.dedup();

    ordered
        .into_iter()
        .filter_map(|symbol| {
            let rate = if symbol == BASE_CURRENCY {
                roubles_per_base
            } else {
                let per_base = rates[symbol.as_str()].as_f64().filter(|value| *value > 0.0)?;
                roubles_per_base / per_base
            };
            Some(CurrencyRate {
                currency: symbol.clone(),
                rate: round_to(rate, AMOUNT_DECIMALS),
            })
        })
        .collect()
}

/// Reads `05. price` from a GLOBAL_QUOTE payload.
pub fn stock_price_from_payload(payload: &Value, symbol: &str) -> Option<StockPrice> {
    let quote = payload.get("Global Quote")?;
    let price = match quote.get("05. price")? {
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        Value::Number(number) => number.as_f64()?,
        _ => return None,
    };
    Some(StockPrice {
        stock: symbol.to_string(),
        price: round_to(price, AMOUNT_DECIMALS),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{currency_rates_from_payload, stock_price_from_payload};

    fn symbols(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn currency_rates_convert_to_roubles_with_usd_first() {
        let payload = json!({
            "base": "USD",
            "rates": {"RUB": 73.2146, "EUR": 0.8812, "GBP": 0.74}
        });
        let rates = currency_rates_from_payload(&payload, &symbols(&["EUR", "XYZ", "USD"]));
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].currency, "USD");
        assert_eq!(rates[0].rate, 73.21);
        assert_eq!(rates[1].currency, "EUR");
        assert_eq!(rates[1].rate, 83.09);
    }

    #[test]
    fn currency_rates_need_a_rouble_rate() {
        let payload = json!({"rates": {"EUR": 0.88}});
        assert!(currency_rates_from_payload(&payload, &symbols(&["USD"])).is_empty());
        assert!(currency_rates_from_payload(&json!({"error": true}), &symbols(&["USD"])).is_empty());
    }

    #[test]
    fn stock_price_reads_global_quote() {
        let payload = json!({"Global Quote": {"01. symbol": "AAPL", "05. price": "150.1234"}});
        let price = stock_price_from_payload(&payload, "AAPL");
        assert!(price.is_some());
        if let Some(value) = price {
            assert_eq!(value.stock, "AAPL");
            assert_eq!(value.price, 150.12);
        }

        assert!(stock_price_from_payload(&json!({"Global Quote": {}}), "AAPL").is_none());
        assert!(stock_price_from_payload(&json!({"Note": "rate limited"}), "AAPL").is_none());
    }
}
