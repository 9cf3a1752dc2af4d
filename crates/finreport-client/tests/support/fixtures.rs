use std::fs;
use std::path::{Path, PathBuf};

use finreport_client::quotes::{CurrencyRate, QuoteProvider, StockPrice};
use finreport_client::{ConfigOverrides, ReportConfig, SuccessEnvelope};
use serde_json::{Map, Value, json};
use tempfile::{Builder, TempDir};

pub fn temp_home(prefix: &str) -> std::io::Result<(TempDir, PathBuf)> {
    let dir = Builder::new().prefix(prefix).tempdir()?;
    let home = dir.path().join("finreport-home");
    fs::create_dir_all(&home)?;
    Ok((dir, home))
}

pub fn write_json_rows(dir: &Path, name: &str, rows: &[Value]) -> std::io::Result<PathBuf> {
    let path = dir.join(name);
    let content = serde_json::to_string_pretty(rows).map_err(std::io::Error::other)?;
    fs::write(&path, content)?;
    Ok(path)
}

pub fn write_text(dir: &Path, name: &str, content: &str) -> std::io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content)?;
    Ok(path)
}

/// Configuration isolated from the process environment.
pub fn config_for(home: &Path, transactions: &Path) -> Option<ReportConfig> {
    let resolved = ReportConfig::resolve_with(
        ConfigOverrides {
            home: Some(home.to_path_buf()),
            transactions: Some(transactions.to_path_buf()),
        },
        &|_| None,
    );
    assert!(resolved.is_ok());
    resolved.ok()
}

pub struct Operation<'a> {
    pub date: &'a str,
    pub card: Option<&'a str>,
    pub status: &'a str,
    pub amount: f64,
    pub category: &'a str,
    pub description: &'a str,
    pub cashback: Value,
}

impl Default for Operation<'_> {
    fn default() -> Self {
        Self {
            date: "31.12.2021 16:44:00",
            card: Some("*7197"),
            status: "OK",
            amount: -100.0,
            category: "Супермаркеты",
            description: "Колхоз",
            cashback: Value::Null,
        }
    }
}

/// One bank export row keyed by the export's header names.
pub fn operation(op: Operation<'_>) -> Value {
    let mut row = Map::new();
    row.insert("Дата операции".to_string(), json!(op.date));
    row.insert("Дата платежа".to_string(), json!(op.date.get(..10).unwrap_or(op.date)));
    row.insert(
        "Номер карты".to_string(),
        op.card.map_or(Value::Null, |card| json!(card)),
    );
    row.insert("Статус".to_string(), json!(op.status));
    row.insert("Сумма операции".to_string(), json!(op.amount));
    row.insert("Валюта операции".to_string(), json!("RUB"));
    row.insert("Сумма платежа".to_string(), json!(op.amount));
    row.insert("Валюта платежа".to_string(), json!("RUB"));
    row.insert("Кэшбэк".to_string(), op.cashback);
    row.insert("Категория".to_string(), json!(op.category));
    row.insert("MCC".to_string(), json!(5411));
    row.insert("Описание".to_string(), json!(op.description));
    Value::Object(row)
}

pub fn envelope_value(success: &SuccessEnvelope) -> Value {
    let payload = serde_json::to_value(success);
    assert!(payload.is_ok());
    payload.unwrap_or(Value::Null)
}

/// Fixed quotes so home page tests never touch the network.
pub struct StaticQuotes;

impl QuoteProvider for StaticQuotes {
    fn currency_rates(&self, symbols: &[String]) -> Vec<CurrencyRate> {
        symbols
            .iter()
            .filter(|symbol| symbol.as_str() == "USD")
            .map(|symbol| CurrencyRate {
                currency: symbol.clone(),
                rate: 73.21,
            })
            .collect()
    }

    fn stock_prices(&self, symbols: &[String]) -> Vec<StockPrice> {
        symbols
            .iter()
            .map(|symbol| StockPrice {
                stock: symbol.clone(),
                price: 150.12,
            })
            .collect()
    }
}
