use std::io;

use serde_json::Value;

use super::format::{self, Column};

pub fn render_home(data: &Value) -> io::Result<String> {
    let report = data
        .get("report")
        .filter(|value| value.is_object())
        .ok_or_else(|| io::Error::other("home output requires a report"))?;

    let greeting = report
        .get("greeting")
        .and_then(Value::as_str)
        .unwrap_or("Здравствуйте");
    let mut lines = vec![format!("{greeting}!")];
    lines.push(period_line(data));

    lines.push(String::new());
    lines.push("Cards:".to_string());
    let cards = array_at(report, "cards");
    if cards.is_empty() {
        lines.push("  No card spending in this period.".to_string());
    } else {
        let columns = [
            Column::left("Card"),
            Column::right("Spent"),
            Column::right("Cashback"),
        ];
        let rows = cards
            .iter()
            .map(|card| {
                vec![
                    format!("*{}", text_at(card, "last_digits")),
                    amount_at(card, "total_spent"),
                    amount_at(card, "cashback"),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(format::render_table_or_blocks(
            &columns,
            &rows,
            format::terminal_width(),
            "Card",
        ));
    }

    lines.push(String::new());
    lines.push("Top operations:".to_string());
    let top = array_at(report, "top_transactions");
    if top.is_empty() {
        lines.push("  No operations in this period.".to_string());
    } else {
        lines.extend(operation_table(top, "Operation"));
    }

    let rates = array_at(report, "currency_rates");
    if !rates.is_empty() {
        lines.push(String::new());
        lines.push("Currency rates (RUB):".to_string());
        let entries = rates
            .iter()
            .map(|rate| (text_at(rate, "currency"), amount_at(rate, "rate")))
            .collect::<Vec<(&str, String)>>();
        lines.extend(format::key_value_rows(&entries, 2));
    }

    let stocks = array_at(report, "stock_prices");
    if !stocks.is_empty() {
        lines.push(String::new());
        lines.push("Stock prices (USD):".to_string());
        let entries = stocks
            .iter()
            .map(|stock| (text_at(stock, "stock"), amount_at(stock, "price")))
            .collect::<Vec<(&str, String)>>();
        lines.extend(format::key_value_rows(&entries, 2));
    }

    let notices = array_at(data, "notices");
    if !notices.is_empty() {
        lines.push(String::new());
        lines.push("Notes:".to_string());
        for notice in notices {
            lines.push(format!("  - {}", text_at(notice, "message")));
        }
    }

    push_saved_to(&mut lines, data);
    Ok(lines.join("\n"))
}

pub fn render_spending(data: &Value) -> io::Result<String> {
    let rows = data
        .get("report")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("spending output requires report rows"))?;
    let category = data.get("category").and_then(Value::as_str).unwrap_or("");

    let mut lines = vec![format!("Spending in {category}"), period_line(data)];
    lines.push(String::new());

    if rows.is_empty() {
        lines.push(notice_message(data, "No matching operations."));
    } else {
        let total = rows
            .iter()
            .filter_map(|row| row.get("amount").and_then(Value::as_f64))
            .sum::<f64>();
        lines.extend(operation_table(rows, "Operation"));
        lines.push(String::new());
        lines.extend(format::key_value_rows(
            &[
                ("Operations:", rows.len().to_string()),
                ("Total:", format::format_amount(total)),
            ],
            2,
        ));
    }

    push_saved_to(&mut lines, data);
    Ok(lines.join("\n"))
}

pub fn render_cashback(data: &Value) -> io::Result<String> {
    let year = data.get("year").and_then(Value::as_i64).unwrap_or_default();
    let month = data.get("month").and_then(Value::as_u64).unwrap_or_default();
    let mut lines = vec![format!("Cashback for {month:02}.{year}"), String::new()];

    match data.get("report").and_then(Value::as_object) {
        Some(ranking) if !ranking.is_empty() => {
            let columns = [Column::left("Category"), Column::right("Cashback")];
            let rows = ranking
                .iter()
                .map(|(category, amount)| vec![category.clone(), amount.to_string()])
                .collect::<Vec<Vec<String>>>();
            lines.extend(format::render_table_or_blocks(
                &columns,
                &rows,
                format::terminal_width(),
                "Category",
            ));
        }
        _ => lines.push(notice_message(data, "No cashback was earned in this month.")),
    }

    push_saved_to(&mut lines, data);
    Ok(lines.join("\n"))
}

fn operation_table(rows: &[Value], block_label: &str) -> Vec<String> {
    let columns = [
        Column::left("Date"),
        Column::right("Amount"),
        Column::left("Category"),
        Column::left("Description"),
    ];
    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                text_at(row, "date").to_string(),
                amount_at(row, "amount"),
                text_at(row, "category").to_string(),
                text_at(row, "description").to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    format::render_table_or_blocks(&columns, &table_rows, format::terminal_width(), block_label)
}

fn period_line(data: &Value) -> String {
    let period = data.get("period");
    let start = period
        .and_then(|value| value.get("start"))
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let end = period
        .and_then(|value| value.get("end"))
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    format!("Period: {start} to {end}")
}

fn notice_message(data: &Value, fallback: &str) -> String {
    data.get("notice")
        .and_then(|notice| notice.get("message"))
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

fn push_saved_to(lines: &mut Vec<String>, data: &Value) {
    if let Some(path) = data.get("saved_to").and_then(Value::as_str) {
        lines.push(String::new());
        lines.push(format!("Saved to {path}"));
    }
}

fn array_at<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn text_at<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

fn amount_at(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_f64)
        .map(format::format_amount)
        .unwrap_or_default()
}
