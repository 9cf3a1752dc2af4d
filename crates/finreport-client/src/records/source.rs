use std::collections::HashMap;
use std::fs;
use std::path::Path;

use calamine::{Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::{debug, info};

use crate::records::model::{
    CellValue, Column, RecordSet, TransactionRecord, parse_numeric_text,
};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SourceKind {
    Spreadsheet,
    Csv,
    Json,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Spreadsheet),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spreadsheet => "spreadsheet",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

pub fn load_records(path: &Path) -> ClientResult<RecordSet> {
    let Some(kind) = SourceKind::from_path(path) else {
        return Err(ClientError::unsupported_source_format(path));
    };
    if !path.is_file() {
        return Err(ClientError::transactions_unreadable(path, "file not found"));
    }

    let records = match kind {
        SourceKind::Spreadsheet => read_spreadsheet(path)?,
        SourceKind::Csv => {
            let content = read_text(path)?;
            parse_csv_records(&content)
                .map_err(|detail| ClientError::transactions_unreadable(path, &detail))?
        }
        SourceKind::Json => {
            let content = read_text(path)?;
            parse_json_records(&content)
                .map_err(|detail| ClientError::transactions_unreadable(path, &detail))?
        }
    };

    info!(
        path = %path.display(),
        source = kind.as_str(),
        records = records.len(),
        "transactions loaded"
    );
    Ok(records)
}

fn read_text(path: &Path) -> ClientResult<String> {
    fs::read_to_string(path)
        .map_err(|error| ClientError::transactions_unreadable(path, &error.to_string()))
}

fn read_spreadsheet(path: &Path) -> ClientResult<RecordSet> {
    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|error| ClientError::transactions_unreadable(path, &error.to_string()))?;
    let Some(first_sheet) = workbook.worksheet_range_at(0) else {
        return Err(ClientError::transactions_unreadable(
            path,
            "workbook has no worksheets",
        ));
    };
    let range =
        first_sheet.map_err(|error| ClientError::transactions_unreadable(path, &error.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(RecordSet::default());
    };
    let headers = header_row
        .iter()
        .map(|cell| match cell {
            Data::String(text) => text.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<String>>();
    let layout = HeaderLayout::from_headers(&headers);

    let mut records = Vec::new();
    for (index, row) in rows.enumerate() {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let mut record = TransactionRecord::new(index + 1);
        for (column_index, column) in &layout.by_index {
            if let Some(value) = row.get(*column_index).and_then(cell_from_spreadsheet) {
                record.set(*column, value);
            }
        }
        records.push(record);
    }

    Ok(RecordSet::new(layout.columns, records))
}

/// Converts one spreadsheet cell; blanks and error cells are absent.
pub fn cell_from_spreadsheet(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::Int(value) => Some(CellValue::Number(*value as f64)),
        Data::Float(value) => Some(CellValue::Number(*value)),
        Data::Bool(value) => Some(CellValue::Text(value.to_string())),
        Data::String(text) => non_blank_text(text),
        Data::DateTimeIso(text) | Data::DurationIso(text) => non_blank_text(text),
        Data::DateTime(value) => excel_serial_to_datetime(value.as_f64())
            .map(|stamp| CellValue::Text(stamp.format("%d.%m.%Y %H:%M:%S").to_string())),
    }
}

pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let whole_days = serial.trunc() as i64;
    let seconds = ((serial - serial.trunc()) * 86_400.0).round() as i64;
    base.checked_add_signed(Duration::days(whole_days) + Duration::seconds(seconds))
}

pub fn parse_csv_records(content: &str) -> Result<RecordSet, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| "CSV header row is missing or unreadable.".to_string())?
        .iter()
        .map(|value| value.trim().trim_start_matches('\u{feff}').to_string())
        .collect::<Vec<String>>();
    let layout = HeaderLayout::from_headers(&headers);

    let mut records = Vec::new();
    for (row_index, result_row) in reader.records().enumerate() {
        let record = result_row.map_err(|_| "CSV rows are malformed or not UTF-8.".to_string())?;
        let mut parsed = TransactionRecord::new(row_index + 1);
        for (column_index, column) in &layout.by_index {
            let Some(raw) = record.get(*column_index) else {
                continue;
            };
            if let Some(value) = cell_from_csv(raw) {
                parsed.set(*column, value);
            }
        }
        records.push(parsed);
    }

    Ok(RecordSet::new(layout.columns, records))
}

fn cell_from_csv(raw: &str) -> Option<CellValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if looks_numeric(trimmed)
        && let Some(number) = parse_numeric_text(trimmed)
    {
        return Some(CellValue::Number(number));
    }
    Some(CellValue::Text(trimmed.to_string()))
}

fn looks_numeric(value: &str) -> bool {
    value
        .chars()
        .all(|character| character.is_ascii_digit() || matches!(character, '-' | '+' | '.' | ','))
}

pub fn parse_json_records(content: &str) -> Result<RecordSet, String> {
    let parsed = serde_json::from_str::<Value>(content)
        .map_err(|_| "Invalid JSON input. Provide a valid JSON array.".to_string())?;

    let Some(items) = parsed.as_array() else {
        return Err("JSON input must be a top-level array of transaction objects.".to_string());
    };

    let mut columns: Vec<Column> = Vec::new();
    let mut records = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let Some(object) = item.as_object() else {
            return Err("JSON array entries must all be objects with transaction fields.".to_string());
        };

        let mut record = TransactionRecord::new(index + 1);
        for (key, value) in object {
            let Some(column) = Column::from_header(key) else {
                debug!(key = %key, "ignoring unknown transaction field");
                continue;
            };
            if !columns.contains(&column) {
                columns.push(column);
            }
            if let Some(cell) = cell_from_json(value) {
                record.set(column, cell);
            }
        }
        records.push(record);
    }

    Ok(RecordSet::new(columns, records))
}

fn cell_from_json(value: &Value) -> Option<CellValue> {
    match value {
        Value::Null => None,
        Value::Number(number) => number.as_f64().map(CellValue::Number),
        Value::String(text) => non_blank_text(text),
        Value::Bool(flag) => Some(CellValue::Text(flag.to_string())),
        other => Some(CellValue::Text(other.to_string())),
    }
}

fn non_blank_text(text: &str) -> Option<CellValue> {
    if text.trim().is_empty() {
        return None;
    }
    Some(CellValue::Text(text.to_string()))
}

struct HeaderLayout {
    columns: Vec<Column>,
    by_index: Vec<(usize, Column)>,
}

impl HeaderLayout {
    fn from_headers(headers: &[String]) -> Self {
        let mut seen: HashMap<Column, usize> = HashMap::new();
        for (index, header) in headers.iter().enumerate() {
            if let Some(column) = Column::from_header(header) {
                seen.entry(column).or_insert(index);
            }
        }

        let mut by_index = seen
            .into_iter()
            .map(|(column, index)| (index, column))
            .collect::<Vec<(usize, Column)>>();
        by_index.sort_by_key(|(index, _)| *index);
        let columns = by_index.iter().map(|(_, column)| *column).collect();

        Self { columns, by_index }
    }
}
