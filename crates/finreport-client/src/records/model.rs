use serde::Serialize;

/// Header names of the bank export. Matching is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    OperationDate,
    PaymentDate,
    CardNumber,
    Status,
    OperationAmount,
    OperationCurrency,
    PaymentAmount,
    PaymentCurrency,
    Cashback,
    Category,
    Mcc,
    Description,
    Bonuses,
    InvestRounding,
    RoundedOperationAmount,
}

pub const ALL_COLUMNS: [Column; 15] = [
    Column::OperationDate,
    Column::PaymentDate,
    Column::CardNumber,
    Column::Status,
    Column::OperationAmount,
    Column::OperationCurrency,
    Column::PaymentAmount,
    Column::PaymentCurrency,
    Column::Cashback,
    Column::Category,
    Column::Mcc,
    Column::Description,
    Column::Bonuses,
    Column::InvestRounding,
    Column::RoundedOperationAmount,
];

impl Column {
    pub const fn header(self) -> &'static str {
        match self {
            Self::OperationDate => "Дата операции",
            Self::PaymentDate => "Дата платежа",
            Self::CardNumber => "Номер карты",
            Self::Status => "Статус",
            Self::OperationAmount => "Сумма операции",
            Self::OperationCurrency => "Валюта операции",
            Self::PaymentAmount => "Сумма платежа",
            Self::PaymentCurrency => "Валюта платежа",
            Self::Cashback => "Кэшбэк",
            Self::Category => "Категория",
            Self::Mcc => "MCC",
            Self::Description => "Описание",
            Self::Bonuses => "Бонусы (включая кэшбэк)",
            Self::InvestRounding => "Округление на инвесткопилку",
            Self::RoundedOperationAmount => "Сумма операции с округлением",
        }
    }

    pub fn from_header(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        ALL_COLUMNS
            .iter()
            .copied()
            .find(|column| column.header() == trimmed)
    }
}

/// One non-blank cell, keeping the type it had in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Lenient coercion: numbers pass through, text is parsed after trimming.
    pub fn coerce_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) if value.is_finite() => Some(*value),
            Self::Number(_) => None,
            Self::Text(text) => parse_numeric_text(text),
        }
    }

    /// Strict access: only cells that were numbers in the source.
    pub fn strict_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) if value.is_finite() => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Self::Number(value) => format_number(*value),
            Self::Text(text) => text.clone(),
        }
    }
}

pub fn parse_numeric_text(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(['\u{a0}', ' '], "").replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    value.to_string()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionRecord {
    /// 1-based data row in the source, header excluded.
    pub row: usize,
    pub operation_date: Option<String>,
    pub payment_date: Option<String>,
    pub card_number: Option<String>,
    pub status: Option<String>,
    pub operation_amount: Option<CellValue>,
    pub operation_currency: Option<String>,
    pub payment_amount: Option<CellValue>,
    pub payment_currency: Option<String>,
    pub cashback: Option<CellValue>,
    pub category: Option<String>,
    pub mcc: Option<CellValue>,
    pub description: Option<String>,
    pub bonuses: Option<CellValue>,
    pub invest_rounding: Option<CellValue>,
    pub rounded_operation_amount: Option<CellValue>,
}

impl TransactionRecord {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            ..Self::default()
        }
    }

    pub fn set(&mut self, column: Column, value: CellValue) {
        match column {
            Column::OperationDate => self.operation_date = Some(value.as_text()),
            Column::PaymentDate => self.payment_date = Some(value.as_text()),
            Column::CardNumber => self.card_number = Some(value.as_text()),
            Column::Status => self.status = Some(value.as_text()),
            Column::OperationAmount => self.operation_amount = Some(value),
            Column::OperationCurrency => self.operation_currency = Some(value.as_text()),
            Column::PaymentAmount => self.payment_amount = Some(value),
            Column::PaymentCurrency => self.payment_currency = Some(value.as_text()),
            Column::Cashback => self.cashback = Some(value),
            Column::Category => self.category = Some(value.as_text()),
            Column::Mcc => self.mcc = Some(value),
            Column::Description => self.description = Some(value.as_text()),
            Column::Bonuses => self.bonuses = Some(value),
            Column::InvestRounding => self.invest_rounding = Some(value),
            Column::RoundedOperationAmount => self.rounded_operation_amount = Some(value),
        }
    }

    pub fn operation_amount(&self) -> Option<f64> {
        self.operation_amount
            .as_ref()
            .and_then(CellValue::coerce_number)
    }

    pub fn payment_amount(&self) -> Option<f64> {
        self.payment_amount.as_ref().and_then(CellValue::coerce_number)
    }

    /// Trailing four characters of the card identifier.
    pub fn card_last_digits(&self) -> Option<String> {
        let card = self.card_number.as_deref()?.trim();
        if card.is_empty() {
            return None;
        }
        let chars = card.chars().collect::<Vec<char>>();
        let start = chars.len().saturating_sub(4);
        Some(chars[start..].iter().collect())
    }

    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    pub fn description_label(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Records together with the columns the source actually carried.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub columns: Vec<Column>,
    pub records: Vec<TransactionRecord>,
}

impl RecordSet {
    pub fn new(columns: Vec<Column>, records: Vec<TransactionRecord>) -> Self {
        Self { columns, records }
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// First column from `required` that the source does not carry.
    pub fn missing_column(&self, required: &[Column]) -> Option<Column> {
        required
            .iter()
            .copied()
            .find(|column| !self.has_column(*column))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
