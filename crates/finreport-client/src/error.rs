use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

/// Literal text returned whenever a reference date cannot be parsed.
pub const INVALID_REFERENCE_DATE_MESSAGE: &str =
    "Неверный формат даты и времени. Используйте YYYY-MM-DD HH:MM:SS";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `finreport {cmd} --help` for usage."),
            None => "Run `finreport --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_reference_date(received: &str) -> Self {
        Self::new(
            "invalid_reference_date",
            INVALID_REFERENCE_DATE_MESSAGE,
            vec!["Pass the date as `YYYY-MM-DD HH:MM:SS`, e.g. `2021-12-31 14:00:00`.".to_string()],
        )
        .with_data(json!({
            "received": received,
            "expected_format": "YYYY-MM-DD HH:MM:SS",
        }))
    }

    pub fn transactions_unreadable(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "transactions_unreadable",
            &format!("Could not read transactions from `{location}`: {detail}"),
            vec![
                "Verify the path exists and is readable.".to_string(),
                "Pass another file with `--file <path>` or set `FINREPORT_DATA`.".to_string(),
            ],
        )
        .with_data(json!({
            "path": location,
        }))
    }

    pub fn unsupported_source_format(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "unsupported_source_format",
            &format!("Unsupported transactions file `{location}`."),
            vec!["Provide an .xlsx, .xls, .ods, .csv or .json export.".to_string()],
        )
        .with_data(json!({
            "path": location,
            "supported_formats": ["xlsx", "xls", "xlsm", "ods", "csv", "json"],
        }))
    }

    pub fn cashback_type_mismatch(row: usize, received: &str) -> Self {
        Self::new(
            "cashback_type_mismatch",
            &format!("Cashback in row {row} is not a number: `{received}`."),
            vec![
                "Fix the cashback cell so it holds a numeric value.".to_string(),
                "Rerun the cashback report.".to_string(),
            ],
        )
        .with_data(json!({
            "row": row,
            "received": received,
        }))
    }

    pub fn report_write_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "report_write_failed",
            &format!("Could not write report to `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or choose another `--output` path."
            )],
        )
    }

    pub fn home_unresolved(detail: &str) -> Self {
        Self::new(
            "home_unresolved",
            &format!("Could not resolve the finreport home directory: {detail}"),
            vec!["Set `FINREPORT_HOME` to a readable directory.".to_string()],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
