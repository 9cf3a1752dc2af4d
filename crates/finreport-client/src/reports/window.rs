use tracing::{debug, error, info};

use crate::records::{Column, RecordSet, TransactionRecord};
use crate::reports::date::{DateWindow, parse_operation_date};
use crate::reports::policy::COMPLETED_STATUS;
use crate::reports::{EmptyReason, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    AllOperations,
    /// Status `OK` and a non-positive operation amount.
    CompletedDebits,
}

impl WindowMode {
    fn required_columns(self) -> &'static [Column] {
        match self {
            Self::AllOperations => &[Column::OperationDate],
            Self::CompletedDebits => &[
                Column::OperationDate,
                Column::Status,
                Column::OperationAmount,
            ],
        }
    }

    fn admits(self, record: &TransactionRecord) -> bool {
        match self {
            Self::AllOperations => true,
            Self::CompletedDebits => {
                record.status.as_deref() == Some(COMPLETED_STATUS)
                    && record.operation_amount().is_some_and(|amount| amount <= 0.0)
            }
        }
    }
}

/// Records borrowed from a set, in source order.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub columns: &'a [Column],
    pub records: Vec<&'a TransactionRecord>,
}

impl<'a> Selection<'a> {
    pub fn all(set: &'a RecordSet) -> Self {
        Self {
            columns: &set.columns,
            records: set.records.iter().collect(),
        }
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn filter_window<'a>(
    set: &'a RecordSet,
    window: DateWindow,
    mode: WindowMode,
) -> Outcome<Selection<'a>> {
    if let Some(column) = set.missing_column(mode.required_columns()) {
        error!(column = column.header(), "window filter cannot run without column");
        return Outcome::Empty(EmptyReason::MissingColumn { column });
    }

    let mut skipped_dates = 0usize;
    let records = set
        .records
        .iter()
        .filter(|record| {
            let Some(instant) = record.operation_date.as_deref().and_then(parse_operation_date)
            else {
                skipped_dates += 1;
                return false;
            };
            window.contains(instant) && mode.admits(record)
        })
        .collect::<Vec<&TransactionRecord>>();

    if skipped_dates > 0 {
        debug!(skipped = skipped_dates, "records without a parseable operation date");
    }

    if records.is_empty() {
        info!(
            start = %window.start,
            end = %window.end,
            "no operations in window"
        );
        return Outcome::Empty(EmptyReason::NoActivityInPeriod);
    }

    Outcome::Found(Selection {
        columns: &set.columns,
        records,
    })
}
