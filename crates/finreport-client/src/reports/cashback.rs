use std::collections::HashMap;

use chrono::Datelike;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{error, info};

use crate::records::{CellValue, Column, RecordSet};
use crate::reports::date::parse_operation_date;
use crate::reports::policy::UNKNOWN_CATEGORY;
use crate::reports::{EmptyReason, Outcome};
use crate::{ClientError, ClientResult};

/// Category totals ordered by descending cashback; serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CashbackRanking {
    entries: Vec<(String, i64)>,
}

impl CashbackRanking {
    pub fn entries(&self) -> &[(String, i64)] {
        &self.entries
    }

    pub fn get(&self, category: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, total)| *total)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for CashbackRanking {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, total) in &self.entries {
            map.serialize_entry(category, total)?;
        }
        map.end()
    }
}

pub fn rank_cashback_categories(
    set: &RecordSet,
    year: i32,
    month: u32,
) -> ClientResult<Outcome<CashbackRanking>> {
    if !(1..=12).contains(&month) {
        return Err(ClientError::invalid_argument_for_command(
            &format!("Month must be between 1 and 12, got {month}."),
            Some("cashback"),
        ));
    }
    if set.is_empty() {
        info!(year, month, "no operations to rank for cashback");
        return Ok(Outcome::Empty(EmptyReason::NoPositiveCashback));
    }
    if let Some(column) = set.missing_column(&[Column::OperationDate, Column::Cashback]) {
        error!(column = column.header(), "cashback ranking cannot run without column");
        return Ok(Outcome::Empty(EmptyReason::MissingColumn { column }));
    }

    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, f64> = HashMap::new();
    for record in &set.records {
        let Some(instant) = record.operation_date.as_deref().and_then(parse_operation_date)
        else {
            continue;
        };
        if instant.year() != year || instant.month() != month {
            continue;
        }

        let cashback = match &record.cashback {
            None => 0.0,
            Some(cell) => match cell.strict_number() {
                Some(value) => value,
                None => {
                    let received = match cell {
                        CellValue::Text(text) => text.clone(),
                        CellValue::Number(value) => value.to_string(),
                    };
                    error!(row = record.row, received = %received, "cashback cell is not numeric");
                    return Err(ClientError::cashback_type_mismatch(record.row, &received));
                }
            },
        };

        let category = match record.category.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => UNKNOWN_CATEGORY.to_string(),
        };
        let sum = sums.entry(category.clone()).or_insert_with(|| {
            order.push(category.clone());
            0.0
        });
        *sum += cashback;
    }

    let mut entries = order
        .into_iter()
        .filter_map(|category| {
            let total = sums.get(&category).copied().unwrap_or(0.0);
            (total > 0.0).then(|| (category, total.trunc() as i64))
        })
        .collect::<Vec<(String, i64)>>();
    entries.sort_by(|left, right| right.1.cmp(&left.1));

    if entries.is_empty() {
        info!(year, month, "no positive cashback for month");
        return Ok(Outcome::Empty(EmptyReason::NoPositiveCashback));
    }

    Ok(Outcome::Found(CashbackRanking { entries }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::rank_cashback_categories;
    use crate::records::{CellValue, Column, RecordSet, TransactionRecord};
    use crate::reports::{EmptyReason, Outcome};

    fn record(
        row: usize,
        date: &str,
        category: Option<&str>,
        cashback: Option<CellValue>,
    ) -> TransactionRecord {
        let mut record = TransactionRecord::new(row);
        record.set(Column::OperationDate, CellValue::Text(date.to_string()));
        if let Some(name) = category {
            record.set(Column::Category, CellValue::Text(name.to_string()));
        }
        if let Some(value) = cashback {
            record.set(Column::Cashback, value);
        }
        record
    }

    fn set_of(records: Vec<TransactionRecord>) -> RecordSet {
        RecordSet::new(
            vec![Column::OperationDate, Column::Category, Column::Cashback],
            records,
        )
    }

    #[test]
    fn ranks_positive_categories_for_the_month() {
        let set = set_of(vec![
            record(1, "31.12.2021 16:44:00", Some("Супермаркеты"), Some(CellValue::Number(0.0))),
            record(2, "31.12.2021 16:42:04", Some("Ж/д билеты"), Some(CellValue::Number(70.0))),
        ]);

        let result = rank_cashback_categories(&set, 2021, 12);
        assert!(matches!(result, Ok(Outcome::Found(_))));
        if let Ok(Outcome::Found(ranking)) = result {
            assert_eq!(ranking.entries(), &[("Ж/д билеты".to_string(), 70)]);
            let json = serde_json::to_string(&ranking);
            assert!(json.is_ok());
            if let Ok(text) = json {
                assert_eq!(text, r#"{"Ж/д билеты":70}"#);
            }
        }

        let other_year = rank_cashback_categories(&set, 2019, 12);
        assert!(matches!(
            other_year,
            Ok(Outcome::Empty(EmptyReason::NoPositiveCashback))
        ));
    }

    #[test]
    fn totals_truncate_sort_descending_and_keep_tie_order() {
        let set = set_of(vec![
            record(1, "01.03.2022 10:00:00", Some("A"), Some(CellValue::Number(5.9))),
            record(2, "02.03.2022 10:00:00", Some("B"), Some(CellValue::Number(12.2))),
            record(3, "03.03.2022 10:00:00", None, Some(CellValue::Number(5.1))),
            record(4, "04.03.2022 10:00:00", Some("B"), None),
            record(5, "garbage", Some("C"), Some(CellValue::Text("oops".to_string()))),
            record(6, "05.04.2022 10:00:00", Some("C"), Some(CellValue::Number(100.0))),
            record(7, "06.03.2022 10:00:00", Some("D"), Some(CellValue::Number(-3.0))),
        ]);

        let result = rank_cashback_categories(&set, 2022, 3);
        assert!(result.is_ok());
        if let Ok(outcome) = result {
            let ranking = outcome.found().unwrap_or_default();
            assert_eq!(
                ranking.entries(),
                &[
                    ("B".to_string(), 12),
                    ("A".to_string(), 5),
                    ("Неизвестная категория".to_string(), 5),
                ]
            );
            assert_eq!(ranking.get("D"), None);
        }
    }

    #[test]
    fn textual_cashback_is_a_type_error() {
        let set = set_of(vec![
            record(1, "31.12.2021 16:44:00", Some("Супермаркеты"), Some(CellValue::Number(1.0))),
            record(2, "31.12.2021 16:42:04", Some("Ж/д билеты"), Some(CellValue::Text("70".to_string()))),
        ]);
        let result = rank_cashback_categories(&set, 2021, 12);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "cashback_type_mismatch");
            assert_eq!(error.data.as_ref().map(|data| data["row"].clone()), Some(json!(2)));
        }
    }

    #[test]
    fn rejects_months_outside_calendar_and_reports_missing_columns() {
        let set = set_of(Vec::new());
        assert!(rank_cashback_categories(&set, 2021, 13).is_err());
        assert!(rank_cashback_categories(&set, 2021, 0).is_err());

        let narrow = RecordSet::new(
            vec![Column::OperationDate],
            vec![record(1, "31.12.2021 16:44:00", None, None)],
        );
        let result = rank_cashback_categories(&narrow, 2021, 12);
        assert!(matches!(
            result,
            Ok(Outcome::Empty(EmptyReason::MissingColumn {
                column: Column::Cashback
            }))
        ));
    }

    #[test]
    fn empty_export_has_no_positive_cashback() {
        let headerless = RecordSet::new(Vec::new(), Vec::new());
        let result = rank_cashback_categories(&headerless, 2021, 12);
        assert!(matches!(
            result,
            Ok(Outcome::Empty(EmptyReason::NoPositiveCashback))
        ));
    }
}
