pub mod model;
pub mod source;

pub use model::{CellValue, Column, RecordSet, TransactionRecord};
pub use source::{SourceKind, load_records, parse_csv_records, parse_json_records};
