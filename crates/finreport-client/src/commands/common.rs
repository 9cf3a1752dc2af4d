use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use crate::ClientResult;
use crate::config::ReportConfig;
use crate::contracts::types::ReportPeriod;
use crate::persist::{ReportDestination, write_report};
use crate::records::{RecordSet, load_records};
use crate::reports::DateWindow;
use crate::reports::date::format_reference;

/// Where, if anywhere, a command writes its report payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SaveTarget {
    #[default]
    Skip,
    /// A timestamped file under the configured reports directory.
    ReportsDir,
    File(PathBuf),
}

impl SaveTarget {
    pub fn from_flags(save: bool, output: Option<PathBuf>) -> Self {
        match (output, save) {
            (Some(path), _) => Self::File(path),
            (None, true) => Self::ReportsDir,
            (None, false) => Self::Skip,
        }
    }
}

pub(crate) fn load_transactions(config: &ReportConfig) -> ClientResult<RecordSet> {
    load_records(&config.transactions_path)
}

pub(crate) fn now_or(now: Option<NaiveDateTime>) -> NaiveDateTime {
    now.unwrap_or_else(|| Local::now().naive_local())
}

pub(crate) fn period_of(window: &DateWindow) -> ReportPeriod {
    ReportPeriod {
        start: format_reference(&window.start),
        end: format_reference(&window.end),
    }
}

pub(crate) fn save_report<T>(
    config: &ReportConfig,
    report_name: &str,
    target: &SaveTarget,
    report: &T,
) -> ClientResult<Option<String>>
where
    T: Serialize + ?Sized,
{
    let destination = match target {
        SaveTarget::Skip => return Ok(None),
        SaveTarget::ReportsDir => ReportDestination::Timestamped {
            dir: config.reports_dir.clone(),
            name: report_name.to_string(),
        },
        SaveTarget::File(path) => ReportDestination::File(path.clone()),
    };
    let path = write_report(report, &destination)?;
    Ok(Some(path.display().to_string()))
}
