use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::info;

use crate::{ClientError, ClientResult};

const INDENT: &[u8] = b"    ";

/// Where a finished report is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportDestination {
    File(PathBuf),
    /// `<dir>/<name>_<YYYYMMDD_HHMMSS>.json`
    Timestamped { dir: PathBuf, name: String },
}

impl ReportDestination {
    pub fn path_at(&self, now: NaiveDateTime) -> PathBuf {
        match self {
            Self::File(path) => path.clone(),
            Self::Timestamped { dir, name } => {
                dir.join(format!("{name}_{}.json", now.format("%Y%m%d_%H%M%S")))
            }
        }
    }
}

/// Four-space indented JSON with non-ASCII text kept as is.
pub fn to_report_json<T>(value: &T) -> ClientResult<String>
where
    T: Serialize + ?Sized,
{
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    value
        .serialize(&mut serializer)
        .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
    String::from_utf8(buffer).map_err(|error| ClientError::internal_serialization(&error.to_string()))
}

pub fn write_report<T>(value: &T, destination: &ReportDestination) -> ClientResult<PathBuf>
where
    T: Serialize + ?Sized,
{
    write_report_at(value, destination, Local::now().naive_local())
}

#[doc(hidden)]
pub fn write_report_at<T>(
    value: &T,
    destination: &ReportDestination,
    now: NaiveDateTime,
) -> ClientResult<PathBuf>
where
    T: Serialize + ?Sized,
{
    let path = destination.path_at(now);
    let content = to_report_json(value)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|error| write_failed(parent, &error))?;
    }
    fs::write(&path, content).map_err(|error| write_failed(&path, &error))?;

    info!(path = %path.display(), "report written");
    Ok(path)
}

fn write_failed(path: &Path, error: &std::io::Error) -> ClientError {
    ClientError::report_write_failed(path, &error.to_string())
}
