use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "FINREPORT_LOG";
pub const LOG_FILE_NAME: &str = "finreport.log";

const DEFAULT_FILE_FILTER: &str = "info";
const DEFAULT_STDERR_FILTER: &str = "warn";

/// Sends diagnostics to `<logs_dir>/finreport.log`, falling back to stderr
/// when the file cannot be opened. Stdout stays reserved for report output.
///
/// Returns whether this call installed the global subscriber.
pub fn init(logs_dir: &Path) -> bool {
    let installed = match open_log_file(logs_dir) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter_from_env(DEFAULT_FILE_FILTER))
            .with_ansi(false)
            .with_target(true)
            .with_writer(Mutex::new(file))
            .try_init(),
        Err(error) => {
            let installed = tracing_subscriber::fmt()
                .with_env_filter(filter_from_env(DEFAULT_STDERR_FILTER))
                .with_writer(io::stderr)
                .try_init();
            tracing::warn!(
                logs_dir = %logs_dir.display(),
                %error,
                "log file unavailable; logging to stderr"
            );
            installed
        }
    };

    match installed {
        Ok(()) => true,
        Err(error) => {
            eprintln!("finreport: logging not initialised: {error}");
            false
        }
    }
}

pub fn log_file_path(logs_dir: &Path) -> PathBuf {
    logs_dir.join(LOG_FILE_NAME)
}

fn open_log_file(logs_dir: &Path) -> io::Result<File> {
    fs::create_dir_all(logs_dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(logs_dir))
}

fn filter_from_env(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}
