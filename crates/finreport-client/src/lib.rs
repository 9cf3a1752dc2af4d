pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
pub mod greeting;
pub mod persist;
pub mod quotes;
pub mod records;
pub mod reports;

pub use config::{ConfigOverrides, ReportConfig, UserSettings};
pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
