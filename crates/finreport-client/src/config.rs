use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::{ClientError, ClientResult};

pub const HOME_ENV: &str = "FINREPORT_HOME";
pub const DATA_ENV: &str = "FINREPORT_DATA";
pub const CURRENCY_KEY_ENV: &str = "API_KEY";
pub const STOCK_KEY_ENV: &str = "API_KEY_STOCK";

/// Explicit values that win over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub home: Option<PathBuf>,
    pub transactions: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserSettings {
    pub user_currencies: Vec<String>,
    pub user_stocks: Vec<String>,
}

/// Everything a report run reads from its surroundings, resolved once.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub home: PathBuf,
    pub transactions_path: PathBuf,
    pub settings_path: PathBuf,
    pub reports_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub currency_api_key: Option<String>,
    pub stock_api_key: Option<String>,
    pub settings: UserSettings,
}

impl ReportConfig {
    pub fn resolve(overrides: ConfigOverrides) -> ClientResult<Self> {
        Self::resolve_with(overrides, &|name| std::env::var(name).ok())
    }

    #[doc(hidden)]
    pub fn resolve_with(
        overrides: ConfigOverrides,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> ClientResult<Self> {
        let home = resolve_home(overrides.home.as_deref(), lookup)?;
        let transactions_path = match overrides.transactions {
            Some(path) => absolutize(&path)?,
            None => match non_empty(lookup(DATA_ENV)) {
                Some(value) => absolutize(Path::new(&value))?,
                None => home.join("data").join("operations.xlsx"),
            },
        };
        let settings_path = home.join("user_settings.json");
        let settings = load_user_settings(&settings_path);

        Ok(Self {
            transactions_path,
            reports_dir: home.join("reports"),
            logs_dir: home.join("logs"),
            currency_api_key: non_empty(lookup(CURRENCY_KEY_ENV)),
            stock_api_key: non_empty(lookup(STOCK_KEY_ENV)),
            settings,
            settings_path,
            home,
        })
    }
}

fn resolve_home(
    home_override: Option<&Path>,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> ClientResult<PathBuf> {
    let candidate = match home_override {
        Some(path) => path.to_path_buf(),
        None => {
            if let Some(override_path) = non_empty(lookup(HOME_ENV)) {
                PathBuf::from(override_path)
            } else if let Some(home_path) = home::home_dir() {
                home_path.join(".finreport")
            } else {
                return Err(ClientError::home_unresolved(
                    "no user home directory is available",
                ));
            }
        }
    };

    absolutize(&candidate)
}

/// Reads the user's currency and stock lists.
///
/// A missing file means no lists. Unreadable or malformed files are logged
/// and also yield empty lists; entries that are not strings are dropped.
pub fn load_user_settings(path: &Path) -> UserSettings {
    if !path.exists() {
        debug!(path = %path.display(), "no user settings file");
        return UserSettings::default();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(read_error) => {
            error!(path = %path.display(), error = %read_error, "could not read user settings");
            return UserSettings::default();
        }
    };
    let parsed = match serde_json::from_str::<Value>(&content) {
        Ok(parsed) => parsed,
        Err(parse_error) => {
            error!(path = %path.display(), error = %parse_error, "user settings are not valid JSON");
            return UserSettings::default();
        }
    };

    UserSettings {
        user_currencies: string_entries(&parsed, "user_currencies"),
        user_stocks: string_entries(&parsed, "user_stocks"),
    }
}

fn string_entries(parsed: &Value, key: &str) -> Vec<String> {
    parsed
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn absolutize(path: &Path) -> ClientResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|error| ClientError::home_unresolved(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{ConfigOverrides, ReportConfig, UserSettings, load_user_settings};

    #[test]
    fn overrides_and_environment_resolve_paths() {
        let temp = tempdir();
        assert!(temp.is_ok());
        if let Ok(dir) = temp {
            let home = dir.path().join("fin-home");
            let lookup = |name: &str| match name {
                "FINREPORT_DATA" => Some("/data/export.csv".to_string()),
                "API_KEY" => Some("rates-key".to_string()),
                "API_KEY_STOCK" => Some("  ".to_string()),
                _ => None,
            };
            let config = ReportConfig::resolve_with(
                ConfigOverrides {
                    home: Some(home.clone()),
                    transactions: None,
                },
                &lookup,
            );
            assert!(config.is_ok());
            if let Ok(resolved) = config {
                assert_eq!(resolved.home, home);
                assert_eq!(resolved.transactions_path.to_string_lossy(), "/data/export.csv");
                assert_eq!(resolved.reports_dir, home.join("reports"));
                assert_eq!(resolved.logs_dir, home.join("logs"));
                assert_eq!(resolved.currency_api_key.as_deref(), Some("rates-key"));
                assert_eq!(resolved.stock_api_key, None);
                assert!(resolved.settings.user_currencies.is_empty());
            }
        }
    }

    #[test]
    fn default_transactions_path_lives_under_home() {
        let temp = tempdir();
        assert!(temp.is_ok());
        if let Ok(dir) = temp {
            let lookup = |name: &str| match name {
                "FINREPORT_HOME" => Some(dir.path().to_string_lossy().to_string()),
                _ => None,
            };
            let config = ReportConfig::resolve_with(ConfigOverrides::default(), &lookup);
            assert!(config.is_ok());
            if let Ok(resolved) = config {
                assert_eq!(
                    resolved.transactions_path,
                    dir.path().join("data").join("operations.xlsx")
                );
            }
        }
    }

    #[test]
    fn settings_drop_non_string_entries_and_survive_bad_json() {
        let temp = tempdir();
        assert!(temp.is_ok());
        if let Ok(dir) = temp {
            let path = dir.path().join("user_settings.json");
            let written = fs::write(
                &path,
                r#"{"user_currencies": ["USD", 5, "EUR"], "user_stocks": ["AAPL", null]}"#,
            );
            assert!(written.is_ok());
            let settings = load_user_settings(&path);
            assert_eq!(settings.user_currencies, vec!["USD", "EUR"]);
            assert_eq!(settings.user_stocks, vec!["AAPL"]);

            let rewritten = fs::write(&path, "{not json");
            assert!(rewritten.is_ok());
            assert_eq!(load_user_settings(&path), UserSettings::default());
            assert_eq!(
                load_user_settings(&dir.path().join("missing.json")),
                UserSettings::default()
            );
        }
    }
}
