use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{Value, json};
use tempfile::TempDir;

const OPERATIONS: &str = r#"[
    {"Дата операции": "31.12.2021 16:44:00", "Номер карты": "*7197", "Статус": "OK",
     "Сумма операции": -160.89, "Валюта операции": "RUB", "Сумма платежа": -160.89,
     "Категория": "Супермаркеты", "Описание": "Колхоз", "Кэшбэк": 0},
    {"Дата операции": "31.12.2021 16:39:04", "Номер карты": "*7197", "Статус": "OK",
     "Сумма операции": -64.0, "Валюта операции": "RUB", "Сумма платежа": -64.0,
     "Категория": "Супермаркеты", "Описание": "Колхоз", "Кэшбэк": null},
    {"Дата операции": "30.12.2021 10:00:00", "Номер карты": "*7197", "Статус": "FAILED",
     "Сумма операции": -5000.0, "Валюта операции": "RUB", "Сумма платежа": -5000.0,
     "Категория": "Супермаркеты", "Описание": "Отмена", "Кэшбэк": 0},
    {"Дата операции": "15.12.2021 09:00:00", "Номер карты": "*4556", "Статус": "OK",
     "Сумма операции": -1200.0, "Валюта операции": "RUB", "Сумма платежа": -1200.0,
     "Категория": "Ж/д билеты", "Описание": "РЖД", "Кэшбэк": 70}
]"#;

struct Workspace {
    _dir: TempDir,
    home: PathBuf,
    operations: PathBuf,
}

fn workspace() -> Option<Workspace> {
    let dir = tempfile::tempdir().ok()?;
    let home = dir.path().join("home");
    fs::create_dir_all(&home).ok()?;
    let operations = dir.path().join("operations.json");
    fs::write(&operations, OPERATIONS).ok()?;
    Some(Workspace {
        _dir: dir,
        home,
        operations,
    })
}

fn run_cli(home: &Path, args: &[&str]) -> (Option<i32>, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_finreport"))
        .args(args)
        .env("FINREPORT_HOME", home)
        .env_remove("FINREPORT_DATA")
        .env_remove("API_KEY")
        .env_remove("API_KEY_STOCK")
        .output();
    match output {
        Ok(value) => (
            value.status.code(),
            String::from_utf8_lossy(&value.stdout).to_string(),
        ),
        Err(error) => (None, error.to_string()),
    }
}

fn run_report(workspace: &Workspace, args: &[&str]) -> (Option<i32>, String) {
    let file = workspace.operations.display().to_string();
    let mut full = args.to_vec();
    full.push("--file");
    full.push(&file);
    run_cli(&workspace.home, &full)
}

fn parse_json(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or(Value::Null)
}

#[test]
fn bare_invocation_prints_root_help() {
    let Some(workspace) = workspace() else {
        return;
    };
    let (code, stdout) = run_cli(&workspace.home, &[]);
    assert_eq!(code, Some(0));
    assert!(stdout.starts_with("finreport - personal finance reports"));
    assert!(stdout.contains("finreport home --date"));
}

#[test]
fn top_level_help_lists_every_report() {
    let Some(workspace) = workspace() else {
        return;
    };
    let (code, stdout) = run_cli(&workspace.home, &["--help"]);
    assert_eq!(code, Some(0));
    for command in ["finreport home", "finreport spending", "finreport cashback"] {
        assert!(stdout.contains(command));
    }
}

#[test]
fn home_json_prints_the_composite_payload() {
    let Some(workspace) = workspace() else {
        return;
    };
    let (code, stdout) = run_report(
        &workspace,
        &["home", "--date", "2021-12-31 16:44:00", "--offline", "--json"],
    );
    assert_eq!(code, Some(0));
    let payload = parse_json(&stdout);
    let keys = payload
        .as_object()
        .map(|object| object.keys().cloned().collect::<Vec<String>>())
        .unwrap_or_default();
    assert_eq!(
        keys,
        vec![
            "greeting",
            "cards",
            "top_transactions",
            "currency_rates",
            "stock_prices"
        ]
    );
    assert_eq!(
        payload["cards"],
        json!([
            {"last_digits": "7197", "total_spent": 224.89, "cashback": 2.25},
            {"last_digits": "4556", "total_spent": 1200.0, "cashback": 12.0}
        ])
    );
    assert_eq!(payload["top_transactions"][0]["amount"], json!(1200.0));
    assert_eq!(payload["currency_rates"], json!([]));
}

#[test]
fn home_rejects_malformed_date_with_literal_message() {
    let Some(workspace) = workspace() else {
        return;
    };
    let (code, stdout) = run_report(&workspace, &["home", "--date", "31.12.2021", "--offline"]);
    assert_eq!(code, Some(1));
    assert!(stdout.contains("Неверный формат даты и времени. Используйте YYYY-MM-DD HH:MM:SS"));

    let (json_code, json_stdout) = run_report(
        &workspace,
        &["home", "--date", "31.12.2021", "--offline", "--json"],
    );
    assert_eq!(json_code, Some(1));
    let payload = parse_json(&json_stdout);
    assert_eq!(payload["error"]["code"], "invalid_reference_date");
}

#[test]
fn spending_text_lists_matching_operations() {
    let Some(workspace) = workspace() else {
        return;
    };
    let (code, stdout) = run_report(
        &workspace,
        &["spending", "супермаркеты", "--date", "2021-12-31 23:59:59"],
    );
    assert_eq!(code, Some(0));
    assert!(stdout.starts_with("Spending in супермаркеты"));
    assert!(stdout.contains("Колхоз"));
    assert!(!stdout.contains("Отмена"));
    assert!(stdout.contains("Operations:  2"));
}

#[test]
fn cashback_json_and_saved_file_match() {
    let Some(workspace) = workspace() else {
        return;
    };
    let (code, stdout) = run_report(
        &workspace,
        &["cashback", "--year", "2021", "--month", "12", "--json", "--save"],
    );
    assert_eq!(code, Some(0));
    assert_eq!(parse_json(&stdout), json!({"Ж/д билеты": 70}));

    let saved = fs::read_dir(workspace.home.join("reports"))
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .collect::<Vec<PathBuf>>()
        })
        .unwrap_or_default();
    assert_eq!(saved.len(), 1);
    let content = saved
        .first()
        .and_then(|path| fs::read_to_string(path).ok())
        .unwrap_or_default();
    assert_eq!(content, "{\n    \"Ж/д билеты\": 70\n}");
}

#[test]
fn cashback_for_quiet_month_prints_null() {
    let Some(workspace) = workspace() else {
        return;
    };
    let (code, stdout) = run_report(
        &workspace,
        &["cashback", "--year", "2019", "--month", "12", "--json"],
    );
    assert_eq!(code, Some(0));
    assert_eq!(stdout.trim(), "null");
}

#[test]
fn cashback_rejects_month_outside_calendar() {
    let Some(workspace) = workspace() else {
        return;
    };
    let (code, stdout) = run_report(
        &workspace,
        &["cashback", "--year", "2021", "--month", "13", "--json"],
    );
    assert_eq!(code, Some(1));
    let payload = parse_json(&stdout);
    assert_eq!(payload["error"]["code"], "invalid_argument");
    assert_eq!(
        payload["error"]["recovery_steps"][0],
        "Run `finreport cashback --help` for usage."
    );
}

#[test]
fn missing_transactions_file_is_a_user_error() {
    let Some(workspace) = workspace() else {
        return;
    };
    let missing = workspace.home.join("nowhere.xlsx").display().to_string();
    let (code, stdout) = run_cli(
        &workspace.home,
        &["cashback", "--year", "2021", "--month", "12", "--file", &missing],
    );
    assert_eq!(code, Some(1));
    assert!(stdout.contains("transactions_unreadable"));
    assert!(stdout.contains(&format!("File:     {missing}")));
}

#[test]
fn runs_write_the_log_file_under_home() {
    let Some(workspace) = workspace() else {
        return;
    };
    let (code, _) = run_report(
        &workspace,
        &["cashback", "--year", "2021", "--month", "12"],
    );
    assert_eq!(code, Some(0));
    let log = fs::read_to_string(workspace.home.join("logs").join("finreport.log"));
    assert!(log.is_ok());
    if let Ok(text) = log {
        assert!(text.contains("report requested"));
    }
}
