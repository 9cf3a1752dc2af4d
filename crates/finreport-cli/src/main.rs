mod cli;
mod dispatch;
mod logging;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use finreport_client::{ClientError, ConfigOverrides, ReportConfig};
use stdout_io::write_stdout_text;
use tracing::{error, info};

const ROOT_HELP: &str = "finreport - personal finance reports from bank exports

Usage:
  finreport <command>

Start here:
  finreport home --date \"2021-12-31 16:44:00\"
  finreport --help
";

const TOP_LEVEL_HELP: &str = "finreport - personal finance reports from bank exports

USAGE: finreport [--home <path>] <command>

Reports:
  finreport home --date \"YYYY-MM-DD HH:MM:SS\"          Month-to-date cards, top operations, quotes
  finreport spending <category> [--date ...]           Category spending over the last 90 days
  finreport cashback --year <YYYY> --month <MM>        Cashback earned per category

Every report accepts:
  --file <path>       Transactions export (.xlsx, .xls, .ods, .csv, .json)
  --json              Print the report payload as JSON
  --save              Save the payload under <home>/reports
  --output <path>     Save the payload to a specific file

Environment:
  FINREPORT_HOME      Data directory (default ~/.finreport)
  FINREPORT_DATA      Transactions file (default <home>/data/operations.xlsx)
  API_KEY             openexchangerates.org key for currency rates
  API_KEY_STOCK       Alpha Vantage key for stock prices
  FINREPORT_LOG       Log filter for <home>/logs/finreport.log (default info)

Run `finreport <command> --help` for command usage.
";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }
    let parsed = cli::Cli::try_parse();
    let cli = match parsed {
        Ok(value) => value,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let text = if is_top_level_help_request(&raw_args) {
                    TOP_LEVEL_HELP.to_string()
                } else {
                    err.to_string()
                };
                if write_stdout_text(&text).is_err() {
                    return Err(ExitCode::from(2));
                }
                return Ok(ExitCode::SUCCESS);
            }
            let command_hint = if matches!(
                err.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::InvalidValue
                    | ErrorKind::ValueValidation
                    | ErrorKind::WrongNumberOfValues
                    | ErrorKind::UnknownArgument
                    | ErrorKind::InvalidSubcommand
            ) {
                command_path_from_args(&raw_args)
            } else {
                None
            };
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                ClientError::invalid_argument_for_command(&clean_message, command_hint.as_deref());
            let mode = infer_requested_output_mode(&raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            return Err(ExitCode::from(1));
        }
    };
    let mode = output::mode_for_command(&cli.command);

    let overrides = ConfigOverrides {
        home: cli.home.clone(),
        transactions: cli.command.report_args().file.clone(),
    };
    let config = match ReportConfig::resolve(overrides) {
        Ok(config) => config,
        Err(error) => {
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            return Err(exit_code_for_error(&error));
        }
    };
    logging::init(&config.logs_dir);
    info!(
        command = command_name(&cli.command),
        transactions = %config.transactions_path.display(),
        "report requested"
    );

    let dispatched = dispatch::dispatch(&cli.command, &config);
    match dispatched {
        Ok(success) => {
            info!(command = %success.command, "report built");
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            error!(code = %failure.code, message = %failure.message, "report failed");
            if output::print_failure(&failure, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&failure))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Strips clap's trailing boilerplate (Usage line, "For more information" hint)
/// so our "What to do next" section is the single source of guidance.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// First non-flag argument, when it names a report command.
fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let first = raw_args
        .iter()
        .skip(1)
        .find(|value| !value.starts_with('-'))
        .map(String::as_str)?;

    match first {
        "home" | "spending" | "cashback" => Some(first.to_string()),
        _ => None,
    }
}

fn command_name(command: &cli::Commands) -> &'static str {
    match command {
        cli::Commands::Home { .. } => "home",
        cli::Commands::Spending { .. } => "spending",
        cli::Commands::Cashback { .. } => "cashback",
    }
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if is_internal_error(error) {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

fn is_internal_error(error: &ClientError) -> bool {
    error.code.starts_with("internal_")
        || matches!(
            error.code.as_str(),
            "home_unresolved" | "report_write_failed" | "quote_client_unavailable"
        )
}
