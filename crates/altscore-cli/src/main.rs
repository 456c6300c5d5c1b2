mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use altscore_client::ClientError;
use clap::{Parser, error::ErrorKind};
use stdout_io::write_stdout_text;

const ROOT_HELP: &str = "Altscore - alternative credit scoring from transaction history

Usage:
  altscore <command>

Start here:
  altscore import create --help
  altscore score
  altscore db schema
";

const TOP_LEVEL_HELP: &str = "Altscore: alternative credit scoring from transaction history

USAGE: altscore <command>

Import your transactions:
  1. altscore import create --help                        Read import schema and workflow details
  2. altscore import create --dry-run <path>              Safely validate import without data writes
  3. altscore import create <path>                        Import transactions

Score your ledger:
  altscore score                                          Compute score, narrative, and save a report
  altscore score --no-narrative                           Compute and save without model calls
  altscore score --from 2026-01-01 --to 2026-06-30        Score a specific date window
  altscore factors                                        Preview the five factor scores only

Review past runs:
  altscore report list                                    List saved credit reports
  altscore import list                                    List past imports

Need to do custom analysis? Run SQL against our views:
  1. altscore db schema                                   Get DB path and view names
  2. altscore db schema view v1_transactions              Inspect one view's columns

Narrative generation uses Google Gemini and needs GOOGLE_GENAI_API_KEY
set in your environment. Scoring itself is fully local and works
without any key (use --no-narrative to skip model calls entirely).

Want to ensure a clean first run, or having issues/errors?
  Run `altscore import create --help` for import workflow guidance,
  or `altscore <command> --help` for command usage.
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
                if matches!(
                    err.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    if is_top_level_help_request(&raw_args) {
                        if write_stdout_text(TOP_LEVEL_HELP).is_err() {
                            return Err(ExitCode::from(2));
                        }
                    } else if write_stdout_text(&err.to_string()).is_err() {
                        return Err(ExitCode::from(2));
                    }
                } else if write_stdout_text(&err.to_string()).is_err() {
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

    let dispatched = dispatch::dispatch(&cli);
    match dispatched {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
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

/// Builds the subcommand path from raw CLI args for use in help hints.
///
/// Collects non-flag arguments after the binary name to form a command
/// string like "import create" or "db schema view".
fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let non_flags: Vec<&str> = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect();
    if non_flags.is_empty() {
        return None;
    }

    let hint = match non_flags.as_slice() {
        ["db", "schema", "view", ..] => Some("db schema view"),
        ["db", "schema", ..] => Some("db schema"),
        ["db", ..] => Some("db"),
        ["import", "create", ..] => Some("import create"),
        ["import", "list", ..] => Some("import list"),
        ["import", ..] => Some("import"),
        ["report", "list", ..] => Some("report list"),
        ["report", ..] => Some("report"),
        ["score", ..] => Some("score"),
        ["factors", ..] => Some("factors"),
        _ => None,
    };
    hint.map(std::string::ToString::to_string)
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
            "ledger_init_permission_denied"
                | "ledger_locked"
                | "ledger_corrupt"
                | "migration_failed"
                | "ledger_init_failed"
        )
}
