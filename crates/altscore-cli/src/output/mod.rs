mod error_text;
mod format;
mod import_text;
mod json;
mod mode;
mod report_text;
mod schema_text;
mod score_text;

use std::io;

use altscore_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::write_stdout_line;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "score" => score_text::render_score(&success.data),
        "factors" => score_text::render_factors(&success.data),
        "import create" => import_text::render_import_run(&success.data),
        "import list" => import_text::render_import_list(&success.data),
        "report list" => report_text::render_report_list(&success.data),
        "db schema" => schema_text::render_schema_summary(&success.data),
        "db schema view" => schema_text::render_schema_view(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
