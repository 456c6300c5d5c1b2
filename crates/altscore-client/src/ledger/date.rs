use chrono::NaiveDate;

use crate::ledger::types::LedgerFilter;
use crate::{ClientError, ClientResult};

pub fn build_filter(
    from: Option<&str>,
    to: Option<&str>,
    command: &str,
) -> ClientResult<LedgerFilter> {
    let parsed_from = match from {
        Some(value) => Some(parse_iso_date_strict(value, "from", command)?),
        None => None,
    };
    let parsed_to = match to {
        Some(value) => Some(parse_iso_date_strict(value, "to", command)?),
        None => None,
    };

    if let (Some(start), Some(end)) = (parsed_from, parsed_to)
        && start > end
    {
        return Err(ClientError::invalid_argument_for_command(
            "Invalid date range: `from` must be on or before `to`.",
            Some(command),
        ));
    }

    Ok(LedgerFilter {
        from: parsed_from,
        to: parsed_to,
    })
}

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_transaction_date(value: &str) -> Option<NaiveDate> {
    if !looks_like_iso_date(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn parse_iso_date_strict(value: &str, field_name: &str, command: &str) -> ClientResult<NaiveDate> {
    if !looks_like_iso_date(value) {
        return Err(ClientError::invalid_argument_for_command(
            &format!("`{field_name}` must use YYYY-MM-DD format with a real calendar date."),
            Some(command),
        ));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ClientError::invalid_argument_for_command(
            &format!("`{field_name}` must use YYYY-MM-DD format with valid calendar values."),
            Some(command),
        )
    })
}

fn looks_like_iso_date(value: &str) -> bool {
    if value.len() != 10 {
        return false;
    }
    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return false;
        }
    }
    true
}
