//! Parsing helpers for dates, part specs and timezones.

use chrono::{DateTime, NaiveDate};

use carlog_core::NewPart;

use crate::errors::CliError;

/// Parse a calendar date (YYYY-MM-DD or an RFC 3339 timestamp).
pub fn parse_date(value: &str) -> anyhow::Result<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.date_naive());
    }
    Err(CliError::invalid_input(format!(
        "Invalid date (expected YYYY-MM-DD): {}",
        value
    ))
    .into())
}

/// Parse a `--part` value: `NAME[:WARRANTY_MONTHS[:WARRANTY_KM]]`.
///
/// Empty segments are skipped, so `Filter::10000` sets only the km warranty.
pub fn parse_part_spec(spec: &str) -> anyhow::Result<NewPart> {
    let mut segments = spec.split(':').map(str::trim);
    let name = segments.next().unwrap_or_default();
    if name.is_empty() {
        return Err(CliError::invalid_input(format!("Part name is empty in '{}'", spec)).into());
    }

    let mut part = NewPart::new(name);
    if let Some(months) = segments.next().filter(|s| !s.is_empty()) {
        part = part.with_warranty_months(parse_number(months, "warranty months", spec)?);
    }
    if let Some(km) = segments.next().filter(|s| !s.is_empty()) {
        part.warranty_km = Some(parse_number(km, "warranty km", spec)?);
    }
    if segments.next().is_some() {
        return Err(CliError::invalid_input(format!(
            "Too many ':' segments in part '{}' (expected NAME[:MONTHS[:KM]])",
            spec
        ))
        .into());
    }
    Ok(part)
}

fn parse_number(value: &str, what: &str, spec: &str) -> anyhow::Result<u32> {
    value.parse().map_err(|_| {
        CliError::invalid_input(format!("Invalid {} '{}' in part '{}'", what, value, spec)).into()
    })
}

/// Validate an IANA timezone name. Empty or `auto` means no override.
pub fn parse_timezone(value: &str) -> anyhow::Result<Option<String>> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }

    let tz = trimmed
        .parse::<chrono_tz::Tz>()
        .map_err(|_| CliError::invalid_input(format!("Invalid timezone: {}", trimmed)))?;
    Ok(Some(tz.to_string()))
}
