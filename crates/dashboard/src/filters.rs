//! Custom Askama template filters.
//!
//! Route modules opt in with `use crate::filters;` next to their
//! template structs.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Renders a timestamp as `01 March 25 08:30:05`.
///
/// Accepts RFC 3339 (the upstream session records) or a bare
/// `YYYY-MM-DDTHH:MM:SS`. Anything unparseable renders as `-`.
///
/// Usage in templates: `{{ record.login_time|format_datetime }}`
#[askama::filter_fn]
pub fn format_datetime(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(render_datetime(&value.to_string()))
}

/// Renders an ISO date (`YYYY-MM-DD`) as `01 March 2025`.
///
/// Anything unparseable renders as `-`.
///
/// Usage in templates: `{{ message.date|format_date }}`
#[askama::filter_fn]
pub fn format_date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(render_date(&value.to_string()))
}

fn render_datetime(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%d %B %y %I:%M:%S").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return parsed.format("%d %B %y %I:%M:%S").to_string();
    }
    "-".to_string()
}

fn render_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_or_else(
        |_| "-".to_string(),
        |parsed| parsed.format("%d %B %Y").to_string(),
    )
}
