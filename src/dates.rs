// Date range formatting for item headings

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Label used for a missing end date when the caller doesn't pick one.
pub const DEFAULT_ONGOING_LABEL: &str = "Present";

/// Parses the date shapes profile data arrives in: plain ISO dates,
/// ISO timestamps (with or without offset) and bare year-month values.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y/%m/%d") {
        return Some(date);
    }
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok()
}

/// Formats a `start - end` range such as `Jan 2020 - Jun 2021`.
///
/// Each side renders as abbreviated month plus four-digit year; a side that
/// doesn't parse is shown as written. A missing end becomes `ongoing_label`
/// when there is a start. A missing start yields the end alone, with no
/// "until" wording.
pub fn format_date_range(start: Option<&str>, end: Option<&str>, ongoing_label: &str) -> String {
    let start = format_side(start);
    let end = if is_blank(end) {
        if start.is_some() && !ongoing_label.trim().is_empty() {
            Some(ongoing_label.trim().to_string())
        } else {
            None
        }
    } else {
        format_side(end)
    };

    match (start, end) {
        (None, None) => String::new(),
        (Some(start), None) => start,
        (None, Some(end)) => end,
        (Some(start), Some(end)) => format!("{start} - {end}"),
    }
}

fn format_side(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(match parse_date(raw) {
        Some(date) => date.format("%b %Y").to_string(),
        None => raw.to_string(),
    })
}

fn is_blank(raw: Option<&str>) -> bool {
    raw.map_or(true, |s| s.trim().is_empty())
}
