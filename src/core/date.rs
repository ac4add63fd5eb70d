// Rootline - core/date.rs
//
// Heuristic extraction of year / month / day from loosely formatted GEDCOM
// date strings ("ABT 1890", "BET 3 MAR 1850 AND 1860", "12 JUN 1901").
// Never fails: whatever subset of fields can be found is returned.

use crate::util::constants;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// The subset of a calendar date recoverable from a raw string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialDate {
    pub year: Option<i32>,
    /// 1-based month.
    pub month: Option<u32>,
    pub day: Option<u32>,
}

/// Three-letter month abbreviations in calendar order.
const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

fn qualifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?:ABT|ABOUT|EST|CAL|BEF|AFT|BET|AND|FROM|TO)\b")
            .expect("qualifier regex is valid")
    })
}

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{4})\b").expect("year regex is valid"))
}

fn month_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\b(JAN(?:UARY)?|FEB(?:RUARY)?|MAR(?:CH)?|APR(?:IL)?|MAY|JUNE?|JULY?|AUG(?:UST)?|SEPT?(?:EMBER)?|OCT(?:OBER)?|NOV(?:EMBER)?|DEC(?:EMBER)?)\b",
        )
        .expect("month regex is valid")
    })
}

/// Upper-cases, drops qualifiers, and turns slashes into spaces so that
/// dual-dated years ("1750/51") still leave a four-digit token behind.
fn clean(raw: &str) -> String {
    let upper = raw.to_uppercase().replace('/', " ");
    qualifier_re().replace_all(&upper, " ").trim().to_string()
}

/// Extracts whichever of year, month and day can be found.
///
/// The day is only looked for directly before the month token and must be
/// a 1-2 digit number in 1..=31.
pub fn parse_month_day_year(raw: Option<&str>) -> PartialDate {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return PartialDate::default();
    };
    let cleaned = clean(raw);

    let year = year_re()
        .captures(&cleaned)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok());

    let mut month = None;
    let mut day = None;
    if let Some(m) = month_re().find(&cleaned) {
        let abbrev = &m.as_str()[..3];
        month = MONTHS
            .iter()
            .position(|name| *name == abbrev)
            .map(|idx| idx as u32 + 1);

        day = cleaned[..m.start()]
            .split_whitespace()
            .last()
            .filter(|tok| (1..=2).contains(&tok.len()) && tok.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|tok| tok.parse::<u32>().ok())
            .filter(|d| (1..=31).contains(d));
    }

    PartialDate { year, month, day }
}

/// Sort key for a raw date: the year, plus `(month - 1) / 12` when a month
/// is present. Returns [`constants::UNKNOWN_DATE_SORT_KEY`] when no year
/// is found so undated events sort last.
pub fn comparable_date(raw: Option<&str>) -> f64 {
    let parts = parse_month_day_year(raw);
    match parts.year {
        Some(year) => {
            let offset = parts
                .month
                .map(|m| f64::from(m - 1) / 12.0)
                .unwrap_or(0.0);
            f64::from(year) + offset
        }
        None => constants::UNKNOWN_DATE_SORT_KEY,
    }
}

/// Long-form display date ("March 4, 1890").
///
/// Needs all of day, month and year, and a date that exists on the
/// calendar; otherwise the raw string is returned unchanged ("Undated"
/// when it is empty).
pub fn format_full_date(raw: Option<&str>) -> String {
    let fallback = || match raw {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => constants::UNDATED_LABEL.to_string(),
    };

    let PartialDate {
        year: Some(year),
        month: Some(month),
        day: Some(day),
    } = parse_month_day_year(raw)
    else {
        return fallback();
    };

    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => fallback(),
    }
}

/// First four-digit year in `raw`, as written. Used for birth/death years.
pub fn extract_year(raw: &str) -> Option<String> {
    year_re()
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
