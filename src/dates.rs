//! Free-text date parsing.
//!
//! News pages print publication dates in many shapes. [`parse_date`] tries a
//! fixed, ordered list of templates and returns the first one that matches
//! the whole (trimmed) input. Ambiguous numeric dates such as `01/02/2024`
//! are therefore resolved by template order: day first.
//!
//! Years must have exactly four digits. chrono's `%Y` also takes shorter
//! years, which would read `14/11/24` as year 24 or a version like `1.2.3`
//! as a date.
//!
//! Month names are accepted in English (full or abbreviated, any case) and
//! in Italian; Italian names are rewritten to English before parsing.

use chrono::{Datelike, NaiveDate};
use std::ops::RangeInclusive;
use once_cell::sync::Lazy;
use regex::Regex;

/// Templates tried in order by [`parse_date`].
pub const DATE_FORMATS: [&str; 8] = [
    "%d/%m/%Y",
    "%d %B %Y",
    "%Y-%m-%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d.%m.%Y",
    "%d-%m-%Y",
    "%Y/%m/%d",
];

const FOUR_DIGIT_YEARS: RangeInclusive<i32> = 1000..=9999;

/// Shapes searched for in free text when no element holds a clean date.
static DATE_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"\b\d{1,2}/\d{1,2}/\d{4}\b").unwrap(),
        Regex::new(r"\b\d{1,2} \w+ \d{4}\b").unwrap(),
        Regex::new(r"\b\w+ \d{1,2}, \d{4}\b").unwrap(),
    ]
});

static ITALIAN_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(gennaio|febbraio|marzo|aprile|maggio|giugno|luglio|agosto|settembre|ottobre|novembre|dicembre)\b",
    )
    .unwrap()
});

fn english_month(italian: &str) -> &'static str {
    match italian.to_lowercase().as_str() {
        "gennaio" => "January",
        "febbraio" => "February",
        "marzo" => "March",
        "aprile" => "April",
        "maggio" => "May",
        "giugno" => "June",
        "luglio" => "July",
        "agosto" => "August",
        "settembre" => "September",
        "ottobre" => "October",
        "novembre" => "November",
        _ => "December",
    }
}

/// Parse a date string against [`DATE_FORMATS`].
///
/// Returns `None` when no template matches the entire input.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_date("14/11/2024"), NaiveDate::from_ymd_opt(2024, 11, 14));
/// assert_eq!(parse_date("Nov 14, 2024"), NaiveDate::from_ymd_opt(2024, 11, 14));
/// assert_eq!(parse_date("yesterday"), None);
/// ```
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let normalized = ITALIAN_MONTH.replace_all(text, |caps: &regex::Captures| {
        english_month(&caps[1]).to_string()
    });

    DATE_FORMATS
        .iter()
        .find_map(|fmt| {
            NaiveDate::parse_from_str(&normalized, fmt)
                .ok()
                .filter(|date| FOUR_DIGIT_YEARS.contains(&date.year()))
        })
}

/// Find the first date-shaped substring of `text` that also parses.
///
/// Patterns are tried in order; within a pattern, matches are tried from
/// left to right.
pub fn find_date_in_text(text: &str) -> Option<NaiveDate> {
    DATE_PATTERNS.iter().find_map(|pattern| {
        pattern
            .find_iter(text)
            .find_map(|m| parse_date(m.as_str()))
    })
}
