//! Employment duration normalization
//!
//! Résumés describe tenure as free text ("Jan 2019 – Present", "03/2017 - 08/2020",
//! "2015 - 2018"). This module turns such ranges into whole-month counts at
//! month granularity and renders totals as `"<y>y <m>m"`.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

static OPEN_ENDED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)present|current|till now").expect("valid open-ended regex"));

static MONTH_SLASH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})\s*[/.]\s*(\d{4})\b").expect("valid month/year regex")
});

static YEAR_SLASH_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4})\s*[/.]\s*(\d{1,2})\b").expect("valid year/month regex")
});

static FULL_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\b").expect("valid year regex"));

static SHORT_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"['’](\d{2})\b").expect("valid short year regex"));

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+").expect("valid word regex"));

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

/// Month count of a date range as a string, or `""` when any part of the
/// range cannot be understood.
pub fn months_between(range: &str, today: NaiveDate) -> String {
    parse_months(range, today)
        .map(|months| months.to_string())
        .unwrap_or_default()
}

/// Month count of a date range. Negative when the range runs backwards.
pub fn parse_months(range: &str, today: NaiveDate) -> Option<i32> {
    let normalized = range.replace(['—', '–'], "-");
    let (start, end) = normalized.split_once('-')?;
    let (start, end) = (start.trim(), end.trim());

    let start_date = fuzzy_parse_date(start, today)?;
    let end_date = if OPEN_ENDED.is_match(end) {
        today
    } else {
        fuzzy_parse_date(end, today)?
    };

    Some(month_index(end_date) - month_index(start_date))
}

/// Best-effort calendar date in free text. The day of month is not
/// interpreted; a missing month or year is taken from `reference`.
pub fn fuzzy_parse_date(token: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if let Some(caps) = MONTH_SLASH_YEAR.captures(token) {
        (caps[2].parse().ok(), caps[1].parse().ok())
    } else if let Some(caps) = YEAR_SLASH_MONTH.captures(token) {
        (caps[1].parse().ok(), caps[2].parse().ok())
    } else {
        (find_year(token), find_month_name(token))
    };

    if year.is_none() && month.is_none() {
        return None;
    }

    let year = year.unwrap_or_else(|| reference.year());
    let month = month.unwrap_or_else(|| reference.month());
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn find_year(token: &str) -> Option<i32> {
    if let Some(caps) = FULL_YEAR.captures(token) {
        return caps[1].parse().ok();
    }
    SHORT_YEAR
        .captures(token)
        .and_then(|caps| caps[1].parse::<i32>().ok())
        .map(|short| 2000 + short)
}

fn find_month_name(token: &str) -> Option<u32> {
    WORD.find_iter(token).find_map(|word| {
        let word = word.as_str().to_lowercase();
        if word.len() < 3 {
            return None;
        }
        MONTHS
            .iter()
            .position(|month| month.starts_with(&word))
            .map(|index| index as u32 + 1)
    })
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

/// Render a month count as `"<y>y <m>m"`, dropping the year part when zero.
pub fn fmt_ym(months: u32) -> String {
    let (years, rest) = (months / 12, months % 12);
    if years > 0 {
        format!("{}y {}m", years, rest)
    } else {
        format!("{}m", rest)
    }
}
