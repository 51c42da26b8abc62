//! Date helpers for post dates and sitemap `lastmod` values.

use chrono::{DateTime, Local, NaiveDate, Utc};
use regex::Regex;
use std::{sync::LazyLock, time::SystemTime};

static RE_DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap());

/// Parse `YYYY-MM-DD` (optionally followed by `T...`) as UTC midnight.
///
/// The time part, if any, is ignored.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let day = s.trim().split('T').next()?;
    let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// First valid `YYYY-MM-DD` embedded in a name like `2024-03-01-hello`.
pub fn date_in_name(name: &str) -> Option<DateTime<Utc>> {
    RE_DATE.find_iter(name).find_map(|m| parse_date(m.as_str()))
}

/// Local calendar date of a file timestamp, as `YYYY-MM-DD`.
pub fn local_ymd(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%Y-%m-%d").to_string()
}
