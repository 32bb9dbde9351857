use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};

/// 呼叫端傳入的日期格式
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// 歷史股價表格日期欄位可能出現的格式，依序嘗試
const HISTORY_DATE_FORMATS: [&str; 4] = ["%b %d, %Y", "%B %d, %Y", "%Y-%m-%d", "%m/%d/%Y"];

/// A trait representing the weekend concept.
pub trait Weekend {
    /// Returns `true` if the date is on a Saturday or Sunday, and `false` otherwise.
    fn is_weekend(&self) -> bool;
}

impl Weekend for NaiveDate {
    fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

/// Parses a `YYYY-MM-DD` path argument.
pub fn parse_api_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), API_DATE_FORMAT).ok()
}

/// Normalizes the text of a history-table date cell (e.g. `Apr 5, 2024`) into a date
/// comparable with the caller's argument. Returns `None` for anything that is not a
/// date, such as a dividend or split notice row.
pub fn parse_history_date(cell: &str) -> Option<NaiveDate> {
    let text = cell.trim();
    if text.is_empty() {
        return None;
    }

    HISTORY_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Seconds since the Unix epoch at midnight UTC of `date`.
pub fn to_unix_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// Same as [`to_unix_timestamp`] for the following day, so a history window ending
/// on `date` still includes that day's row.
pub fn to_unix_timestamp_plus_a_day(date: NaiveDate) -> i64 {
    to_unix_timestamp(date) + TimeDelta::days(1).num_seconds()
}
