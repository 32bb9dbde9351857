//! 美股 (NYSE) 全日休市的固定規則

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};

/// Juneteenth 自 2022 年起成為休市日
const JUNETEENTH_SINCE: i32 = 2022;

/// Returns `true` when the US equity market is closed all day on `date`.
///
/// Weekends are not reported here; callers combine this with
/// [`crate::util::datetime::Weekend`].
pub fn is_market_holiday(date: NaiveDate) -> bool {
    holidays_of(date.year()).contains(&date)
}

/// All full-day closures that fall inside `year`.
pub fn holidays_of(year: i32) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(10);

    if let Some(d) = new_years_day_observed(year).filter(|d| d.year() == year) {
        days.push(d);
    }

    days.extend(nth_weekday(year, 1, Weekday::Mon, 3));
    days.extend(nth_weekday(year, 2, Weekday::Mon, 3));
    days.extend(easter_sunday(year).map(|d| d - TimeDelta::days(2)));
    days.extend(last_weekday(year, 5, Weekday::Mon));

    if year >= JUNETEENTH_SINCE {
        days.extend(ymd(year, 6, 19).map(observed));
    }

    days.extend(ymd(year, 7, 4).map(observed));
    days.extend(nth_weekday(year, 9, Weekday::Mon, 1));
    days.extend(nth_weekday(year, 11, Weekday::Thu, 4));
    days.extend(ymd(year, 12, 25).map(observed));

    days
}

/// 元旦：週日補到週一，週六不補假 (不會把前一年的 12/31 變成休市)
fn new_years_day_observed(year: i32) -> Option<NaiveDate> {
    let day = ymd(year, 1, 1)?;
    match day.weekday() {
        Weekday::Sat => None,
        Weekday::Sun => Some(day + TimeDelta::days(1)),
        _ => Some(day),
    }
}

/// 固定日期的假日：週六提前到週五，週日延後到週一
fn observed(day: NaiveDate) -> NaiveDate {
    match day.weekday() {
        Weekday::Sat => day - TimeDelta::days(1),
        Weekday::Sun => day + TimeDelta::days(1),
        _ => day,
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        ymd(year + 1, 1, 1)?
    } else {
        ymd(year, month + 1, 1)?
    };

    let mut day = first_of_next.pred_opt()?;
    while day.weekday() != weekday {
        day = day.pred_opt()?;
    }

    Some(day)
}

/// Gregorian Easter Sunday (anonymous Gregorian algorithm).
fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    ymd(year, month as u32, day as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_easter_sunday() {
        assert_eq!(easter_sunday(2024), Some(date(2024, 3, 31)));
        assert_eq!(easter_sunday(2025), Some(date(2025, 4, 20)));
        assert_eq!(easter_sunday(2019), Some(date(2019, 4, 21)));
    }

    #[test]
    fn test_holidays_2024() {
        let expected = vec![
            date(2024, 1, 1),
            date(2024, 1, 15),
            date(2024, 2, 19),
            date(2024, 3, 29),
            date(2024, 5, 27),
            date(2024, 6, 19),
            date(2024, 7, 4),
            date(2024, 9, 2),
            date(2024, 11, 28),
            date(2024, 12, 25),
        ];
        assert_eq!(holidays_of(2024), expected);
    }

    #[test]
    fn test_observed_rules() {
        // 2022-01-01 是週六，不補假
        assert!(!is_market_holiday(date(2021, 12, 31)));
        // 2023-01-01 是週日，補到 1/2
        assert!(is_market_holiday(date(2023, 1, 2)));
        // 2026-07-04 是週六，提前到 7/3
        assert!(is_market_holiday(date(2026, 7, 3)));
        // 2021 年還沒有 Juneteenth
        assert!(!is_market_holiday(date(2021, 6, 18)));
        assert!(is_market_holiday(date(2022, 6, 20)));
        assert!(!is_market_holiday(date(2024, 4, 8)));
    }
}
