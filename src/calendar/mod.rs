//! # 交易日換算
//!
//! 使用者輸入的日期可能是週末或休市日，歷史股價表裡不會有那一天的資料，
//! 因此在比對前先換算成資料來源認得的交易日。

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};

use crate::util::datetime::Weekend;

pub mod holiday;

/// Maps `date` to the trading day whose row the history page will carry.
///
/// * a weekday that is not a market holiday is returned unchanged;
/// * Saturday and Sunday map to the Friday right before, or to an earlier Friday
///   when that one is a market holiday;
/// * a weekday holiday maps to the closest earlier business day that is not a holiday.
///
/// Never fails.
pub fn last_trading_day(date: NaiveDate) -> NaiveDate {
    if date.is_weekend() {
        let mut friday = previous_friday(date);
        while holiday::is_market_holiday(friday) {
            match friday.checked_sub_signed(TimeDelta::weeks(1)) {
                Some(prev) => friday = prev,
                None => break,
            }
        }
        return friday;
    }

    let mut day = date;
    while day.is_weekend() || holiday::is_market_holiday(day) {
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => return date,
        }
    }

    day
}

fn previous_friday(date: NaiveDate) -> NaiveDate {
    let back = match date.weekday() {
        Weekday::Sat => 1,
        Weekday::Sun => 2,
        _ => 0,
    };

    date.checked_sub_signed(TimeDelta::days(back))
        .unwrap_or(date)
}
