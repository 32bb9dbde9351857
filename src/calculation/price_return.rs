use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::crawler::yahoo::history::PriceRow;

/// 掃描所有列，取出兩個日期各自的價格。
///
/// 同一天出現多列時以最後掃到的為準。
pub fn find_prices(
    rows: &[PriceRow],
    start: NaiveDate,
    end: NaiveDate,
) -> (Option<Decimal>, Option<Decimal>) {
    let mut start_price = None;
    let mut end_price = None;

    for row in rows {
        if row.date == start {
            start_price = Some(row.price);
        }

        if row.date == end {
            end_price = Some(row.price);
        }
    }

    (start_price, end_price)
}

/// `(end - start) / start * 100`，四捨五入到小數第 2 位。起始價格為 0 時回傳 `None`。
pub fn percentage_change(start: Decimal, end: Decimal) -> Option<Decimal> {
    if start.is_zero() {
        return None;
    }

    let change = (end - start).checked_div(start)?.checked_mul(dec!(100))?;
    let mut rounded = change.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    Some(rounded)
}
