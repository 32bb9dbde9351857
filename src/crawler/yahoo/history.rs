use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use scraper::Html;
use urlencoding::encode;

use crate::util::{datetime, http::element, text};

/// 歷史股價表格中的一列，只在掃描期間存在
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub date: NaiveDate,
    /// 無法解析的價格記為 0
    pub price: Decimal,
}

/// 組出涵蓋 `start` 與 `end` 兩天的歷史股價網址，日期前後顛倒時以較早的日期為起點
pub fn history_url(base_url: &str, stock_symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
    let (from, to) = if start <= end { (start, end) } else { (end, start) };
    format!(
        "{base}/quote/{symbol}/history/?period1={period1}&period2={period2}",
        base = base_url.trim_end_matches('/'),
        symbol = encode(stock_symbol),
        period1 = datetime::to_unix_timestamp(from),
        period2 = datetime::to_unix_timestamp_plus_a_day(to)
    )
}

/// 解析歷史股價頁面。
///
/// 第 0 欄是日期，`price_column` 欄是價格。日期無法辨識的列 (股利、分割公告等) 直接略過。
pub fn parse_price_rows(
    html: &str,
    row_selector: &str,
    price_column: usize,
) -> Result<Vec<PriceRow>> {
    let document = Html::parse_document(html);
    let rows = element::select_rows(&document, row_selector)?;

    Ok(rows
        .iter()
        .filter_map(|cells| {
            let date = datetime::parse_history_date(cells.first()?)?;
            let price = cells
                .get(price_column)
                .and_then(|p| text::parse_decimal(p, None).ok())
                .unwrap_or(Decimal::ZERO);
            Some(PriceRow { date, price })
        })
        .collect())
}
