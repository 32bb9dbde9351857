use anyhow::Result;
use scraper::Html;
use serde::{Deserialize, Serialize};
use urlencoding::encode;

use crate::util::http::element;

/// 來源表格每列的欄數
pub const COLUMNS_PER_ROW: usize = 9;

/// 每列中要保留的欄位位置
const EX_DIV_DATE: usize = 0;
const AMOUNT: usize = 1;
const DECLARATION_DATE: usize = 5;
const RECORD_DATE: usize = 6;
const PAYMENT_DATE: usize = 7;

/// 一筆股利紀錄，欄位內容維持網頁上的原始文字
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendRecord {
    /// 除息日
    #[serde(rename = "ExDivDate")]
    pub ex_dividend_date: String,
    /// 每股金額
    #[serde(rename = "Amount")]
    pub amount: String,
    /// 宣告日
    #[serde(rename = "DeclarationDate")]
    pub declaration_date: String,
    /// 登記日
    #[serde(rename = "RecordDate")]
    pub record_date: String,
    /// 發放日
    #[serde(rename = "PaymentDate")]
    pub payment_date: String,
}

impl DividendRecord {
    fn from_row(row: &[String]) -> Self {
        DividendRecord {
            ex_dividend_date: row[EX_DIV_DATE].clone(),
            amount: row[AMOUNT].clone(),
            declaration_date: row[DECLARATION_DATE].clone(),
            record_date: row[RECORD_DATE].clone(),
            payment_date: row[PAYMENT_DATE].clone(),
        }
    }
}

pub fn dividend_url(base_url: &str, stock_symbol: &str) -> String {
    format!("{}?q={}", base_url, encode(stock_symbol))
}

/// 解析股利歷史頁面：攤平所有符合 `cell_selector` 的儲存格後切成紀錄
pub fn parse_records(html: &str, cell_selector: &str) -> Result<Vec<DividendRecord>> {
    let document = Html::parse_document(html);
    let cells = element::select_texts(&document, cell_selector)?;

    Ok(chunk_records(&cells))
}

/// 把攤平的儲存格依 [`COLUMNS_PER_ROW`] 切成紀錄，最後不足一列的部份直接捨棄
pub fn chunk_records(cells: &[String]) -> Vec<DividendRecord> {
    cells
        .chunks_exact(COLUMNS_PER_ROW)
        .map(DividendRecord::from_row)
        .collect()
}
