use std::{collections::HashSet, str::FromStr};

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;

/// 網頁上的數字常見的千分位、貨幣符號與空白
const NUMBER_ESCAPE_CHAR: &[char] = &['$', '%', ',', ' ', '"', '\n', '\t', '\u{a0}'];

/// Parses a decimal value from a given string.
///
/// The string may carry thousands separators, a currency sign or surrounding
/// whitespace; those are stripped before parsing. Additional characters to strip can
/// be passed in `escape_chars`.
///
/// # Example
///
/// ```ignore
/// use crate::util::text::parse_decimal;
///
/// let value = parse_decimal("$1,234.56", None).unwrap();
/// assert_eq!(value.to_string(), "1234.56");
/// ```
pub fn parse_decimal(s: &str, escape_chars: Option<Vec<char>>) -> Result<Decimal> {
    let cleaned = clean_escape_chars(s, escape_chars);
    Decimal::from_str(&cleaned)
        .map_err(|why| anyhow!("Failed to parse '{}' as Decimal because {:?}", cleaned, why))
}

/// Removes a set of escape characters from a given string.
pub(crate) fn clean_escape_chars(s: &str, escape_chars: Option<Vec<char>>) -> String {
    let mut combined: Vec<char> = NUMBER_ESCAPE_CHAR.to_vec();
    if let Some(ec) = escape_chars {
        combined.extend(ec);
    }

    let filters = combined.iter().collect::<HashSet<_>>();
    s.chars().filter(|c| !filters.contains(c)).collect()
}

/// 回傳去頭尾空白後的字串，空字串視為沒有值
pub fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
