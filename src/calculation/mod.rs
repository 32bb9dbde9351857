/// 兩個交易日之間的漲跌幅
pub mod price_return;
