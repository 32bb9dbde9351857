//! # StreetInsider 股利歷史採集模組
//!
//! 股利歷史頁面是一張 9 欄的表格，這裡把所有 `td` 攤平成一串文字後再依固定欄數切回紀錄。

/// 股利歷史採集子模組
pub mod dividend;
