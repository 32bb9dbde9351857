//! # Yahoo 財經採集模組
//!
//! 從 Yahoo Finance 的歷史股價頁面抓取每日價格。
//!
//! - 來源：`finance.yahoo.com/quote/{symbol}/history/`
//! - 抓取技術：HTTP GET 搭配 CSS Selector 依欄位位置解析，頁面改版時只會抓不到資料。

/// 歷史股價採集子模組
pub mod history;
