use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{error::ApiError, AppState},
    config,
    crawler::{
        street_insider::dividend::{self, DividendRecord},
        PageFetcher,
    },
    util::text,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendHistory {
    pub symbol: String,
    pub dividends: Vec<DividendRecord>,
}

pub async fn handle(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<DividendHistory>, ApiError> {
    let history = collect(
        state.fetcher.as_ref(),
        &state.settings.upstream.street_insider,
        state.settings.dividend.max_records,
        &symbol,
    )
    .await?;

    Ok(Json(history))
}

/// 抓取並整理股利紀錄，`max_records` 為 0 時不截斷
pub async fn collect(
    fetcher: &dyn PageFetcher,
    street_insider: &config::StreetInsider,
    max_records: usize,
    symbol: &str,
) -> Result<DividendHistory, ApiError> {
    let symbol = text::non_blank(symbol)
        .ok_or_else(|| ApiError::ClientInput("symbol is required".to_string()))?;

    let url = dividend::dividend_url(&street_insider.url, symbol);
    let html = fetcher
        .fetch(&url)
        .await
        .map_err(ApiError::upstream_fetch)?;
    let mut dividends = dividend::parse_records(&html, &street_insider.cell_selector)
        .map_err(ApiError::upstream_parse)?;

    if dividends.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No dividend records found for {}",
            symbol
        )));
    }

    if max_records > 0 {
        dividends.truncate(max_records);
    }

    Ok(DividendHistory {
        symbol: symbol.to_string(),
        dividends,
    })
}
