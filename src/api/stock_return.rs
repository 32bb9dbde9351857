use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    api::{error::ApiError, AppState},
    calculation::price_return,
    calendar, config,
    crawler::{yahoo::history, PageFetcher},
    util::{datetime, text},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnResult {
    pub symbol: String,
    /// 換算後的起始交易日
    pub start_date: NaiveDate,
    /// 換算後的結束交易日
    pub end_date: NaiveDate,
    /// 固定兩位小數，例如 `"10.00"`
    pub return_percentage: String,
}

pub async fn handle(
    State(state): State<AppState>,
    Path((symbol, first_date, second_date)): Path<(String, String, String)>,
) -> Result<Json<ReturnResult>, ApiError> {
    let result = calculate(
        state.fetcher.as_ref(),
        &state.settings.upstream.yahoo,
        &symbol,
        &first_date,
        &second_date,
    )
    .await?;

    Ok(Json(result))
}

/// 驗證參數 → 換算交易日 → 抓取 → 掃描 → 計算
pub async fn calculate(
    fetcher: &dyn PageFetcher,
    yahoo: &config::Yahoo,
    symbol: &str,
    first_date: &str,
    second_date: &str,
) -> Result<ReturnResult, ApiError> {
    let symbol = text::non_blank(symbol)
        .ok_or_else(|| ApiError::ClientInput("symbol is required".to_string()))?;
    let start_date = calendar::last_trading_day(parse_date_param("firstDate", first_date)?);
    let end_date = calendar::last_trading_day(parse_date_param("secondDate", second_date)?);

    let url = history::history_url(&yahoo.base_url, symbol, start_date, end_date);
    let html = fetcher
        .fetch(&url)
        .await
        .map_err(ApiError::upstream_fetch)?;
    let rows = history::parse_price_rows(&html, &yahoo.row_selector, yahoo.price_column)
        .map_err(ApiError::upstream_parse)?;

    let (start_price, end_price) = price_return::find_prices(&rows, start_date, end_date);
    let percentage = match (start_price, end_price) {
        (Some(start), Some(end)) if !start.is_zero() && !end.is_zero() => {
            price_return::percentage_change(start, end)
        }
        _ => None,
    }
    .ok_or_else(|| {
        ApiError::NotFound(format!(
            "Start date {} or end date {} not found for {}",
            start_date, end_date, symbol
        ))
    })?;

    Ok(ReturnResult {
        symbol: symbol.to_string(),
        start_date,
        end_date,
        return_percentage: percentage.to_string(),
    })
}

fn parse_date_param(name: &str, value: &str) -> Result<NaiveDate, ApiError> {
    if text::non_blank(value).is_none() {
        return Err(ApiError::ClientInput(format!("{} is required", name)));
    }

    datetime::parse_api_date(value).ok_or_else(|| {
        ApiError::ClientInput(format!(
            "{} '{}' is not a valid date, expected YYYY-MM-DD",
            name, value
        ))
    })
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use axum::{routing::get, Router};
    use reqwest::StatusCode;
    use tokio::net::TcpListener;

    use crate::{
        api::tests::{serve, StubFetcher},
        crawler::HttpFetcher,
        util::http::get_client,
    };

    use super::*;

    // Open 與 Close 刻意不同，確認取的是收盤價
    const HISTORY: &str = r#"
        <table><tbody>
            <tr class="svelte-ewueuo"><td>Apr 5, 2024</td><td>200.00</td><td>201.00</td>
                <td>108.00</td><td>110.00</td><td>110.00</td><td>1,000</td></tr>
            <tr class="svelte-ewueuo"><td>Apr 4, 2024</td><td>150.00</td><td>151.00</td>
                <td>103.00</td><td>104.00</td><td>104.00</td><td>1,000</td></tr>
            <tr class="svelte-ewueuo"><td>Mar 28, 2024</td><td>100.00</td><td>101.00</td>
                <td>99.00</td><td>100.00</td><td>100.00</td><td>1,000</td></tr>
            <tr class="svelte-ewueuo"><td>Mar 27, 2024</td><td>98.00</td><td>99.00</td>
                <td>97.00</td><td>0</td><td>0</td><td>1,000</td></tr>
        </tbody></table>
    "#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stub() -> StubFetcher {
        StubFetcher::new(&[("/quote/AAPL/history/", HISTORY)])
    }

    #[tokio::test]
    async fn test_calculate() {
        let result = calculate(
            &stub(),
            &config::Yahoo::default(),
            "AAPL",
            "2024-03-28",
            "2024-04-05",
        )
        .await
        .unwrap();

        assert_eq!(
            result,
            ReturnResult {
                symbol: "AAPL".to_string(),
                start_date: date(2024, 3, 28),
                end_date: date(2024, 4, 5),
                return_percentage: "10.00".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_calculate_resolves_weekend_and_holiday() {
        // 2024-03-29 是 Good Friday，2024-04-06 是週六
        let result = calculate(
            &stub(),
            &config::Yahoo::default(),
            "AAPL",
            "2024-03-29",
            "2024-04-06",
        )
        .await
        .unwrap();

        assert_eq!(result.start_date, date(2024, 3, 28));
        assert_eq!(result.end_date, date(2024, 4, 5));
        assert_eq!(result.return_percentage, "10.00");
    }

    #[tokio::test]
    async fn test_calculate_negative() {
        let result = calculate(
            &stub(),
            &config::Yahoo::default(),
            "AAPL",
            "2024-04-05",
            "2024-04-04",
        )
        .await
        .unwrap();

        assert_eq!(result.return_percentage, "-5.45");
    }

    #[tokio::test]
    async fn test_calculate_start_not_found() {
        let err = calculate(
            &stub(),
            &config::Yahoo::default(),
            "AAPL",
            "2024-04-01",
            "2024-04-05",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_calculate_zero_price_is_not_found() {
        let err = calculate(
            &stub(),
            &config::Yahoo::default(),
            "AAPL",
            "2024-03-27",
            "2024-04-05",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_calculate_bad_input() {
        let yahoo = config::Yahoo::default();
        for (symbol, first, second) in [
            (" ", "2024-03-28", "2024-04-05"),
            ("AAPL", "", "2024-04-05"),
            ("AAPL", "2024-03-28", "April 5"),
        ] {
            let err = calculate(&stub(), &yahoo, symbol, first, second)
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::ClientInput(_)), "{:?}", err);
        }
    }

    #[tokio::test]
    async fn test_calculate_upstream_failure() {
        let err = calculate(
            &stub(),
            &config::Yahoo::default(),
            "MSFT",
            "2024-03-28",
            "2024-04-05",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::UpstreamFetch(_)));
    }

    #[tokio::test]
    async fn test_calculate_bad_selector() {
        let yahoo = config::Yahoo {
            row_selector: "tbody tr[".to_string(),
            ..Default::default()
        };
        let err = calculate(&stub(), &yahoo, "AAPL", "2024-03-28", "2024-04-05")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::UpstreamParse(_)));
    }

    #[tokio::test]
    async fn test_route() {
        let mut settings = config::App::default();
        settings.server.path_prefix = "/api".to_string();
        let base = serve(settings, Arc::new(stub())).await;
        let client = get_client().unwrap();

        let res = client
            .get(format!("{}/api/return/AAPL/2024-03-28/2024-04-05", base))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&res.text().await.unwrap()).unwrap();
        assert_eq!(body["symbol"], "AAPL");
        assert_eq!(body["startDate"], "2024-03-28");
        assert_eq!(body["endDate"], "2024-04-05");
        assert_eq!(body["returnPercentage"], "10.00");

        let res = client
            .get(format!("{}/api/return/AAPL/2024-04-01/2024-04-05", base))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = client
            .get(format!("{}/api/return/AAPL/yesterday/2024-04-05", base))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_route_upstream_timeout() {
        let upstream = Router::new().route(
            "/quote/{symbol}/history/",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                HISTORY
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let upstream_addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, upstream).await.unwrap();
        });

        let mut settings = config::App::default();
        settings.server.path_prefix = "/api".to_string();
        settings.upstream.timeout_ms = 200;
        settings.upstream.yahoo.base_url = format!("http://{}", upstream_addr);
        let fetcher = HttpFetcher::new(&settings.upstream).unwrap();
        let base = serve(settings, Arc::new(fetcher)).await;

        let res = get_client()
            .unwrap()
            .get(format!("{}/api/return/AAPL/2024-03-28/2024-04-05", base))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_str(&res.text().await.unwrap()).unwrap();
        assert_eq!(body["error"], "Upstream request failed");
        assert!(body["detail"].as_str().unwrap().contains("timed out"));
    }
}
