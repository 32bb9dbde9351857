//! # HTTP 介面
//!
//! 所有路由都掛在設定的 `path_prefix` 之下：
//!
//! - `GET /` 歡迎訊息
//! - `GET /return/{symbol}/{firstDate}/{secondDate}` 兩個交易日之間的漲跌幅
//! - `GET /dividend/{symbol}` 股利歷史
//!
//! 所有回應都帶 CORS 標頭，`OPTIONS` 在進入路由前直接回 200。

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::{config, crawler::PageFetcher};

pub mod dividend;
pub mod error;
pub mod stock_return;

use error::ApiError;

pub const WELCOME: &str = "Welcome to the stock information API";

/// 每個請求共用、唯讀的狀態
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<config::App>,
    pub fetcher: Arc<dyn PageFetcher>,
}

impl AppState {
    pub fn new(settings: Arc<config::App>, fetcher: Arc<dyn PageFetcher>) -> Self {
        AppState { settings, fetcher }
    }
}

/// 事先把設定轉成標頭值，避免每個請求重覆檢查
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_origin: HeaderValue,
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
    allow_credentials: bool,
}

impl CorsPolicy {
    pub fn from_config(cors: &config::Cors) -> Result<Self> {
        Ok(CorsPolicy {
            allow_origin: HeaderValue::from_str(&cors.allow_origin)?,
            allow_methods: HeaderValue::from_str(&cors.allow_methods.join(", "))?,
            allow_headers: HeaderValue::from_str(&cors.allow_headers.join(", "))?,
            allow_credentials: cors.allow_credentials,
        })
    }

    fn apply(&self, response: &mut Response) {
        let headers = response.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            self.allow_origin.clone(),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            self.allow_methods.clone(),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            self.allow_headers.clone(),
        );
        if self.allow_credentials {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
    }
}

async fn cors(State(policy): State<Arc<CorsPolicy>>, request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    policy.apply(&mut response);
    response
}

/// Builds the full application router.
pub fn router(state: AppState) -> Result<Router> {
    let prefix = state.settings.server.normalized_prefix();
    let policy = Arc::new(CorsPolicy::from_config(&state.settings.cors)?);

    let mut app = Router::new();
    if prefix.is_empty() {
        app = app.route("/", get(index));
    } else {
        app = app
            .route(&prefix, get(index))
            .route(&format!("{}/", prefix), get(index));
    }

    let app = app
        .route(
            &format!("{}/return/{{symbol}}/{{first_date}}/{{second_date}}", prefix),
            get(stock_return::handle),
        )
        .route(
            &format!("{}/dividend/{{symbol}}", prefix),
            get(dividend::handle),
        )
        .fallback(fallback)
        .layer(middleware::from_fn_with_state(policy, cors))
        .with_state(state);

    Ok(app)
}

async fn index() -> Json<&'static str> {
    Json(WELCOME)
}

/// 路徑少了參數時回 400，其它未知路徑回 404
async fn fallback(State(state): State<AppState>, uri: Uri) -> ApiError {
    let prefix = state.settings.server.normalized_prefix();
    let rest = uri.path().strip_prefix(prefix.as_str()).unwrap_or_default();

    if is_route(rest, "/return") {
        return ApiError::ClientInput(
            "symbol, firstDate and secondDate are required".to_string(),
        );
    }

    if is_route(rest, "/dividend") {
        return ApiError::ClientInput("symbol is required".to_string());
    }

    ApiError::NotFound(format!("{} not found", uri.path()))
}

fn is_route(path: &str, route: &str) -> bool {
    match path.strip_prefix(route) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
