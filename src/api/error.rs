use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::logging;

/// Everything a request can fail with. Each variant maps to one HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 缺少或格式錯誤的參數
    #[error("{0}")]
    ClientInput(String),
    /// 網頁上找不到對應的資料
    #[error("{0}")]
    NotFound(String),
    /// 連線失敗、逾時或非 2xx
    #[error("Failed to fetch upstream data: {0}")]
    UpstreamFetch(String),
    /// 網頁內容無法依預期的結構解析
    #[error("Failed to parse upstream data: {0}")]
    UpstreamParse(String),
}

impl ApiError {
    pub fn upstream_fetch(why: anyhow::Error) -> Self {
        ApiError::UpstreamFetch(format!("{:#}", why))
    }

    pub fn upstream_parse(why: anyhow::Error) -> Self {
        ApiError::UpstreamParse(format!("{:#}", why))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ClientInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UpstreamFetch(_) | ApiError::UpstreamParse(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::ClientInput(msg) | ApiError::NotFound(msg) => ErrorBody {
                error: msg.clone(),
                detail: None,
            },
            ApiError::UpstreamFetch(detail) => ErrorBody {
                error: "Upstream request failed".to_string(),
                detail: Some(detail.clone()),
            },
            ApiError::UpstreamParse(detail) => ErrorBody {
                error: "Upstream data could not be parsed".to_string(),
                detail: Some(detail.clone()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            logging::error_file_async(self.to_string());
        } else {
            logging::warn_file_async(self.to_string());
        }

        (status, Json(self.body())).into_response()
    }
}
