use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::{config, util::http};

/// StreetInsider 股利歷史
pub mod street_insider;
/// 雅虎財經
pub mod yahoo;

/// Source of raw page markup.
///
/// Handlers only ever see this trait, so a page can come from the real site or from
/// a canned document.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches pages over HTTP with a browser User-Agent and a fixed timeout.
pub struct HttpFetcher {
    headers: HeaderMap,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(upstream: &config::Upstream) -> Result<Self> {
        Ok(HttpFetcher {
            headers: http::browser_headers(&upstream.user_agent)?,
            timeout: Duration::from_millis(upstream.timeout_ms),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        http::get(url, Some(self.headers.clone()), self.timeout).await
    }
}
