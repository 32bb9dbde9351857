use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use once_cell::sync::{Lazy, OnceCell};
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client, Method, RequestBuilder, Response,
};

use crate::logging::Logger;

pub mod element;

/// A singleton instance of the reqwest client.
static CLIENT: OnceCell<Client> = OnceCell::new();

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("http"));

/// Returns the reqwest client singleton instance or creates one if it doesn't exist.
///
/// The per-request timeout is applied in [`send`]; the client only carries the
/// connection level settings.
pub(crate) fn get_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        // reqwest 使用 rustls-no-provider，需先指定加密實作；重覆安裝會回傳 Err，可忽略
        let _ = rustls::crypto::ring::default_provider().install_default();

        Client::builder()
            // ===== 壓縮 =====
            .brotli(true)
            .gzip(true)
            // ===== 超時設置 =====
            .connect_timeout(Duration::from_secs(8))
            // ===== TCP =====
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            // ===== 連接池 =====
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| anyhow!("Failed to create reqwest client: {:?}", e))
    })
}

/// Builds the headers that make the request look like it came from a browser.
pub fn browser_headers(user_agent: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_str(user_agent)
            .map_err(|why| anyhow!("Invalid user agent '{}' because {:?}", user_agent, why))?,
    );
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );

    Ok(headers)
}

/// Performs an HTTP GET request and returns the response as text.
///
/// # Arguments
///
/// * `url`: The URL to send the GET request to.
/// * `headers`: An optional set of headers to include with the request.
/// * `timeout`: Upper bound for the whole request, body included.
///
/// # Returns
///
/// * `Result<String>`: The response text, or an error when the request fails, times
///   out, answers with a non-2xx status, or the body cannot be read.
pub async fn get(url: &str, headers: Option<HeaderMap>, timeout: Duration) -> Result<String> {
    send(Method::GET, url, headers, timeout)
        .await?
        .text()
        .await
        .map_err(|e| anyhow!("Error parsing response text: {:?}", e))
}

/// Sends one request. There is no retry: the caller gets the first failure.
async fn send(
    method: Method,
    url: &str,
    headers: Option<HeaderMap>,
    timeout: Duration,
) -> Result<Response> {
    let visit_log = format!("{method}:{url}");
    let client = get_client()?;
    let mut rb: RequestBuilder = client.request(method, url).timeout(timeout);

    if let Some(h) = headers {
        rb = rb.headers(h);
    }

    let start = Instant::now();
    let res = rb.send().await;
    let elapsed = start.elapsed().as_millis();

    match res {
        Ok(response) => {
            let status = response.status();
            LOGGER.info(format!("{} {} {} ms", visit_log, status, elapsed));
            response
                .error_for_status()
                .map_err(|why| anyhow!("{} responded with {}: {:?}", url, status, why))
        }
        Err(why) => {
            LOGGER.error(format!("{} failed because {:?}. {} ms", visit_log, why, elapsed));
            if why.is_timeout() {
                return Err(anyhow!(
                    "Request to {} timed out after {} ms",
                    url,
                    timeout.as_millis()
                ));
            }

            Err(anyhow!("Failed to send request to {}: {:?}", url, why))
        }
    }
}
