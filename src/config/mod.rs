use std::{env, path::PathBuf, str::FromStr};

use anyhow::Result;
use config::{Config as config_config, File as config_file};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::logging;

const CONFIG_PATH: &str = "app.json";

/// Android Chrome 的 User-Agent，部份網站會擋掉非瀏覽器的請求
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Mobile Safari/537.36";

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct App {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub upstream: Upstream,
    #[serde(default)]
    pub cors: Cors,
    #[serde(default)]
    pub dividend: Dividend,
}

const SERVER_HOST: &str = "SERVER_HOST";
const SERVER_PORT: &str = "SERVER_PORT";
const SERVER_PATH_PREFIX: &str = "SERVER_PATH_PREFIX";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Server {
    pub host: String,
    pub port: u16,
    /// 所有路由掛載的前綴，空字串表示掛在根目錄
    pub path_prefix: String,
}

impl Default for Server {
    fn default() -> Self {
        Server {
            host: "0.0.0.0".to_string(),
            port: 8080,
            path_prefix: "/.netlify/functions/stockinformation".to_string(),
        }
    }
}

impl Server {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 去掉結尾的斜線，讓 prefix 與路由組合時不會出現 `//`
    pub fn normalized_prefix(&self) -> String {
        let trimmed = self.path_prefix.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return String::new();
        }

        if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }
}

const UPSTREAM_USER_AGENT: &str = "UPSTREAM_USER_AGENT";
const UPSTREAM_TIMEOUT_MS: &str = "UPSTREAM_TIMEOUT_MS";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Upstream {
    pub user_agent: String,
    pub timeout_ms: u64,
    pub yahoo: Yahoo,
    pub street_insider: StreetInsider,
}

impl Default for Upstream {
    fn default() -> Self {
        Upstream {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: 10_000,
            yahoo: Default::default(),
            street_insider: Default::default(),
        }
    }
}

const YAHOO_BASE_URL: &str = "YAHOO_BASE_URL";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Yahoo {
    pub base_url: String,
    /// 歷史股價表格每一列的 CSS selector
    pub row_selector: String,
    /// 取價格的欄位 (從 0 開始)。表格欄位依序為
    /// Date / Open / High / Low / Close / Adj Close / Volume，預設取收盤價
    pub price_column: usize,
}

impl Default for Yahoo {
    fn default() -> Self {
        Yahoo {
            base_url: "https://finance.yahoo.com".to_string(),
            row_selector: "tbody tr.svelte-ewueuo".to_string(),
            price_column: 4,
        }
    }
}

const STREET_INSIDER_URL: &str = "STREET_INSIDER_URL";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct StreetInsider {
    pub url: String,
    pub cell_selector: String,
}

impl Default for StreetInsider {
    fn default() -> Self {
        StreetInsider {
            url: "https://www.streetinsider.com/dividend_history.php".to_string(),
            cell_selector: "td".to_string(),
        }
    }
}

const CORS_ALLOW_ORIGIN: &str = "CORS_ALLOW_ORIGIN";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Cors {
    pub allow_origin: String,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for Cors {
    fn default() -> Self {
        Cors {
            allow_origin: "*".to_string(),
            allow_methods: ["GET", "POST", "OPTIONS", "PUT", "PATCH", "DELETE"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            allow_headers: ["Content-Type", "Authorization"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            allow_credentials: true,
        }
    }
}

const DIVIDEND_MAX_RECORDS: &str = "DIVIDEND_MAX_RECORDS";

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub struct Dividend {
    /// 回傳的股利筆數上限，0 表示不限制
    pub max_records: usize,
}

pub static SETTINGS: Lazy<App> = Lazy::new(|| match App::get() {
    Ok(app) => app,
    Err(why) => {
        logging::error_console(format!(
            "I can't read the config context because {:?}",
            why
        ));
        App::default().override_with_env()
    }
});

impl App {
    fn get() -> Result<Self> {
        let config_path = config_path();
        if config_path.exists() {
            let config: App = config_config::builder()
                .add_source(config_file::from(config_path))
                .build()?
                .try_deserialize()?;
            return Ok(config.override_with_env());
        }

        Ok(App::default().override_with_env())
    }

    /// 將來至於 env 的設定值覆蓋掉 json 上的設定值
    fn override_with_env(mut self) -> Self {
        if let Ok(host) = env::var(SERVER_HOST) {
            self.server.host = host;
        }

        if let Ok(port) = env::var(SERVER_PORT) {
            self.server.port = u16::from_str(&port).unwrap_or(self.server.port);
        }

        if let Ok(prefix) = env::var(SERVER_PATH_PREFIX) {
            self.server.path_prefix = prefix;
        }

        if let Ok(ua) = env::var(UPSTREAM_USER_AGENT) {
            self.upstream.user_agent = ua;
        }

        if let Ok(timeout) = env::var(UPSTREAM_TIMEOUT_MS) {
            self.upstream.timeout_ms = u64::from_str(&timeout).unwrap_or(self.upstream.timeout_ms);
        }

        if let Ok(url) = env::var(YAHOO_BASE_URL) {
            self.upstream.yahoo.base_url = url;
        }

        if let Ok(url) = env::var(STREET_INSIDER_URL) {
            self.upstream.street_insider.url = url;
        }

        if let Ok(origin) = env::var(CORS_ALLOW_ORIGIN) {
            self.cors.allow_origin = origin;
        }

        if let Ok(max) = env::var(DIVIDEND_MAX_RECORDS) {
            self.dividend.max_records = usize::from_str(&max).unwrap_or(self.dividend.max_records);
        }

        self
    }
}

/// 回傳設定檔的路徑
fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_PATH)
}
