use std::{env, time::Duration};

use crate::{
    api::HttpClientConfig,
    catalog::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    session::DEFAULT_SESSION_TTL,
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub page_size: i64,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub session_ttl: Duration,
    pub session_sweep_interval: Duration,
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

/// Page size for new sessions; unset or unparsable falls back to the default,
/// anything else is held to the same bounds as a page size change.
pub fn catalog_page_size(raw: Option<i64>) -> i64 {
    raw.map_or(DEFAULT_PAGE_SIZE, |size| size.clamp(1, MAX_PAGE_SIZE))
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8080/api".to_string());
        anyhow::ensure!(
            api_base_url.starts_with("http://") || api_base_url.starts_with("https://"),
            "API_BASE_URL must be an http(s) URL, got {api_base_url}"
        );
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parsed::<u16>("APP_PORT").unwrap_or(3000);
        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:4200".to_string());
        let page_size = catalog_page_size(parsed::<i64>("CATALOG_PAGE_SIZE"));
        let connect_timeout =
            Duration::from_secs(parsed::<u64>("API_CONNECT_TIMEOUT_SECS").unwrap_or(5));
        let request_timeout =
            Duration::from_secs(parsed::<u64>("API_REQUEST_TIMEOUT_SECS").unwrap_or(30));
        let session_ttl = parsed::<u64>("SESSION_TTL_SECS")
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SESSION_TTL);
        let session_sweep_interval =
            Duration::from_secs(parsed::<u64>("SESSION_SWEEP_SECS").unwrap_or(60).max(1));
        Ok(Self {
            api_base_url,
            host,
            port,
            cors_origin,
            page_size,
            connect_timeout,
            request_timeout,
            session_ttl,
            session_sweep_interval,
        })
    }

    pub fn http_client(&self) -> HttpClientConfig {
        HttpClientConfig {
            connect_timeout: self.connect_timeout,
            request_timeout: self.request_timeout,
        }
    }
}
