use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_PROXY_URL: &str = "http://localhost:8080";
/// Longer than the proxy's default per-endpoint timeouts (60 s at most), so
/// the proxy's own 504 reaches the caller first. A proxy running with
/// `UPSTREAM_TIMEOUT_SECS` above 90 needs `INTERVIEW_CLIENT_TIMEOUT_SECS`
/// raised to match.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Where the client finds the proxy, and how long it waits for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub proxy_url: String,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(proxy_url: impl Into<String>) -> Self {
        Self {
            proxy_url: proxy_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let proxy_url =
            std::env::var("INTERVIEW_PROXY_URL").unwrap_or_else(|_| DEFAULT_PROXY_URL.to_string());
        let request_timeout = match std::env::var("INTERVIEW_CLIENT_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .context("INTERVIEW_CLIENT_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            Err(_) => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            proxy_url,
            request_timeout,
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PROXY_URL)
    }
}
