//! Configuration module for the status page server.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::time::Duration;

/// Key used when none can be derived from the hostname.
pub const DEFAULT_PAGE_KEY: &str = "status";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the web server (default: 3000)
    pub http_port: u16,
    /// Base URL of the status API (default: "https://api1.bareuptime.co")
    pub api_url: String,
    /// Status page shown by this server (default: "status")
    pub page_key: String,
    /// Time between refresh cycles (default: 60s)
    pub refresh_interval: Duration,
    /// Timeout for a single status API request (default: 10s)
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 3000,
            api_url: "https://api1.bareuptime.co".to_string(),
            page_key: DEFAULT_PAGE_KEY.to_string(),
            refresh_interval: Duration::from_secs(60),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STATUSPAGE_HTTP_PORT`: HTTP port (default: 3000)
    /// - `STATUSPAGE_API_URL`: status API base URL
    /// - `STATUSPAGE_KEY`: status page key
    /// - `STATUSPAGE_HOSTNAME`: public hostname, used to derive the key when
    ///   `STATUSPAGE_KEY` is unset
    /// - `STATUSPAGE_REFRESH_SECS`: refresh interval in seconds (default: 60)
    /// - `STATUSPAGE_REQUEST_TIMEOUT_SECS`: request timeout in seconds (default: 10)
    pub fn load() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(port) = lookup("STATUSPAGE_HTTP_PORT").and_then(|s| s.parse().ok()) {
            cfg.http_port = port;
        }

        if let Some(url) = lookup("STATUSPAGE_API_URL").filter(|s| !s.trim().is_empty()) {
            cfg.api_url = url.trim().to_string();
        }

        if let Some(key) = lookup("STATUSPAGE_KEY").filter(|s| !s.trim().is_empty()) {
            cfg.page_key = key.trim().to_string();
        } else if let Some(host) = lookup("STATUSPAGE_HOSTNAME") {
            cfg.page_key = key_from_hostname(&host);
        }

        if let Some(secs) = lookup("STATUSPAGE_REFRESH_SECS").and_then(|s| parse_secs(&s)) {
            cfg.refresh_interval = secs;
        }

        if let Some(secs) = lookup("STATUSPAGE_REQUEST_TIMEOUT_SECS").and_then(|s| parse_secs(&s)) {
            cfg.request_timeout = secs;
        }

        cfg
    }
}

/// Derive a status page key from a public hostname.
///
/// `acme.bareuptime.online` gives `acme`. Local addresses and bare domains
/// fall back to [`DEFAULT_PAGE_KEY`].
pub fn key_from_hostname(hostname: &str) -> String {
    let host = hostname.trim();
    // Drop a port if present
    let host = host.split(':').next().unwrap_or(host);

    if host == "localhost" || host == "127.0.0.1" || host.starts_with("192.168.") {
        return DEFAULT_PAGE_KEY.to_string();
    }

    let parts: Vec<&str> = host.split('.').collect();
    if parts.len() >= 3 && !parts[0].is_empty() {
        return parts[0].to_string();
    }

    DEFAULT_PAGE_KEY.to_string()
}

fn parse_secs(s: &str) -> Option<Duration> {
    match s.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => None,
    }
}
