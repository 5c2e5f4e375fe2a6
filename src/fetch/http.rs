//! HTTP client for the status API.

use super::{validate_key, FetchError};
use crate::page::{aggregate_page, RawStatusPage, StatusPageResponse};

use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use reqwest::StatusCode;
use std::time::Duration;

/// Fetches public status pages and aggregates them for display.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl Fetcher {
    /// Create a fetcher for the status API at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// URL of the public status page for `key`.
    pub fn page_url(&self, key: &str) -> String {
        format!("{}/status/{}", self.base_url, key)
    }

    /// Fetch the page for `key` and aggregate it.
    ///
    /// Every call goes to the live API; nothing is cached.
    pub async fn fetch_status_page(&self, key: &str) -> Result<StatusPageResponse, FetchError> {
        let raw = self.fetch_raw(key).await?;
        Ok(aggregate_page(&raw))
    }

    /// Fetch the raw, unaggregated page for `key`.
    pub async fn fetch_raw(&self, key: &str) -> Result<RawStatusPage, FetchError> {
        validate_key(key)?;

        let url = self.page_url(key);
        tracing::debug!("Fetching status page {} from {}", key, url);

        let response = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string());
            return Err(FetchError::RequestFailed(reason));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::MalformedPayload(e.to_string()))
    }

    fn transport_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{serve, spawn_status_api};
    use axum::{routing::get, Router};
    use tokio_test::assert_ok;

    fn fetcher(base_url: &str) -> Fetcher {
        Fetcher::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_page_url() {
        let f = fetcher("https://api.example.test/");
        assert_eq!(f.page_url("acme"), "https://api.example.test/status/acme");
    }

    #[tokio::test]
    async fn test_fetch_aggregates_page() {
        let (base, hits) = spawn_status_api().await;
        let page = assert_ok!(fetcher(&base).fetch_status_page("acme").await);

        assert_eq!(page.key, "acme");
        assert_eq!(page.monitors.len(), 2);
        assert_eq!(hits.count(), 1);

        let website = &page.monitors[0];
        assert_eq!(website.total_checks, 20);
        assert_eq!(website.uptime_percentage, 75.0);
        assert_eq!(website.avg_response_time_ms, 300.0);
        assert_eq!(website.last_checked.as_deref(), Some("2024-05-01T11:00:00Z"));

        let api = &page.monitors[1];
        assert_eq!(api.uptime_percentage, 100.0);
        assert_eq!(api.last_checked.as_deref(), Some("2024-05-01T10:59:00Z"));

        assert_eq!(page.statistics.overall_uptime_percent, 87.5);
        assert_eq!(page.statistics.online_monitors, 1);
    }

    #[tokio::test]
    async fn test_fetch_never_cached() {
        let (base, hits) = spawn_status_api().await;
        let f = fetcher(&base);

        let first = assert_ok!(f.fetch_status_page("acme").await);
        let second = assert_ok!(f.fetch_status_page("acme").await);
        assert_eq!(first, second);
        assert_eq!(hits.count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let (base, _) = spawn_status_api().await;
        let err = fetcher(&base).fetch_status_page("missing").await.unwrap_err();

        assert!(matches!(err, FetchError::NotFound));
        assert_eq!(err.user_message(), "Status page not found");
    }

    #[tokio::test]
    async fn test_fetch_request_failed() {
        let (base, _) = spawn_status_api().await;
        let err = fetcher(&base).fetch_status_page("broken").await.unwrap_err();

        match err {
            FetchError::RequestFailed(reason) => assert_eq!(reason, "Internal Server Error"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_malformed_payload() {
        let (base, _) = spawn_status_api().await;
        let err = fetcher(&base).fetch_status_page("garbled").await.unwrap_err();
        assert!(matches!(err, FetchError::MalformedPayload(_)));
    }

    #[tokio::test]
    async fn test_fetch_rejects_bad_key_without_request() {
        let (base, hits) = spawn_status_api().await;
        let err = fetcher(&base).fetch_status_page("../admin").await.unwrap_err();

        assert!(matches!(err, FetchError::InvalidKey(_)));
        assert_eq!(hits.count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let router = Router::new().route(
            "/status/{key}",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "{}"
            }),
        );
        let base = serve(router).await;

        let f = Fetcher::new(&base, Duration::from_millis(100)).unwrap();
        let err = f.fetch_status_page("slow").await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_fetch_unreachable() {
        // Nothing listens on the discard port
        let f = fetcher("http://127.0.0.1:9");
        let err = f.fetch_status_page("acme").await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_) | FetchError::Timeout(_)));
    }
}
