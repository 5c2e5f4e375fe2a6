//! Shared fixtures for tests: a canned status page and an in-process status API.

use axum::{
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const SAMPLE_PAGE: &str = r#"{
    "name": "Acme Status",
    "key": "acme",
    "description": "Public status for Acme",
    "updated_at": "2024-05-01T12:00:00Z",
    "monitors": [
        {
            "id": 1,
            "name": "Website",
            "url": "https://acme.test",
            "status": "ONLINE",
            "check_interval": "1min",
            "created_at": "2024-01-01T00:00:00Z",
            "ssl_expiry_date": "2025-01-01T00:00:00Z",
            "historical_data": [
                {"timestamp": "2024-05-01T11:00:00Z", "total_checks": 10, "successful_checks": 5,
                 "uptime_percent": 50.0, "avg_response_time_ms": 400.0, "region": "eu"},
                {"timestamp": "2024-05-01T10:00:00Z", "total_checks": 10, "successful_checks": 10,
                 "uptime_percent": 100.0, "avg_response_time_ms": 200.0, "region": "eu"}
            ]
        },
        {
            "id": 2,
            "name": "API <v2>",
            "url": "https://api.acme.test",
            "status": "OFFLINE",
            "check_interval": "1hr",
            "created_at": "2024-01-01T00:00:00Z",
            "historical_data": [
                {"timestamp": "2024-05-01T10:00:00Z", "total_checks": 4, "successful_checks": 4,
                 "uptime_percent": 100.0, "avg_response_time_ms": 100.0, "region": "us",
                 "last_checked": "2024-05-01T10:59:00Z"}
            ]
        }
    ],
    "statistics": {
        "total_monitors": 2,
        "online_monitors": 1,
        "offline_monitors": 1,
        "avg_response_time_ms": 275.0,
        "last_updated": "2024-05-01T12:00:00Z"
    }
}"#;

/// Requests answered by a mock status API.
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Start a mock status API on an ephemeral port and return its base URL.
///
/// `acme` serves the sample page (only when the request bypasses caches),
/// `missing` is 404, `broken` is 500, and `garbled` returns invalid JSON.
pub async fn spawn_status_api() -> (String, Hits) {
    let hits = Hits::default();
    let counter = hits.clone();

    let router = Router::new().route(
        "/status/{key}",
        get(move |Path(key): Path<String>, headers: HeaderMap| {
            let counter = counter.clone();
            async move {
                counter.0.fetch_add(1, Ordering::SeqCst);
                status_api(key, headers)
            }
        }),
    );

    (serve(router).await, hits)
}

/// Serve `router` on 127.0.0.1 and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn status_api(key: String, headers: HeaderMap) -> axum::response::Response {
    let no_cache = headers
        .get(header::CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        == Some("no-cache");

    match key.as_str() {
        "acme" if no_cache => (
            [(header::CONTENT_TYPE, "application/json")],
            SAMPLE_PAGE,
        )
            .into_response(),
        "acme" => (StatusCode::BAD_REQUEST, "cache not bypassed").into_response(),
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "garbled" => (
            [(header::CONTENT_TYPE, "application/json")],
            "{\"name\": ",
        )
            .into_response(),
        _ => (StatusCode::NOT_FOUND, "no such page").into_response(),
    }
}
