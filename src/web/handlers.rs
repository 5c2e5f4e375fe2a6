//! HTTP request handlers.

use super::render::render_state;
use super::AppState;
use crate::fetch::FetchError;
use crate::page::{OverallStatus, StatusPageResponse};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Redirect},
};
use chrono::{DateTime, Utc};
use rust_embed::RustEmbed;
use serde::Serialize;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

// ============================================================================
// Status page
// ============================================================================

pub async fn handle_page(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.refresher.snapshot().await;
    let refresh_secs = state.refresher.interval().as_secs().max(1);

    Html(render_state(&snapshot, refresh_secs))
}

pub async fn handle_refresh(State(state): State<AppState>) -> impl IntoResponse {
    state.refresher.refresh_now();
    Redirect::to("/")
}

// ============================================================================
// API: Status
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StatusSnapshot {
    pub key: String,
    pub overall_status: OverallStatus,
    pub message: &'static str,
    pub last_refresh: Option<DateTime<Utc>>,
    pub last_attempt: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub page: Option<StatusPageResponse>,
}

pub async fn handle_api_status(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.refresher.snapshot().await;
    let overall = snapshot.overall_status();

    Json(StatusSnapshot {
        key: state.refresher.key().to_string(),
        overall_status: overall,
        message: overall.message(),
        last_refresh: snapshot.last_refresh,
        last_attempt: snapshot.last_attempt,
        error: snapshot.error,
        page: snapshot.page.as_deref().cloned(),
    })
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub async fn handle_api_page(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    match state.fetcher.fetch_status_page(&key).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            let code = match &e {
                FetchError::NotFound => StatusCode::NOT_FOUND,
                FetchError::InvalidKey(_) => StatusCode::BAD_REQUEST,
                FetchError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::BAD_GATEWAY,
            };
            if code != StatusCode::NOT_FOUND {
                tracing::warn!("Live fetch of {} failed: {}", key, e);
            }
            (code, Json(ErrorBody { error: e.user_message() })).into_response()
        }
    }
}

// ============================================================================
// API: Health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: DateTime<Utc>,
    /// Seconds since the server started
    pub uptime: f64,
}

#[derive(Debug, Serialize)]
pub struct UnhealthyResponse {
    pub status: &'static str,
    pub error: String,
}

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    if !state.refresher.is_running() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(UnhealthyResponse {
                status: "unhealthy",
                error: "refresh loop is not running".to_string(),
            }),
        )
            .into_response();
    }

    Json(HealthResponse {
        status: "healthy",
        service: "status-pages",
        timestamp: Utc::now(),
        uptime: state.started.elapsed().as_secs_f64(),
    })
    .into_response()
}

// ============================================================================
// Static Assets
// ============================================================================

pub async fn handle_asset(Path(path): Path<String>) -> impl IntoResponse {
    serve_asset(&path)
}

pub async fn handle_favicon() -> impl IntoResponse {
    serve_asset("favicon.svg")
}

fn serve_asset(path: &str) -> axum::response::Response {
    match Assets::get(path) {
        Some(file) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.to_string())], file.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}
