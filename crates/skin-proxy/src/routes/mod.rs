//! HTTP route handlers

pub mod api;
pub mod resolve;
pub mod session;
pub mod textures;

use axum::extract::State;
use axum::http::{header, HeaderMap, Uri};
use axum::response::{IntoResponse, Json};
use chrono::Utc;

use crate::config::Config;
use crate::error::{ApiError, ProxyError};
use crate::state::AppState;
use crate::types::HealthResponse;

/// GET /
pub async fn root() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], "OK")
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        cache: state.response_cache.stats(),
    })
}

pub async fn not_found(uri: Uri) -> ApiError {
    ProxyError::NotFound("Page Not Found".to_string()).at(uri.path())
}

/// Scheme and host that rewritten URLs point at
///
/// `PUBLIC_URL` wins. Otherwise the request's `Host` is used over `http`;
/// the `X-Forwarded-*` headers only count when the deployment opts in.
pub fn serving_origin(config: &Config, headers: &HeaderMap) -> String {
    if let Some(public_url) = &config.public_url {
        return public_url.clone();
    }

    let first_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let forwarded = |name: &str| {
        if config.trust_forwarded_headers {
            first_value(name)
        } else {
            None
        }
    };

    let proto = forwarded("x-forwarded-proto")
        .filter(|proto| proto == "http" || proto == "https")
        .unwrap_or_else(|| "http".to_string());
    let host = forwarded("x-forwarded-host")
        .or_else(|| first_value(header::HOST.as_str()))
        .unwrap_or_else(|| "localhost".to_string());
    format!("{}://{}", proto, host)
}
