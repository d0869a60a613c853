//! Request-level layers: response cache, cache headers and the request deadline

use std::time::Duration;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::cache::{CachedResponse, ResponseCache};
use crate::error::ProxyError;
use crate::routes::serving_origin;
use crate::state::AppState;

pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

fn cache_control(max_age_secs: u64) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "public, s-maxage={}, max-age={}",
        max_age_secs, max_age_secs
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("public"))
}

/// Serve GET 200s from the response cache, storing fresh ones on the way out
///
/// Every response leaves with the shared `Cache-Control` header.
pub async fn response_cache(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let max_age = cache_control(state.config.cache_max_age_secs);
    if request.method() != Method::GET {
        let mut response = next.run(request).await;
        response.headers_mut().insert(CACHE_CONTROL, max_age);
        return response;
    }

    let origin = serving_origin(&state.config, request.headers());
    let key = ResponseCache::key(request.method(), &origin, request.uri());
    let path = request.uri().path().to_string();

    if let Some(cached) = state.response_cache.get(&key).await {
        let mut response = Response::new(Body::from(cached.body.clone()));
        *response.status_mut() = cached.status;
        let headers = response.headers_mut();
        if let Some(content_type) = &cached.content_type {
            headers.insert(CONTENT_TYPE, content_type.clone());
        }
        headers.insert(CACHE_CONTROL, max_age);
        headers.insert(X_CACHE, HeaderValue::from_static("HIT"));
        return response;
    }

    let mut response = next.run(request).await;
    if response.status() != StatusCode::OK {
        response.headers_mut().insert(CACHE_CONTROL, max_age);
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let body = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(body) => body,
        Err(e) => {
            warn!(path = %path, error = %e, "Failed to buffer response");
            return ProxyError::Upstream {
                status: None,
                message: e.to_string(),
            }
            .at(path)
            .into_response();
        }
    };

    state
        .response_cache
        .insert(
            key,
            CachedResponse {
                status: parts.status,
                content_type: parts.headers.get(CONTENT_TYPE).cloned(),
                body: body.clone(),
            },
        )
        .await;
    debug!(path = %path, size = body.len(), "Cached response");

    parts.headers.insert(CACHE_CONTROL, max_age);
    parts.headers.insert(X_CACHE, HeaderValue::from_static("MISS"));
    Response::from_parts(parts, Body::from(body))
}

/// Abort requests that outlive the configured deadline
pub async fn request_deadline(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let deadline = Duration::from_secs(state.config.request_timeout_secs);

    match tokio::time::timeout(deadline, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(path = %path, deadline_secs = deadline.as_secs(), "Request deadline exceeded");
            ProxyError::Timeout.at(path).into_response()
        }
    }
}
