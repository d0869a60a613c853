//! Passthrough relays of api.mojang.com

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::response::Json;
use serde_json::Value;

use crate::error::{ApiError, ProxyError};
use crate::state::AppState;
use crate::types::AtQuery;

/// POST /api/profiles/minecraft
///
/// Body is a JSON array of usernames; anything else is a 404.
pub async fn profiles_by_names(
    State(state): State<AppState>,
    uri: Uri,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let names: Vec<String> = serde_json::from_slice(&body)
        .map_err(|_| ProxyError::NotFound("Page Not Found".to_string()).at(uri.path()))?;

    let found = state
        .mojang
        .profiles_by_names(&names)
        .await
        .map_err(|e| ProxyError::from(e).at(uri.path()))?;
    Ok(Json(found))
}

/// POST /api/orders/statistics
///
/// Body must be a JSON document; it is forwarded untouched.
pub async fn order_statistics(
    State(state): State<AppState>,
    uri: Uri,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let query: Value = serde_json::from_slice(&body)
        .map_err(|_| ProxyError::NotFound("Page Not Found".to_string()).at(uri.path()))?;

    let statistics = state
        .mojang
        .order_statistics(&query)
        .await
        .map_err(|e| ProxyError::from(e).at(uri.path()))?;
    Ok(Json(statistics))
}

/// Any other method on a POST-only relay route
pub async fn method_not_allowed(uri: Uri) -> ApiError {
    ProxyError::MethodNotAllowed.at(uri.path())
}

/// GET /api/users/profiles/minecraft/{username}?at=
pub async fn profile_at(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<AtQuery>,
    uri: Uri,
) -> Result<Json<Value>, ApiError> {
    let profile = state
        .mojang
        .profile_at(&username, query.at())
        .await
        .map_err(|e| ProxyError::from(e).into_not_found().at(uri.path()))?;
    Ok(Json(profile))
}

/// GET /api/user/profiles/{uuid}/names
pub async fn name_history(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    uri: Uri,
) -> Result<Json<Value>, ApiError> {
    let names = state
        .mojang
        .name_history(&uuid)
        .await
        .map_err(|e| ProxyError::from(e).into_not_found().at(uri.path()))?;
    Ok(Json(names))
}
