//! Session server relay with texture URL rewriting

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Uri};
use axum::response::Json;
use mojang_api::Profile;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ApiError, ProxyError};
use crate::routes::serving_origin;
use crate::state::AppState;
use crate::types::SessionQuery;

/// Hyphenated or undashed; braces and URNs are rejected
fn parse_profile_uuid(raw: &str) -> Option<Uuid> {
    match raw.len() {
        32 | 36 => Uuid::try_parse(raw).ok(),
        _ => None,
    }
}

/// GET /session/minecraft/profile/{uuid}
///
/// Relays the session profile with its texture URLs rewritten. The UUID is
/// validated locally so malformed requests never reach the session server.
pub async fn profile(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    Query(query): Query<SessionQuery>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<Profile>, ApiError> {
    let path = uri.path();
    let uuid = parse_profile_uuid(&raw).ok_or_else(|| ProxyError::InvalidUuid(raw.clone()).at(path))?;

    let profile = state
        .fetcher
        .java_profile(&uuid, query.unsigned())
        .await
        .map_err(|e| e.at(path))?;

    let origin = serving_origin(&state.config, &headers);
    let profile = state
        .rewriter
        .rewrite(profile, &origin)
        .await
        .map_err(|e| e.at(path))?;

    debug!(uuid = %uuid, name = %profile.name, "Relayed session profile");
    Ok(Json(profile))
}
