//! Unified texture lookup: any identifier, either edition

use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::response::Response;
use mojang_api::TextureSlot;
use tracing::debug;

use crate::config::TextureDelivery;
use crate::error::{ApiError, ProxyError};
use crate::state::AppState;
use crate::texture;
use crate::types::ResolveQuery;

/// GET /{identifier}?type=SKIN|CAPE&prefix=&format=png|base64
///
/// Identifier → identity → texture URL → PNG. The first failing step ends
/// the request.
pub async fn texture(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Query(query): Query<ResolveQuery>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let path = uri.path();

    let slot = match query.kind.as_deref() {
        Some(kind) => kind
            .parse::<TextureSlot>()
            .map_err(|e| ProxyError::NotFound(e).at(path))?,
        None => TextureSlot::Skin,
    };
    let delivery = match query.format.as_deref() {
        Some(format) => format
            .parse::<TextureDelivery>()
            .map_err(|e| ProxyError::NotFound(e).at(path))?,
        None => state.config.texture_delivery,
    };

    let identity = state
        .identity
        .resolve(&identifier, query.prefix.as_deref())
        .await
        .map_err(|e| e.at(path))?;
    debug!(identifier = %identifier, identity = ?identity, "Identity resolved");

    let url = state
        .fetcher
        .texture_url(&identity, slot)
        .await
        .map_err(|e| e.at(path))?;

    let png = texture::png_from_url(&state.mojang, &url)
        .await
        .map_err(|e| e.at(path))?;
    debug!(identifier = %identifier, slot = %slot, size = png.len(), "Serving texture");

    Ok(texture::deliver(png, delivery))
}
